//! Fade in/out.

use shorts_models::{Fade, RenderGeometry, SceneEffectConfig};

use crate::filter::{num, Filter, Fragment};

/// Longest fade, in seconds.
pub const MAX_FADE_SECS: f64 = 0.5;

/// Fade length: half a second, but never more than a quarter of the clip.
pub fn fade_duration(duration: f64) -> f64 {
    MAX_FADE_SECS.min(duration / 4.0)
}

pub fn fade_filter(config: &SceneEffectConfig, geometry: &RenderGeometry) -> Option<Fragment> {
    let length = fade_duration(geometry.duration);
    let fade_in = || {
        Filter::new("fade")
            .opt("t", "in")
            .opt("st", 0)
            .opt("d", num(length))
    };
    let fade_out = || {
        Filter::new("fade")
            .opt("t", "out")
            .opt("st", num(geometry.duration - length))
            .opt("d", num(length))
    };

    match config.fade {
        Fade::None => None,
        Fade::In => Some(Fragment::filter(fade_in())),
        Fade::Out => Some(Fragment::filter(fade_out())),
        Fade::Both => Some(Fragment::chain([fade_in(), fade_out()])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fade: Fade, duration: f64) -> Option<String> {
        let config = SceneEffectConfig::new().with_fade(fade);
        fade_filter(&config, &RenderGeometry::new(608, 1080, duration)).map(Fragment::into_string)
    }

    #[test]
    fn test_fade_duration_caps() {
        assert_eq!(fade_duration(10.0), 0.5);
        assert_eq!(fade_duration(1.0), 0.25);
        assert_eq!(fade_duration(2.0), 0.5);
    }

    #[test]
    fn test_fade_both_on_short_clip() {
        assert_eq!(
            render(Fade::Both, 1.0).unwrap(),
            "fade=t=in:st=0:d=0.25,fade=t=out:st=0.75:d=0.25"
        );
    }

    #[test]
    fn test_fade_single_sides() {
        assert_eq!(render(Fade::In, 6.0).unwrap(), "fade=t=in:st=0:d=0.5");
        assert_eq!(render(Fade::Out, 6.0).unwrap(), "fade=t=out:st=5.5:d=0.5");
        assert_eq!(render(Fade::None, 6.0), None);
    }

    #[test]
    fn test_fade_with_zero_duration_uses_floor() {
        assert_eq!(
            render(Fade::In, 0.0).unwrap(),
            "fade=t=in:st=0:d=0.025"
        );
    }
}
