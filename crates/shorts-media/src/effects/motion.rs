//! Timing and motion effects: speed, rotation, bounce, 3D tilt and shake.

use shorts_models::{RenderGeometry, Rotate, SceneEffectConfig, Tilt};

use crate::filter::{num, Filter, Fragment};
use crate::timing::clamp_intensity;

/// Timestamp rescale for a playback speed.
///
/// `None` at normal speed. Non-positive speeds count as normal speed.
pub fn timestamp_rescale(speed: f64) -> Option<Filter> {
    if !speed.is_finite() || speed <= 0.0 || speed == 1.0 {
        return None;
    }
    // Slower playback stretches timestamps
    Some(Filter::new("setpts").arg(format!("{}*PTS", num(1.0 / speed))))
}

pub fn speed_filter(config: &SceneEffectConfig, _geometry: &RenderGeometry) -> Option<Fragment> {
    timestamp_rescale(config.speed).map(Fragment::filter)
}

pub fn rotate_filter(config: &SceneEffectConfig, geometry: &RenderGeometry) -> Option<Fragment> {
    let duration = num(geometry.duration);
    let angle = match config.rotate {
        Rotate::None => return None,
        Rotate::Clockwise => format!("'2*PI*t/{duration}'"),
        Rotate::CounterClockwise => format!("'-2*PI*t/{duration}'"),
        Rotate::Wobble => "'sin(t)*0.2'".to_string(),
        Rotate::Rotate90 => "PI/2".to_string(),
        Rotate::Rotate180 => "PI".to_string(),
        Rotate::Rotate270 => "3*PI/2".to_string(),
    };
    // c=none leaves uncovered corners transparent
    Some(Fragment::filter(Filter::new("rotate").arg(angle).opt("c", "none")))
}

/// Height of the bounce in pixels, always even.
///
/// The crop shrinks the frame by this amount; yuv420p needs even heights.
pub fn bounce_height(intensity: f64) -> u32 {
    let height = (20.0 + clamp_intensity(intensity) * 40.0).floor() as u32;
    height - height % 2
}

/// Three one-directional bounces over the clip.
pub fn bounce_filter(config: &SceneEffectConfig, geometry: &RenderGeometry) -> Option<Fragment> {
    if !config.bounce {
        return None;
    }
    let height = bounce_height(config.intensity);
    let duration = num(geometry.duration);
    Some(Fragment::filter(
        Filter::new("crop")
            .arg("iw")
            .arg(format!("ih-{height}"))
            .arg(0)
            .expr_arg(format!("{height}*abs(sin(3*2*PI*t/{duration}))")),
    ))
}

/// Four-corner perspective warp.
///
/// Every direction pulls one corner pair inward by `0.2 * intensity` of
/// the width: left and right skew the frame sideways, forward narrows the
/// top edge, backward the bottom edge.
pub fn tilt_filter(config: &SceneEffectConfig, _geometry: &RenderGeometry) -> Option<Fragment> {
    let s = num(0.2 * clamp_intensity(config.intensity));
    let near = || format!("'W*{s}'");
    let far = || format!("'W*(1-{s})'");

    // Corner order: top-left, top-right, bottom-left, bottom-right
    let corners: [(String, String); 4] = match config.tilt {
        Tilt::None => return None,
        Tilt::Left => [
            ("0".into(), "0".into()),
            (near(), "0".into()),
            (far(), "H".into()),
            ("W".into(), "H".into()),
        ],
        Tilt::Right => [
            (near(), "0".into()),
            ("W".into(), "0".into()),
            ("0".into(), "H".into()),
            (far(), "H".into()),
        ],
        Tilt::Forward => [
            (near(), "0".into()),
            (far(), "0".into()),
            ("0".into(), "H".into()),
            ("W".into(), "H".into()),
        ],
        Tilt::Backward => [
            ("0".into(), "0".into()),
            ("W".into(), "0".into()),
            (near(), "H".into()),
            (far(), "H".into()),
        ],
    };

    let [(x0, y0), (x1, y1), (x2, y2), (x3, y3)] = corners;
    Some(Fragment::filter(
        Filter::new("perspective")
            .opt("x0", x0)
            .opt("y0", y0)
            .opt("x1", x1)
            .opt("y1", y1)
            .opt("x2", x2)
            .opt("y2", y2)
            .opt("x3", x3)
            .opt("y3", y3)
            .opt("interpolation", "linear"),
    ))
}

/// Shake displacement in pixels, 1..=5.
pub fn shake_amount(intensity: f64) -> u32 {
    (1.0 + clamp_intensity(intensity) * 4.0).round() as u32
}

/// Crop-window jitter; x follows sine and y cosine of the frame index.
pub fn shake_filter(config: &SceneEffectConfig, _geometry: &RenderGeometry) -> Option<Fragment> {
    if !config.shake {
        return None;
    }
    let a = shake_amount(config.intensity);
    let margin = a * 2;
    Some(Fragment::filter(
        Filter::new("crop")
            .expr_opt("w", format!("iw-{margin}"))
            .expr_opt("h", format!("ih-{margin}"))
            .expr_opt("x", format!("{a}+{a}*sin(n/10)"))
            .expr_opt("y", format!("{a}+{a}*cos(n/10)")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(duration: f64) -> RenderGeometry {
        RenderGeometry::new(608, 1080, duration)
    }

    fn render(builder: crate::effects::EffectBuilder, config: SceneEffectConfig) -> Option<String> {
        builder(&config, &geometry(4.0)).map(Fragment::into_string)
    }

    #[test]
    fn test_speed_filter() {
        assert_eq!(timestamp_rescale(1.0), None);
        assert_eq!(timestamp_rescale(0.0), None);
        assert_eq!(timestamp_rescale(-2.0), None);
        assert_eq!(timestamp_rescale(2.0).unwrap().to_string(), "setpts=0.5*PTS");
        assert_eq!(timestamp_rescale(0.5).unwrap().to_string(), "setpts=2*PTS");
        assert_eq!(
            render(speed_filter, SceneEffectConfig::new().with_speed(1.5)).unwrap(),
            "setpts=0.666667*PTS"
        );
    }

    #[test]
    fn test_rotate_variants() {
        let rotate = |r| render(rotate_filter, SceneEffectConfig::new().with_rotate(r));
        assert_eq!(rotate(Rotate::None), None);
        assert_eq!(rotate(Rotate::Clockwise).unwrap(), "rotate='2*PI*t/4':c=none");
        assert_eq!(rotate(Rotate::CounterClockwise).unwrap(), "rotate='-2*PI*t/4':c=none");
        assert_eq!(rotate(Rotate::Wobble).unwrap(), "rotate='sin(t)*0.2':c=none");
        assert_eq!(rotate(Rotate::Rotate90).unwrap(), "rotate=PI/2:c=none");
        assert_eq!(rotate(Rotate::Rotate180).unwrap(), "rotate=PI:c=none");
        assert_eq!(rotate(Rotate::Rotate270).unwrap(), "rotate=3*PI/2:c=none");
    }

    #[test]
    fn test_rotate_with_degenerate_duration() {
        let config = SceneEffectConfig::new().with_rotate(Rotate::Clockwise);
        let fragment = rotate_filter(&config, &geometry(0.0)).unwrap();
        assert_eq!(fragment.as_str(), "rotate='2*PI*t/0.1':c=none");
    }

    #[test]
    fn test_bounce_filter() {
        assert_eq!(render(bounce_filter, SceneEffectConfig::new()), None);
        let config = SceneEffectConfig::new().with_bounce(true).with_intensity(0.5);
        assert_eq!(
            render(bounce_filter, config).unwrap(),
            "crop=iw:ih-40:0:'40*abs(sin(3*2*PI*t/4))'"
        );
    }

    #[test]
    fn test_tilt_forward_and_backward() {
        let tilt = |t| render(tilt_filter, SceneEffectConfig::new().with_tilt(t).with_intensity(1.0));
        assert_eq!(
            tilt(Tilt::Forward).unwrap(),
            "perspective=x0='W*0.2':y0=0:x1='W*(1-0.2)':y1=0:x2=0:y2=H:x3=W:y3=H:interpolation=linear"
        );
        assert_eq!(
            tilt(Tilt::Backward).unwrap(),
            "perspective=x0=0:y0=0:x1=W:y1=0:x2='W*0.2':y2=H:x3='W*(1-0.2)':y3=H:interpolation=linear"
        );
        assert_eq!(tilt(Tilt::None), None);
    }

    #[test]
    fn test_tilt_sides_use_width_offsets() {
        let config = SceneEffectConfig::new().with_tilt(Tilt::Left).with_intensity(1.0);
        assert_eq!(
            render(tilt_filter, config).unwrap(),
            "perspective=x0=0:y0=0:x1='W*0.2':y1=0:x2='W*(1-0.2)':y2=H:x3=W:y3=H:interpolation=linear"
        );

        let config = SceneEffectConfig::new().with_tilt(Tilt::Right).with_intensity(0.5);
        let right = render(tilt_filter, config).unwrap();
        assert!(right.contains("x0='W*0.1':y0=0"));
        assert!(right.contains("x3='W*(1-0.1)':y3=H"));
        assert!(!right.contains("H*"));
    }

    #[test]
    fn test_bounce_height_is_even() {
        assert_eq!(bounce_height(0.0), 20);
        assert_eq!(bounce_height(0.325), 32);
        assert_eq!(bounce_height(1.0), 60);
        let config = SceneEffectConfig::new().with_bounce(true).with_intensity(0.325);
        assert_eq!(
            render(bounce_filter, config).unwrap(),
            "crop=iw:ih-32:0:'32*abs(sin(3*2*PI*t/4))'"
        );
    }

    #[test]
    fn test_shake_amount_range() {
        assert_eq!(shake_amount(0.0), 1);
        assert_eq!(shake_amount(0.5), 3);
        assert_eq!(shake_amount(1.0), 5);
    }

    #[test]
    fn test_shake_filter() {
        let config = SceneEffectConfig::new().with_shake(true).with_intensity(1.0);
        assert_eq!(
            render(shake_filter, config).unwrap(),
            "crop=w='iw-10':h='ih-10':x='5+5*sin(n/10)':y='5+5*cos(n/10)'"
        );
        assert_eq!(render(shake_filter, SceneEffectConfig::new()), None);
    }
}
