//! Zoom and pan resolution.
//!
//! `zoompan` animates the zoom factor and the crop origin in one filter, so
//! when a scene asks for both a zoom and a pan they have to be merged into
//! a single invocation rather than chained. The source is first upscaled by
//! [`OVERSAMPLE`] so neither motion runs out of pixels at its extremes.
//!
//! | zoom | pan | output |
//! |------|-----|--------|
//! | none | none | `scale` to output size |
//! | set  | none | `zoompan`, origin centred (ken burns drifts) |
//! | none | set  | moving `crop` window over the oversampled frame |
//! | set  | set  | `zoompan` with zoom-centred origin plus linear pan term |

use shorts_models::{Pan, RenderGeometry, SceneEffectConfig, Zoom, SCENE_FPS};

use crate::filter::{num, Filter, Fragment};
use crate::timing::{clamp_intensity, frame_count};

/// Upscale factor applied before any zoom or pan.
pub const OVERSAMPLE: f64 = 3.5;
/// Ken Burns horizontal drift amplitude, in source pixels.
const KEN_BURNS_DRIFT: u32 = 50;

/// Which branch of the resolver a configuration takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    Static,
    ZoomOnly,
    PanOnly,
    Combined,
}

impl MotionMode {
    pub fn of(config: &SceneEffectConfig) -> Self {
        match (config.zoom.is_none(), config.pan.is_none()) {
            (true, true) => MotionMode::Static,
            (false, true) => MotionMode::ZoomOnly,
            (true, false) => MotionMode::PanOnly,
            (false, false) => MotionMode::Combined,
        }
    }
}

/// Zoom reached at the end of a zoom in (or start of a zoom out).
pub fn max_zoom(intensity: f64) -> f64 {
    1.0 + clamp_intensity(intensity) * 0.5
}

/// Amplitude of the pulse oscillation, 0.1..=0.2.
pub fn pulse_amplitude(intensity: f64) -> f64 {
    0.1 + clamp_intensity(intensity) * 0.1
}

/// Zoom factor expression over output frame `on`, `None` for no zoom.
pub fn zoom_expression(zoom: Zoom, frames: u32, intensity: f64) -> Option<String> {
    let max = num(max_zoom(intensity));
    match zoom {
        Zoom::None => None,
        Zoom::ZoomIn | Zoom::KenBurns => Some(format!("1+({max}-1)*on/{frames}")),
        Zoom::ZoomOut => Some(format!("{max}-({max}-1)*on/{frames}")),
        // Two full cycles over the clip
        Zoom::Pulse => Some(format!(
            "1+{}*sin(on/{frames}*PI*4)",
            num(pulse_amplitude(intensity))
        )),
    }
}

/// Pan travel in output pixels.
fn pan_distance(geometry: &RenderGeometry, intensity: f64) -> u32 {
    (f64::from(geometry.width) * clamp_intensity(intensity)).floor() as u32
}

fn oversampled(geometry: &RenderGeometry) -> (u32, u32) {
    (
        (f64::from(geometry.width) * OVERSAMPLE).floor() as u32,
        (f64::from(geometry.height) * OVERSAMPLE).floor() as u32,
    )
}

/// `scale=W:H:flags=lanczos,setsar=1`
fn scale_stage(width: u32, height: u32) -> [Filter; 2] {
    [
        Filter::new("scale")
            .arg(width)
            .arg(height)
            .opt("flags", "lanczos"),
        Filter::new("setsar").arg(1),
    ]
}

/// Scale back to the output size with square pixels.
pub fn output_scale(geometry: &RenderGeometry) -> Fragment {
    Fragment::chain(scale_stage(geometry.width, geometry.height))
}

/// Signed linear pan term, e.g. `-on/150*304`.
fn pan_term(sign: char, progress_var: &str, frames: u32, distance: u32) -> String {
    format!("{sign}{progress_var}/{frames}*{distance}")
}

/// Resolve zoom and pan into the motion stage of a scene.
///
/// Always returns a fragment; with neither effect set it only pins the
/// output geometry.
pub fn resolve_motion(config: &SceneEffectConfig, geometry: &RenderGeometry) -> Fragment {
    let frames = frame_count(geometry.duration);
    let (scaled_w, scaled_h) = oversampled(geometry);
    let distance = pan_distance(geometry, config.intensity);

    match MotionMode::of(config) {
        MotionMode::Static => output_scale(geometry),

        MotionMode::PanOnly => {
            let center_x = (scaled_w - geometry.width) / 2;
            let center_y = (scaled_h - geometry.height) / 2;
            let moving = |center: u32, sign: char| {
                format!("'{center}{}'", pan_term(sign, "n", frames, distance))
            };
            let (x, y) = match config.pan {
                Pan::Left => (moving(center_x, '-'), center_y.to_string()),
                Pan::Right => (moving(center_x, '+'), center_y.to_string()),
                Pan::Up => (center_x.to_string(), moving(center_y, '-')),
                Pan::Down => (center_x.to_string(), moving(center_y, '+')),
                Pan::None => (center_x.to_string(), center_y.to_string()),
            };

            let [scale, setsar] = scale_stage(scaled_w, scaled_h);
            Fragment::chain([
                scale,
                setsar,
                Filter::new("crop")
                    .arg(geometry.width)
                    .arg(geometry.height)
                    .arg(x)
                    .arg(y),
                Filter::new("scale")
                    .arg(geometry.width)
                    .arg(geometry.height)
                    .opt("flags", "lanczos"),
            ])
        }

        MotionMode::ZoomOnly | MotionMode::Combined => {
            let zoom = zoom_expression(config.zoom, frames, config.intensity)
                .unwrap_or_else(|| "1".to_string());

            let mut x_terms = String::new();
            let mut y_terms = String::new();
            if config.zoom == Zoom::KenBurns {
                x_terms.push_str(&format!("+sin(on/{frames}*PI)*{KEN_BURNS_DRIFT}"));
            }
            match config.pan {
                Pan::Left => x_terms.push_str(&pan_term('-', "on", frames, distance)),
                Pan::Right => x_terms.push_str(&pan_term('+', "on", frames, distance)),
                Pan::Up => y_terms.push_str(&pan_term('-', "on", frames, distance)),
                Pan::Down => y_terms.push_str(&pan_term('+', "on", frames, distance)),
                Pan::None => {}
            }

            let [scale, setsar] = scale_stage(scaled_w, scaled_h);
            Fragment::chain([
                scale,
                setsar,
                Filter::new("zoompan")
                    .expr_opt("z", zoom)
                    .opt("d", frames)
                    .expr_opt("x", format!("floor(iw/2-(iw/zoom/2){x_terms})"))
                    .expr_opt("y", format!("floor(ih/2-(ih/zoom/2){y_terms})"))
                    .opt("s", geometry.size())
                    .opt("fps", SCENE_FPS),
            ])
        }
    }
}

/// Motion stage as a chain builder: `None` unless zoom or pan is set.
pub fn zoom_pan_filter(config: &SceneEffectConfig, geometry: &RenderGeometry) -> Option<Fragment> {
    match MotionMode::of(config) {
        MotionMode::Static => None,
        _ => Some(resolve_motion(config, geometry)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(config: SceneEffectConfig, geometry: RenderGeometry) -> String {
        resolve_motion(&config, &geometry).into_string()
    }

    #[test]
    fn test_mode_selection() {
        let c = SceneEffectConfig::new();
        assert_eq!(MotionMode::of(&c), MotionMode::Static);
        assert_eq!(MotionMode::of(&c.with_zoom(Zoom::Pulse)), MotionMode::ZoomOnly);
        assert_eq!(MotionMode::of(&c.with_pan(Pan::Up)), MotionMode::PanOnly);
        assert_eq!(
            MotionMode::of(&c.with_zoom(Zoom::ZoomOut).with_pan(Pan::Up)),
            MotionMode::Combined
        );
    }

    #[test]
    fn test_zoom_expressions() {
        assert_eq!(zoom_expression(Zoom::None, 150, 0.5), None);
        assert_eq!(zoom_expression(Zoom::ZoomIn, 150, 0.5).unwrap(), "1+(1.25-1)*on/150");
        assert_eq!(zoom_expression(Zoom::ZoomOut, 150, 1.0).unwrap(), "1.5-(1.5-1)*on/150");
        assert_eq!(zoom_expression(Zoom::KenBurns, 90, 0.0).unwrap(), "1+(1-1)*on/90");
        assert_eq!(
            zoom_expression(Zoom::Pulse, 60, 0.5).unwrap(),
            "1+0.15*sin(on/60*PI*4)"
        );
    }

    #[test]
    fn test_static_scales_to_output() {
        let out = resolve(SceneEffectConfig::new(), RenderGeometry::new(608, 1080, 5.0));
        assert_eq!(out, "scale=608:1080:flags=lanczos,setsar=1");
        assert_eq!(
            zoom_pan_filter(&SceneEffectConfig::new(), &RenderGeometry::new(608, 1080, 5.0)),
            None
        );
    }

    #[test]
    fn test_zoom_only() {
        let config = SceneEffectConfig::new().with_zoom(Zoom::ZoomIn).with_intensity(0.5);
        let out = resolve(config, RenderGeometry::new(608, 1080, 5.0));
        assert_eq!(
            out,
            "scale=2128:3780:flags=lanczos,setsar=1,\
             zoompan=z='1+(1.25-1)*on/150':d=150:\
             x='floor(iw/2-(iw/zoom/2))':y='floor(ih/2-(ih/zoom/2))':s=608x1080:fps=30"
        );
    }

    #[test]
    fn test_ken_burns_drifts_without_pan() {
        let config = SceneEffectConfig::new().with_zoom(Zoom::KenBurns);
        let out = resolve(config, RenderGeometry::new(608, 1080, 2.0));
        assert!(out.contains("x='floor(iw/2-(iw/zoom/2)+sin(on/60*PI)*50)'"));
        assert!(out.contains("y='floor(ih/2-(ih/zoom/2))'"));
    }

    #[test]
    fn test_pan_only_moves_crop_window() {
        let config = SceneEffectConfig::new().with_pan(Pan::Right).with_intensity(0.5);
        let out = resolve(config, RenderGeometry::new(608, 1080, 5.0));
        assert_eq!(
            out,
            "scale=2128:3780:flags=lanczos,setsar=1,\
             crop=608:1080:'760+n/150*304':1350,\
             scale=608:1080:flags=lanczos"
        );

        let config = SceneEffectConfig::new().with_pan(Pan::Up).with_intensity(1.0);
        let out = resolve(config, RenderGeometry::new(608, 1080, 5.0));
        assert!(out.contains("crop=608:1080:760:'1350-n/150*608'"));
    }

    #[test]
    fn test_combined_merges_into_one_zoompan() {
        let config = SceneEffectConfig::new()
            .with_zoom(Zoom::ZoomIn)
            .with_pan(Pan::Left)
            .with_intensity(1.0);
        let out = resolve(config, RenderGeometry::new(1080, 1920, 10.0));

        assert_eq!(out.matches("zoompan=").count(), 1);
        assert!(!out.contains("crop="));
        assert!(out.starts_with("scale=3780:6720:flags=lanczos,setsar=1,"));
        assert!(out.contains("z='1+(1.5-1)*on/300'"));
        assert!(out.contains("x='floor(iw/2-(iw/zoom/2)-on/300*1080)'"));
        assert!(out.contains("s=1080x1920"));
    }

    #[test]
    fn test_combined_down_pan_uses_height_centre() {
        let config = SceneEffectConfig::new()
            .with_zoom(Zoom::ZoomOut)
            .with_pan(Pan::Down)
            .with_intensity(0.5);
        let out = resolve(config, RenderGeometry::new(608, 1080, 5.0));
        assert!(out.contains("y='floor(ih/2-(ih/zoom/2)+on/150*304)'"));
    }

    #[test]
    fn test_degenerate_duration_gets_minimum_frames() {
        let config = SceneEffectConfig::new().with_zoom(Zoom::ZoomIn);
        let out = resolve(config, RenderGeometry::new(608, 1080, 0.0));
        assert!(out.contains(":d=3:"));
        assert!(out.contains("on/3"));
    }
}
