//! Color grading effects.

use shorts_models::{ColorTemp, RenderGeometry, SceneEffectConfig, Vignette};

use crate::filter::{num, Filter, Fragment, Segment};
use crate::timing::clamp_intensity;

/// Saturation multiplier, passed to `eq` unchanged.
pub fn saturation_filter(config: &SceneEffectConfig, _geometry: &RenderGeometry) -> Option<Fragment> {
    if !config.is_saturation_changed() {
        return None;
    }
    Some(Fragment::filter(Filter::new("eq").opt("saturation", num(config.saturation))))
}

/// Warm raises red gamma up to +30% and lowers blue up to -20%; cool is the inverse.
pub fn color_temperature_filter(
    config: &SceneEffectConfig,
    _geometry: &RenderGeometry,
) -> Option<Fragment> {
    let i = clamp_intensity(config.intensity);
    let (red, blue) = match config.color_temp {
        ColorTemp::None => return None,
        ColorTemp::Warm => (1.0 + i * 0.3, 1.0 - i * 0.2),
        ColorTemp::Cool => (1.0 - i * 0.2, 1.0 + i * 0.3),
    };
    Some(Fragment::filter(
        Filter::new("eq")
            .opt("gamma_r", num(red))
            .opt("gamma_b", num(blue)),
    ))
}

/// Horizontal RGB separation in pixels, always even.
///
/// The crops below shrink the width by this amount and H.264 needs even
/// frame widths.
pub fn chromatic_shift(intensity: f64) -> u32 {
    let shift = (2.0 + clamp_intensity(intensity) * 6.0).floor() as u32;
    shift - shift % 2
}

/// Split into R/G/B planes, crop each at a growing offset, add them back.
pub fn chromatic_aberration_filter(
    config: &SceneEffectConfig,
    _geometry: &RenderGeometry,
) -> Option<Fragment> {
    if !config.chromatic_aberration {
        return None;
    }
    let shift = chromatic_shift(config.intensity);
    let width = format!("iw-{shift}");
    let plane = |keep_off: [&'static str; 2], offset: u32| {
        (
            Filter::new("lutrgb").opt(keep_off[0], 0).opt(keep_off[1], 0),
            Filter::new("crop").arg(&width).arg("ih").arg(offset).arg(0),
        )
    };

    let (red_lut, red_crop) = plane(["g", "b"], 0);
    let (green_lut, green_crop) = plane(["r", "b"], shift / 2);
    let (blue_lut, blue_crop) = plane(["r", "g"], shift);
    let additive = || Filter::new("blend").opt("all_mode", "addition");

    Some(Fragment::graph([
        Segment::new()
            .then(Filter::new("split").arg(3))
            .output("r")
            .output("g")
            .output("b"),
        Segment::new().input("r").then(red_lut).then(red_crop).output("r1"),
        Segment::new().input("g").then(green_lut).then(green_crop).output("g1"),
        Segment::new().input("b").then(blue_lut).then(blue_crop).output("b1"),
        Segment::new().input("r1").input("g1").then(additive()).output("rg"),
        Segment::new().input("rg").input("b1").then(additive()),
    ]))
}

/// Edge darkening (`dark`) or brightening (`light`).
///
/// Strength runs 0.3 to 0.7 with intensity and scales the lens angle,
/// whose valid range is 0 to PI/2.
pub fn vignette_filter(config: &SceneEffectConfig, _geometry: &RenderGeometry) -> Option<Fragment> {
    let mode = match config.vignette {
        Vignette::None => return None,
        Vignette::Dark => "forward",
        Vignette::Light => "backward",
    };
    let strength = 0.3 + clamp_intensity(config.intensity) * 0.4;
    Some(Fragment::filter(
        Filter::new("vignette")
            .opt("angle", format!("PI/2*{}", num(strength)))
            .opt("mode", mode),
    ))
}
