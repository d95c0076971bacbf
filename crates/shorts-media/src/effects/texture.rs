//! Blur, noise, light and mirror effects.

use shorts_models::{Blur, RenderGeometry, SceneEffectConfig, SCENE_FPS};

use crate::filter::{num, Filter, Fragment, Segment};
use crate::timing::clamp_intensity;

pub fn blur_filter(config: &SceneEffectConfig, geometry: &RenderGeometry) -> Option<Fragment> {
    let i = clamp_intensity(config.intensity);
    let filter = match config.blur {
        Blur::None => return None,
        // sigma 2..10
        Blur::Gaussian => Filter::new("gblur").opt("sigma", num(2.0 + i * 8.0)),
        // radius 5..20, one pass
        Blur::Motion => Filter::new("boxblur")
            .arg((5.0 + i * 15.0).floor() as u32)
            .arg(1),
        Blur::Radial => Filter::new("zoompan")
            .expr_opt("z", "zoom+0.002")
            .opt("d", 1)
            .opt("s", geometry.size())
            .opt("fps", SCENE_FPS),
    };
    Some(Fragment::filter(filter))
}

/// Temporal noise topped with a contrast boost.
pub fn glitch_filter(config: &SceneEffectConfig, _geometry: &RenderGeometry) -> Option<Fragment> {
    if !config.glitch {
        return None;
    }
    let strength = (5.0 + clamp_intensity(config.intensity) * 15.0).floor() as u32;
    Some(Fragment::chain([
        Filter::new("noise").opt("alls", strength).opt("allf", "t+u"),
        Filter::new("eq").opt("contrast", "1.2"),
    ]))
}

pub fn film_grain_filter(config: &SceneEffectConfig, _geometry: &RenderGeometry) -> Option<Fragment> {
    if !config.film_grain {
        return None;
    }
    let strength = (20.0 + clamp_intensity(config.intensity) * 40.0).floor() as u32;
    Some(Fragment::filter(
        Filter::new("noise").opt("alls", strength).opt("allf", "t"),
    ))
}

pub fn light_leaks_filter(config: &SceneEffectConfig, _geometry: &RenderGeometry) -> Option<Fragment> {
    if !config.light_leaks {
        return None;
    }
    let brightness = 0.1 + clamp_intensity(config.intensity) * 0.2;
    Some(Fragment::chain([
        Filter::new("eq")
            .opt("brightness", num(brightness))
            .opt("contrast", "1.1"),
        Filter::new("hue").opt("s", "1.2"),
    ]))
}

pub fn lens_flare_filter(config: &SceneEffectConfig, _geometry: &RenderGeometry) -> Option<Fragment> {
    if !config.lens_flare {
        return None;
    }
    let brightness = 0.15 + clamp_intensity(config.intensity) * 0.25;
    Some(Fragment::chain([
        Filter::new("eq")
            .opt("brightness", num(brightness))
            .opt("contrast", "1.15"),
        Filter::new("gblur").opt("sigma", 2),
    ]))
}

/// Top-left quadrant mirrored into a 2x2 mosaic.
pub fn kaleidoscope_filter(config: &SceneEffectConfig, _geometry: &RenderGeometry) -> Option<Fragment> {
    if !config.kaleidoscope {
        return None;
    }
    Some(Fragment::graph([
        Segment::new()
            .then(Filter::new("crop").arg("iw/2").arg("ih/2").arg(0).arg(0))
            .then(Filter::new("split").arg(4))
            .output("tl")
            .output("tr")
            .output("bl")
            .output("br"),
        Segment::new().input("tr").then(Filter::new("hflip")).output("trm"),
        Segment::new().input("bl").then(Filter::new("vflip")).output("blm"),
        Segment::new()
            .input("br")
            .then(Filter::new("hflip"))
            .then(Filter::new("vflip"))
            .output("brm"),
        Segment::new().input("tl").input("trm").then(Filter::new("hstack")).output("top"),
        Segment::new().input("blm").input("brm").then(Filter::new("hstack")).output("bottom"),
        Segment::new().input("top").input("bottom").then(Filter::new("vstack")),
    ]))
}
