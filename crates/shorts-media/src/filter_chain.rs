//! Per-scene filter chain assembly.
//!
//! The stage order is fixed; reordering changes the rendered image:
//!
//! 1. speed
//! 2. zoom / pan
//! 3. rotate, bounce, 3D tilt
//! 4. shake
//! 5. saturation, color temperature, chromatic aberration, blur, glitch,
//!    vignette, film grain, light leaks, lens flare, kaleidoscope
//! 6. fade

use shorts_models::{RenderGeometry, SceneEffectConfig};
use tracing::trace;

use crate::effects::{
    blur_filter, bounce_filter, chromatic_aberration_filter, color_temperature_filter,
    fade_filter, film_grain_filter, glitch_filter, kaleidoscope_filter, lens_flare_filter,
    light_leaks_filter, rotate_filter, saturation_filter, shake_filter, speed_filter, tilt_filter,
    vignette_filter, EffectBuilder,
};
use crate::filter::{join_chain, num, Fragment};
use crate::zoompan::{output_scale, resolve_motion, zoom_pan_filter};

/// Stages between the motion slot and the fade, in application order.
const EFFECT_STAGES: &[EffectBuilder] = &[
    rotate_filter,
    bounce_filter,
    tilt_filter,
    shake_filter,
    saturation_filter,
    color_temperature_filter,
    chromatic_aberration_filter,
    blur_filter,
    glitch_filter,
    vignette_filter,
    film_grain_filter,
    light_leaks_filter,
    lens_flare_filter,
    kaleidoscope_filter,
];

fn effect_stages(config: &SceneEffectConfig, geometry: &RenderGeometry) -> Vec<Fragment> {
    EFFECT_STAGES
        .iter()
        .filter_map(|stage| stage(config, geometry))
        .collect()
}

/// Build the `-vf` chain for one scene.
///
/// `None` when the config has no active effect, so the caller can leave
/// the flag off entirely.
pub fn build_filter_chain(config: &SceneEffectConfig, geometry: &RenderGeometry) -> Option<String> {
    let config = config.normalized();
    if !has_effects(&config) {
        return None;
    }

    let mut fragments: Vec<Fragment> = speed_filter(&config, geometry).into_iter().collect();
    fragments.extend(zoom_pan_filter(&config, geometry));
    fragments.extend(effect_stages(&config, geometry));
    fragments.extend(fade_filter(&config, geometry));
    if fragments.is_empty() {
        return None;
    }

    let chain = join_chain(&fragments);
    trace!(stages = fragments.len(), chain = %chain, "Assembled filter chain");
    Some(chain)
}

/// The `-vf` value of a scene render; never empty.
///
/// Same stage order as [`build_filter_chain`], but the motion slot is always
/// filled (a plain scale when there is no zoom or pan), and the frame is
/// scaled back to the output size ahead of the fade whenever a later stage
/// ran. Shake, bounce and chromatic aberration crop the frame, and the
/// stream-copy concat needs every clip at one even size.
pub fn build_scene_filter(config: &SceneEffectConfig, geometry: &RenderGeometry) -> String {
    let config = config.normalized();

    let mut fragments: Vec<Fragment> = speed_filter(&config, geometry).into_iter().collect();
    fragments.push(resolve_motion(&config, geometry));
    let effects = effect_stages(&config, geometry);
    if !effects.is_empty() {
        fragments.extend(effects);
        fragments.push(output_scale(geometry));
    }
    fragments.extend(fade_filter(&config, geometry));

    let chain = join_chain(&fragments);
    trace!(stages = fragments.len(), chain = %chain, "Assembled scene filter");
    chain
}

/// [`build_filter_chain`] taking loose geometry values.
pub fn build_filter_chain_for(
    config: &SceneEffectConfig,
    width: u32,
    height: u32,
    duration: f64,
) -> Option<String> {
    build_filter_chain(config, &RenderGeometry::new(width, height, duration))
}

/// Labels of every active effect, in display order.
///
/// Reads the normalized config, like the chain builders.
///
/// This is the single presence predicate: [`has_effects`] and
/// [`build_filter_chain`] both defer to it.
pub fn active_effects(config: &SceneEffectConfig) -> Vec<String> {
    let config = config.normalized();
    let mut labels = Vec::new();

    if !config.zoom.is_none() {
        labels.push(format!("Zoom: {}", config.zoom));
    }
    if !config.pan.is_none() {
        labels.push(format!("Pan: {}", config.pan));
    }
    if config.is_speed_changed() {
        labels.push(format!("Speed: {}x", num(config.speed)));
    }
    if config.shake {
        labels.push("Shake".to_string());
    }
    if !config.fade.is_none() {
        labels.push(format!("Fade: {}", config.fade));
    }
    if !config.vignette.is_none() {
        labels.push(format!("Vignette: {}", config.vignette));
    }
    if !config.color_temp.is_none() {
        labels.push(format!("Color Temp: {}", config.color_temp));
    }
    if config.is_saturation_changed() {
        labels.push(format!("Saturation: {}", num(config.saturation)));
    }

    let toggles = [
        ("Film Grain", config.film_grain),
        ("Glitch", config.glitch),
        ("Chromatic Aberration", config.chromatic_aberration),
    ];
    labels.extend(toggles.iter().filter(|(_, on)| *on).map(|(l, _)| l.to_string()));

    if !config.blur.is_none() {
        labels.push(format!("Blur: {}", config.blur));
    }
    if !config.rotate.is_none() {
        labels.push(format!("Rotate: {}", config.rotate));
    }
    if config.bounce {
        labels.push("Bounce".to_string());
    }
    if !config.tilt.is_none() {
        labels.push(format!("3D Tilt: {}", config.tilt));
    }

    let toggles = [
        ("Light Leaks", config.light_leaks),
        ("Lens Flare", config.lens_flare),
        ("Kaleidoscope", config.kaleidoscope),
    ];
    labels.extend(toggles.iter().filter(|(_, on)| *on).map(|(l, _)| l.to_string()));

    labels
}

pub fn has_effects(config: &SceneEffectConfig) -> bool {
    !active_effects(config).is_empty()
}

/// Human-readable summary, e.g. `Zoom: zoom_in | Fade: both`, or `None`.
pub fn effects_summary(config: &SceneEffectConfig) -> String {
    let labels = active_effects(config);
    if labels.is_empty() {
        "None".to_string()
    } else {
        labels.join(" | ")
    }
}
