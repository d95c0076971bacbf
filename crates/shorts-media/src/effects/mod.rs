//! Single-effect filter builders.
//!
//! Every builder has the same shape, [`EffectBuilder`]: it reads the fields
//! it cares about from a resolved [`SceneEffectConfig`] and returns `None`
//! when its effect is off or neutral.

use shorts_models::{RenderGeometry, SceneEffectConfig};

use crate::filter::Fragment;

pub mod color;
pub mod motion;
pub mod texture;
pub mod transition;

pub use color::{
    chromatic_aberration_filter, chromatic_shift, color_temperature_filter, saturation_filter,
    vignette_filter,
};
pub use motion::{
    bounce_filter, bounce_height, rotate_filter, shake_amount, shake_filter, speed_filter,
    tilt_filter, timestamp_rescale,
};
pub use texture::{
    blur_filter, film_grain_filter, glitch_filter, kaleidoscope_filter, lens_flare_filter,
    light_leaks_filter,
};
pub use transition::{fade_duration, fade_filter};

/// Signature shared by all single-effect builders.
pub type EffectBuilder = fn(&SceneEffectConfig, &RenderGeometry) -> Option<Fragment>;
