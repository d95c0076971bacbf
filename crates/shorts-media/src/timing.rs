//! Frame and timing arithmetic shared by the effect builders.

use shorts_models::{clamp_duration, SCENE_FPS};

/// Fewest frames an animated filter is ever given.
pub const MIN_FRAMES: u32 = 3;

/// Frame count for `duration` seconds at the scene frame rate.
pub fn frame_count(duration: f64) -> u32 {
    frame_count_at(duration, SCENE_FPS)
}

/// `max(3, floor(max(duration, 0.1) * fps))`.
pub fn frame_count_at(duration: f64, fps: u32) -> u32 {
    let frames = (clamp_duration(duration) * f64::from(fps)).floor();
    // `as` saturates on overflow
    (frames as u32).max(MIN_FRAMES)
}

/// Intensity as seen by the builders.
///
/// Values are clamped to 0.0..=1.0 when `SceneEffectConfig` is built, so
/// this is a passthrough.
#[inline]
pub fn clamp_intensity(intensity: f64) -> f64 {
    intensity
}
