//! Render metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! these calls are no-ops.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const SCENES_RENDERED_TOTAL: &str = "shorts_scenes_rendered_total";
    pub const SCENES_FAILED_TOTAL: &str = "shorts_scenes_failed_total";
    pub const SCENE_RENDER_DURATION_SECONDS: &str = "shorts_scene_render_duration_seconds";
    pub const RENDERS_COMPLETED_TOTAL: &str = "shorts_renders_completed_total";
    pub const RENDERS_FAILED_TOTAL: &str = "shorts_renders_failed_total";
    pub const RENDER_DURATION_SECONDS: &str = "shorts_render_duration_seconds";
}

pub fn record_scene_rendered(resolution: &str, duration_secs: f64) {
    let labels = [("resolution", resolution.to_string())];
    counter!(names::SCENES_RENDERED_TOTAL, &labels).increment(1);
    histogram!(names::SCENE_RENDER_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_scene_failed(resolution: &str) {
    let labels = [("resolution", resolution.to_string())];
    counter!(names::SCENES_FAILED_TOTAL, &labels).increment(1);
}

pub fn record_render_completed(resolution: &str, duration_secs: f64) {
    let labels = [("resolution", resolution.to_string())];
    counter!(names::RENDERS_COMPLETED_TOTAL, &labels).increment(1);
    histogram!(names::RENDER_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_render_failed(resolution: &str) {
    let labels = [("resolution", resolution.to_string())];
    counter!(names::RENDERS_FAILED_TOTAL, &labels).increment(1);
}
