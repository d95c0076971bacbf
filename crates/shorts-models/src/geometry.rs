//! Output geometry and resolution presets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Shortest clip duration any filter arithmetic will see, in seconds.
pub const MIN_DURATION_SECS: f64 = 0.1;
/// Smallest frame edge accepted by the encoder.
pub const MIN_DIMENSION: u32 = 2;

/// Width, height and duration of one rendered scene.
///
/// Construction clamps degenerate values instead of rejecting them, so a
/// half-specified scene still renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderGeometry {
    pub width: u32,
    pub height: u32,
    /// Duration in seconds, never below [`MIN_DURATION_SECS`]
    pub duration: f64,
}

impl RenderGeometry {
    pub fn new(width: u32, height: u32, duration: f64) -> Self {
        Self {
            width: width.max(MIN_DIMENSION),
            height: height.max(MIN_DIMENSION),
            duration: clamp_duration(duration),
        }
    }

    /// Geometry of a resolution preset with the given duration.
    pub fn for_resolution(resolution: Resolution, duration: f64) -> Self {
        let (width, height) = resolution.dimensions();
        Self::new(width, height, duration)
    }

    /// Output size as used by `s=` options, e.g. `1080x1920`.
    pub fn size(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Clamp a duration to the positive floor. Non-finite values also floor.
pub fn clamp_duration(duration: f64) -> f64 {
    if duration.is_finite() {
        duration.max(MIN_DURATION_SECS)
    } else {
        MIN_DURATION_SECS
    }
}

/// Output resolution preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Fast preview render (608x1080)
    #[default]
    Preview,
    /// Full portrait render (1080x1920)
    Final,
}

impl Resolution {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Resolution::Preview => (608, 1080),
            Resolution::Final => (1080, 1920),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Preview => "preview",
            Resolution::Final => "final",
        }
    }

    /// Parse a preset name, falling back to [`Resolution::Preview`].
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preview" => Ok(Resolution::Preview),
            "final" => Ok(Resolution::Final),
            _ => Err(ResolutionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown resolution: {0}")]
pub struct ResolutionParseError(String);
