//! Per-scene effect configuration.
//!
//! Scene records arrive with `effect_*` fields that may be missing, carry
//! unknown enum values, or store toggles as integers. [`SceneEffectRecord`]
//! is that wire form; [`SceneEffectConfig`] is the resolved value every
//! renderer works with. Defaults are applied exactly once, in the
//! conversion between the two.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::effect::{Blur, ColorTemp, Fade, Pan, Rotate, Tilt, Vignette, Zoom};
use crate::lenient;

/// Intensity used when a record carries none.
pub const DEFAULT_INTENSITY: f64 = 0.5;
/// Playback speed multiplier with no effect.
pub const NEUTRAL_SPEED: f64 = 1.0;
/// Saturation multiplier with no effect.
pub const NEUTRAL_SATURATION: f64 = 1.0;
/// Saturation range accepted by the `eq` filter.
pub const SATURATION_RANGE: (f64, f64) = (0.0, 3.0);

/// Fully resolved effect configuration for one scene.
///
/// `saturation` is the literal multiplier handed to the filter (1.0 is
/// neutral, 0.0 is grayscale). It is never interpreted as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SceneEffectRecord", into = "SceneEffectRecord")]
pub struct SceneEffectConfig {
    pub zoom: Zoom,
    pub pan: Pan,
    pub speed: f64,
    pub shake: bool,
    pub fade: Fade,
    pub intensity: f64,
    pub rotate: Rotate,
    pub tilt: Tilt,
    pub blur: Blur,
    pub vignette: Vignette,
    pub color_temp: ColorTemp,
    pub saturation: f64,
    pub bounce: bool,
    pub film_grain: bool,
    pub glitch: bool,
    pub chromatic_aberration: bool,
    pub light_leaks: bool,
    pub lens_flare: bool,
    pub kaleidoscope: bool,
}

impl Default for SceneEffectConfig {
    fn default() -> Self {
        Self {
            zoom: Zoom::None,
            pan: Pan::None,
            speed: NEUTRAL_SPEED,
            shake: false,
            fade: Fade::None,
            intensity: DEFAULT_INTENSITY,
            rotate: Rotate::None,
            tilt: Tilt::None,
            blur: Blur::None,
            vignette: Vignette::None,
            color_temp: ColorTemp::None,
            saturation: NEUTRAL_SATURATION,
            bounce: false,
            film_grain: false,
            glitch: false,
            chromatic_aberration: false,
            light_leaks: false,
            lens_flare: false,
            kaleidoscope: false,
        }
    }
}

impl SceneEffectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zoom(mut self, zoom: Zoom) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_pan(mut self, pan: Pan) -> Self {
        self.pan = pan;
        self
    }

    /// Set playback speed. Non-positive or non-finite speeds become 1.0.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = normalize_speed(speed);
        self
    }

    /// Set intensity, clamped to 0.0..=1.0.
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = normalize_intensity(intensity);
        self
    }

    pub fn with_fade(mut self, fade: Fade) -> Self {
        self.fade = fade;
        self
    }

    pub fn with_rotate(mut self, rotate: Rotate) -> Self {
        self.rotate = rotate;
        self
    }

    pub fn with_tilt(mut self, tilt: Tilt) -> Self {
        self.tilt = tilt;
        self
    }

    pub fn with_blur(mut self, blur: Blur) -> Self {
        self.blur = blur;
        self
    }

    pub fn with_vignette(mut self, vignette: Vignette) -> Self {
        self.vignette = vignette;
        self
    }

    pub fn with_color_temp(mut self, color_temp: ColorTemp) -> Self {
        self.color_temp = color_temp;
        self
    }

    /// Set the saturation multiplier (1.0 = unchanged).
    pub fn with_saturation(mut self, saturation: f64) -> Self {
        self.saturation = normalize_saturation(saturation);
        self
    }

    pub fn with_shake(mut self, on: bool) -> Self {
        self.shake = on;
        self
    }

    pub fn with_bounce(mut self, on: bool) -> Self {
        self.bounce = on;
        self
    }

    pub fn with_film_grain(mut self, on: bool) -> Self {
        self.film_grain = on;
        self
    }

    pub fn with_glitch(mut self, on: bool) -> Self {
        self.glitch = on;
        self
    }

    pub fn with_chromatic_aberration(mut self, on: bool) -> Self {
        self.chromatic_aberration = on;
        self
    }

    pub fn with_light_leaks(mut self, on: bool) -> Self {
        self.light_leaks = on;
        self
    }

    pub fn with_lens_flare(mut self, on: bool) -> Self {
        self.lens_flare = on;
        self
    }

    pub fn with_kaleidoscope(mut self, on: bool) -> Self {
        self.kaleidoscope = on;
        self
    }

    /// Same config with the numeric fields brought into range.
    ///
    /// The fields are public, so a struct literal can bypass the `with_*`
    /// setters. Renderers call this once before reading the config.
    pub fn normalized(self) -> Self {
        Self {
            speed: normalize_speed(self.speed),
            intensity: normalize_intensity(self.intensity),
            saturation: normalize_saturation(self.saturation),
            ..self
        }
    }

    /// Whether playback speed differs from normal.
    pub fn is_speed_changed(&self) -> bool {
        normalize_speed(self.speed) != NEUTRAL_SPEED
    }

    /// Whether saturation differs from neutral.
    pub fn is_saturation_changed(&self) -> bool {
        normalize_saturation(self.saturation) != NEUTRAL_SATURATION
    }
}

pub(crate) fn normalize_speed(speed: f64) -> f64 {
    if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        NEUTRAL_SPEED
    }
}

fn normalize_intensity(intensity: f64) -> f64 {
    if intensity.is_finite() {
        intensity.clamp(0.0, 1.0)
    } else {
        DEFAULT_INTENSITY
    }
}

fn normalize_saturation(saturation: f64) -> f64 {
    if saturation.is_finite() {
        saturation.clamp(SATURATION_RANGE.0, SATURATION_RANGE.1)
    } else {
        NEUTRAL_SATURATION
    }
}

/// A boolean toggle as persisted: a JSON bool or a number (> 0 is on).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Toggle {
    Bool(bool),
    Number(f64),
}

impl Toggle {
    pub fn is_on(&self) -> bool {
        match *self {
            Toggle::Bool(on) => on,
            Toggle::Number(n) => n > 0.0,
        }
    }
}

/// Scene effect fields as stored on the scene record.
///
/// A field holding a value of the wrong shape reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SceneEffectRecord {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub effect_zoom: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub effect_pan: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub effect_speed: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_toggle"
    )]
    pub effect_shake: Option<Toggle>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub effect_fade: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub effect_intensity: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub effect_rotate: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub effect_tilt_3d: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub effect_blur: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub effect_vignette: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub effect_color_temp: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub effect_saturation: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_toggle"
    )]
    pub effect_bounce: Option<Toggle>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_toggle"
    )]
    pub effect_film_grain: Option<Toggle>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_toggle"
    )]
    pub effect_glitch: Option<Toggle>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_toggle"
    )]
    pub effect_chromatic: Option<Toggle>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_toggle"
    )]
    pub effect_light_leaks: Option<Toggle>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_toggle"
    )]
    pub effect_lens_flare: Option<Toggle>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_toggle"
    )]
    pub effect_kaleidoscope: Option<Toggle>,
}

fn kind<T: std::str::FromStr + Default>(value: Option<&str>) -> T {
    value.and_then(|s| s.parse().ok()).unwrap_or_default()
}

fn flag(value: Option<Toggle>) -> bool {
    value.is_some_and(|t| t.is_on())
}

impl From<SceneEffectRecord> for SceneEffectConfig {
    fn from(r: SceneEffectRecord) -> Self {
        Self {
            zoom: kind(r.effect_zoom.as_deref()),
            pan: kind(r.effect_pan.as_deref()),
            speed: normalize_speed(r.effect_speed.unwrap_or(NEUTRAL_SPEED)),
            shake: flag(r.effect_shake),
            fade: kind(r.effect_fade.as_deref()),
            intensity: normalize_intensity(r.effect_intensity.unwrap_or(DEFAULT_INTENSITY)),
            rotate: kind(r.effect_rotate.as_deref()),
            tilt: kind(r.effect_tilt_3d.as_deref()),
            blur: kind(r.effect_blur.as_deref()),
            vignette: kind(r.effect_vignette.as_deref()),
            color_temp: kind(r.effect_color_temp.as_deref()),
            saturation: normalize_saturation(r.effect_saturation.unwrap_or(NEUTRAL_SATURATION)),
            bounce: flag(r.effect_bounce),
            film_grain: flag(r.effect_film_grain),
            glitch: flag(r.effect_glitch),
            chromatic_aberration: flag(r.effect_chromatic),
            light_leaks: flag(r.effect_light_leaks),
            lens_flare: flag(r.effect_lens_flare),
            kaleidoscope: flag(r.effect_kaleidoscope),
        }
    }
}

impl From<SceneEffectConfig> for SceneEffectRecord {
    fn from(c: SceneEffectConfig) -> Self {
        Self {
            effect_zoom: Some(c.zoom.as_str().to_string()),
            effect_pan: Some(c.pan.as_str().to_string()),
            effect_speed: Some(c.speed),
            effect_shake: Some(Toggle::Bool(c.shake)),
            effect_fade: Some(c.fade.as_str().to_string()),
            effect_intensity: Some(c.intensity),
            effect_rotate: Some(c.rotate.as_str().to_string()),
            effect_tilt_3d: Some(c.tilt.as_str().to_string()),
            effect_blur: Some(c.blur.as_str().to_string()),
            effect_vignette: Some(c.vignette.as_str().to_string()),
            effect_color_temp: Some(c.color_temp.as_str().to_string()),
            effect_saturation: Some(c.saturation),
            effect_bounce: Some(Toggle::Bool(c.bounce)),
            effect_film_grain: Some(Toggle::Bool(c.film_grain)),
            effect_glitch: Some(Toggle::Bool(c.glitch)),
            effect_chromatic: Some(Toggle::Bool(c.chromatic_aberration)),
            effect_light_leaks: Some(Toggle::Bool(c.light_leaks)),
            effect_lens_flare: Some(Toggle::Bool(c.lens_flare)),
            effect_kaleidoscope: Some(Toggle::Bool(c.kaleidoscope)),
        }
    }
}
