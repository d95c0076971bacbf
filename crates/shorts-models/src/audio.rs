//! Project-level audio settings and per-scene sound effects.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

use crate::lenient;
use crate::scene::normalize_speed;

/// Background music volume used when a project has none stored.
pub const DEFAULT_MUSIC_VOLUME_PERCENT: u8 = 7;
/// Sound effect volume used when a scene has none stored.
pub const DEFAULT_SOUND_EFFECT_VOLUME_PERCENT: u8 = 50;

/// Whole-video audio settings consumed by final assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProjectAudioRecord", into = "ProjectAudioRecord")]
pub struct ProjectAudioConfig {
    /// Playback multiplier for the concatenated video, always > 0
    pub video_speed: f64,
    pub background_music_path: Option<PathBuf>,
    /// Music volume, 0-100
    pub background_music_volume_percent: u8,
}

impl Default for ProjectAudioConfig {
    fn default() -> Self {
        Self {
            video_speed: 1.0,
            background_music_path: None,
            background_music_volume_percent: DEFAULT_MUSIC_VOLUME_PERCENT,
        }
    }
}

impl ProjectAudioConfig {
    pub fn new(
        video_speed: f64,
        background_music_path: Option<PathBuf>,
        background_music_volume_percent: f64,
    ) -> Self {
        Self {
            video_speed: normalize_speed(video_speed),
            background_music_path,
            background_music_volume_percent: percent(background_music_volume_percent),
        }
    }

    /// Music gain as a linear scalar (volume percent / 100).
    pub fn music_volume(&self) -> f64 {
        f64::from(self.background_music_volume_percent) / 100.0
    }

    pub fn is_speed_changed(&self) -> bool {
        self.video_speed != 1.0
    }

    /// Same settings without background music.
    pub fn without_music(mut self) -> Self {
        self.background_music_path = None;
        self
    }
}

fn percent(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

/// Project audio fields as stored on the project record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ProjectAudioRecord {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub video_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_music_path: Option<PathBuf>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub background_music_volume: Option<f64>,
}

impl From<ProjectAudioRecord> for ProjectAudioConfig {
    fn from(r: ProjectAudioRecord) -> Self {
        Self::new(
            r.video_speed.unwrap_or(1.0),
            r.background_music_path,
            r.background_music_volume
                .unwrap_or(f64::from(DEFAULT_MUSIC_VOLUME_PERCENT)),
        )
    }
}

impl From<ProjectAudioConfig> for ProjectAudioRecord {
    fn from(c: ProjectAudioConfig) -> Self {
        Self {
            video_speed: Some(c.video_speed),
            background_music_path: c.background_music_path,
            background_music_volume: Some(f64::from(c.background_music_volume_percent)),
        }
    }
}

/// A sound effect layered under one scene's voice track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SoundEffect {
    pub path: PathBuf,
    /// Effect volume, 0-100
    #[serde(
        default = "default_sound_effect_volume",
        deserialize_with = "sound_effect_volume"
    )]
    pub volume_percent: u8,
    /// Start position as a percentage of the voice track (0 = start, 100 = end)
    #[serde(default, deserialize_with = "sound_effect_offset")]
    pub offset_percent: u8,
}

fn default_sound_effect_volume() -> u8 {
    DEFAULT_SOUND_EFFECT_VOLUME_PERCENT
}

fn sound_effect_volume<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(lenient::optional_percent(deserializer)?.unwrap_or(DEFAULT_SOUND_EFFECT_VOLUME_PERCENT))
}

fn sound_effect_offset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(lenient::optional_percent(deserializer)?.unwrap_or(0))
}

impl SoundEffect {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            volume_percent: DEFAULT_SOUND_EFFECT_VOLUME_PERCENT,
            offset_percent: 0,
        }
    }

    pub fn with_volume(mut self, percent: u8) -> Self {
        self.volume_percent = percent.min(100);
        self
    }

    pub fn with_offset(mut self, percent: u8) -> Self {
        self.offset_percent = percent.min(100);
        self
    }

    /// Effect gain as a linear scalar.
    pub fn volume(&self) -> f64 {
        f64::from(self.volume_percent.min(100)) / 100.0
    }

    /// Delay before the effect starts, in whole milliseconds.
    pub fn delay_ms(&self, voice_duration: f64) -> u64 {
        let offset = f64::from(self.offset_percent.min(100)) / 100.0;
        let delay = voice_duration.max(0.0) * offset * 1000.0;
        if delay.is_finite() {
            delay as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_audio_defaults() {
        let audio: ProjectAudioConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(audio.video_speed, 1.0);
        assert_eq!(audio.background_music_path, None);
        assert_eq!(audio.background_music_volume_percent, 7);
        assert!((audio.music_volume() - 0.07).abs() < 1e-9);
    }

    #[test]
    fn test_project_audio_normalizes() {
        let audio = ProjectAudioConfig::new(0.0, None, 250.0);
        assert_eq!(audio.video_speed, 1.0);
        assert_eq!(audio.background_music_volume_percent, 100);

        let audio: ProjectAudioConfig = serde_json::from_value(json!({
            "video_speed": -1.5,
            "background_music_volume": -3,
        }))
        .unwrap();
        assert_eq!(audio.video_speed, 1.0);
        assert_eq!(audio.background_music_volume_percent, 0);
    }

    #[test]
    fn test_sound_effect_delay() {
        let sfx = SoundEffect::new("/tmp/whoosh.mp3").with_offset(50);
        assert_eq!(sfx.delay_ms(4.0), 2000);
        assert_eq!(sfx.delay_ms(-1.0), 0);
        assert!((sfx.volume() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_percentages_are_clamped() {
        let sfx: SoundEffect =
            serde_json::from_value(json!({ "path": "/a.mp3", "volume_percent": 400, "offset_percent": "mid" }))
                .unwrap();
        assert_eq!(sfx.volume_percent, 100);
        assert_eq!(sfx.offset_percent, 0);

        let audio: ProjectAudioConfig =
            serde_json::from_value(json!({ "video_speed": "2", "background_music_volume": "loud" })).unwrap();
        assert_eq!(audio.video_speed, 2.0);
        assert_eq!(audio.background_music_volume_percent, DEFAULT_MUSIC_VOLUME_PERCENT);
    }

    #[test]
    fn test_sound_effect_defaults_from_json() {
        let sfx: SoundEffect = serde_json::from_value(json!({ "path": "/a.mp3" })).unwrap();
        assert_eq!(sfx.volume_percent, 50);
        assert_eq!(sfx.offset_percent, 0);
    }
}
