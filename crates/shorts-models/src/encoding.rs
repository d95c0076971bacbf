//! Encoder settings shared by scene renders and final assembly.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Frame rate of every rendered scene.
pub const SCENE_FPS: u32 = 30;
/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Pixel format compatible with common players
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "192k";
/// Every scene is resampled to this rate so concat can stream-copy
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
/// Every scene is forced to stereo for the same reason
pub const DEFAULT_AUDIO_CHANNELS: u8 = 2;
/// Preset used when the concatenated video is re-encoded
pub const DEFAULT_PRESET: &str = "veryfast";
/// CRF used when the concatenated video is re-encoded
pub const DEFAULT_CRF: u8 = 23;

/// Encoder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EncodingConfig {
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    #[serde(default = "default_pixel_format")]
    pub pixel_format: String,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_audio_channels")]
    pub audio_channels: u8,

    /// Preset for the whole-video speed re-encode
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Constant Rate Factor for the whole-video speed re-encode
    #[serde(default = "default_crf")]
    pub crf: u8,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_pixel_format() -> String {
    DEFAULT_PIXEL_FORMAT.to_string()
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}
fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}
fn default_audio_channels() -> u8 {
    DEFAULT_AUDIO_CHANNELS
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_crf() -> u8 {
    DEFAULT_CRF
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            video_codec: default_video_codec(),
            pixel_format: default_pixel_format(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            audio_channels: DEFAULT_AUDIO_CHANNELS,
            preset: default_preset(),
            crf: DEFAULT_CRF,
        }
    }
}

impl EncodingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new config with updated CRF.
    pub fn with_crf(mut self, crf: u8) -> Self {
        self.crf = crf;
        self
    }

    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    /// Audio encoder arguments (`-c:a`, `-b:a`).
    pub fn audio_args(&self) -> Vec<String> {
        vec![
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-b:a".to_string(),
            self.audio_bitrate.clone(),
        ]
    }

    /// Video re-encode arguments (`-c:v`, `-preset`, `-crf`).
    pub fn reencode_args(&self) -> Vec<String> {
        vec![
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
            "-crf".to_string(),
            self.crf.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: EncodingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EncodingConfig::default());
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.audio_bitrate, "192k");
    }

    #[test]
    fn test_reencode_args() {
        let args = EncodingConfig::new().with_crf(20).reencode_args();
        assert_eq!(args, vec!["-c:v", "libx264", "-preset", "veryfast", "-crf", "20"]);
    }
}
