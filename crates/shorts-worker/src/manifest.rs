//! Render manifest: the prepared inputs for one project render.
//!
//! Scene images and voice tracks are produced upstream; the manifest only
//! points at them and carries the stored effect and audio settings.
//!
//! ```json
//! {
//!   "project_id": "p-42",
//!   "resolution": "final",
//!   "audio": { "video_speed": 1.1, "background_music_path": "/m/bed.mp3" },
//!   "scenes": [
//!     { "id": "1", "image_path": "/s/1.jpg", "voice_path": "/s/1.mp3",
//!       "effects": { "effect_zoom": "ken_burns", "effect_fade": "in_out" } }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shorts_models::{
    EncodingConfig, ProjectAudioConfig, Resolution, SceneEffectConfig, SoundEffect,
};

use crate::error::{WorkerError, WorkerResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderManifest {
    pub project_id: String,
    /// Preset name; unknown names fall back to preview
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub audio: ProjectAudioConfig,
    #[serde(default)]
    pub encoding: EncodingConfig,
    pub scenes: Vec<SceneInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneInput {
    pub id: String,
    pub image_path: PathBuf,
    pub voice_path: PathBuf,
    #[serde(default)]
    pub sound_effect: Option<SoundEffect>,
    #[serde(default)]
    pub effects: SceneEffectConfig,
}

impl RenderManifest {
    pub fn from_json(json: &str) -> WorkerResult<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub async fn from_path(path: impl AsRef<Path>) -> WorkerResult<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
            .as_deref()
            .map(Resolution::parse_lenient)
            .unwrap_or_default()
    }

    /// Structural checks only; file existence is checked per scene at
    /// render time so one bad scene doesn't sink the project.
    pub fn validate(&self) -> WorkerResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(WorkerError::invalid_manifest("project_id is empty"));
        }
        if self
            .project_id
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        {
            return Err(WorkerError::invalid_manifest(format!(
                "project_id {:?} must be alphanumeric, '-' or '_'",
                self.project_id
            )));
        }
        if self.scenes.is_empty() {
            return Err(WorkerError::invalid_manifest("no scenes"));
        }

        let mut seen = HashSet::new();
        for scene in &self.scenes {
            if !seen.insert(scene.id.as_str()) {
                return Err(WorkerError::invalid_manifest(format!(
                    "duplicate scene id {:?}",
                    scene.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_models::{Fade, Zoom};

    const MINIMAL: &str = r#"{
        "project_id": "p-1",
        "scenes": [
            {"id": "a", "image_path": "/s/a.jpg", "voice_path": "/s/a.mp3"}
        ]
    }"#;

    #[test]
    fn test_minimal_manifest_defaults() {
        let manifest = RenderManifest::from_json(MINIMAL).unwrap();
        assert_eq!(manifest.resolution(), Resolution::Preview);
        assert_eq!(manifest.audio, ProjectAudioConfig::default());
        assert_eq!(manifest.scenes[0].effects, SceneEffectConfig::default());
        assert!(manifest.scenes[0].sound_effect.is_none());
    }

    #[test]
    fn test_stored_records_are_normalized() {
        let json = r#"{
            "project_id": "p_2",
            "resolution": "FINAL",
            "audio": {"video_speed": -1, "background_music_volume": 150},
            "scenes": [{
                "id": "a", "image_path": "a.jpg", "voice_path": "a.mp3",
                "sound_effect": {"path": "boom.mp3", "offset_percent": 25},
                "effects": {"effect_zoom": "Ken_Burns", "effect_fade": "in_out", "effect_shake": 1}
            }]
        }"#;
        let manifest = RenderManifest::from_json(json).unwrap();
        assert_eq!(manifest.resolution(), Resolution::Final);
        assert_eq!(manifest.audio.video_speed, 1.0);
        assert_eq!(manifest.audio.background_music_volume_percent, 100);

        let scene = &manifest.scenes[0];
        assert_eq!(scene.effects.zoom, Zoom::KenBurns);
        assert_eq!(scene.effects.fade, Fade::Both);
        assert!(scene.effects.shake);
        let sfx = scene.sound_effect.as_ref().unwrap();
        assert_eq!(sfx.volume_percent, 50);
        assert_eq!(sfx.offset_percent, 25);
    }

    #[test]
    fn test_validation() {
        let empty = r#"{"project_id": "p", "scenes": []}"#;
        assert!(matches!(
            RenderManifest::from_json(empty),
            Err(WorkerError::InvalidManifest(_))
        ));

        let dup = r#"{"project_id": "p", "scenes": [
            {"id": "a", "image_path": "a.jpg", "voice_path": "a.mp3"},
            {"id": "a", "image_path": "b.jpg", "voice_path": "b.mp3"}
        ]}"#;
        assert!(matches!(
            RenderManifest::from_json(dup),
            Err(WorkerError::InvalidManifest(_))
        ));

        let traversal = r#"{"project_id": "../etc", "scenes": [
            {"id": "a", "image_path": "a.jpg", "voice_path": "a.mp3"}
        ]}"#;
        assert!(RenderManifest::from_json(traversal).is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            RenderManifest::from_json("{"),
            Err(WorkerError::ManifestParse(_))
        ));
    }
}
