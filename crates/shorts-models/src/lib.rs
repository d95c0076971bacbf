//! Shared data models for the shorts rendering backend.
//!
//! This crate provides Serde-serializable types for:
//! - Scene effect configuration and its lenient record form
//! - Effect vocabularies (zoom, pan, fade, rotate, tilt, blur, ...)
//! - Render geometry and resolution presets
//! - Project audio settings and scene sound effects
//! - Encoder configuration

pub mod audio;
pub mod effect;
pub mod encoding;
pub mod geometry;
mod lenient;
pub mod scene;

// Re-export common types
pub use audio::{ProjectAudioConfig, ProjectAudioRecord, SoundEffect};
pub use effect::{Blur, ColorTemp, EffectParseError, Fade, Pan, Rotate, Tilt, Vignette, Zoom};
pub use encoding::{EncodingConfig, SCENE_FPS};
pub use geometry::{clamp_duration, RenderGeometry, Resolution, MIN_DURATION_SECS};
pub use scene::{SceneEffectConfig, SceneEffectRecord, Toggle};
