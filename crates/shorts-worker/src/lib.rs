//! Render worker.
//!
//! This crate provides:
//! - Render manifest loading and validation
//! - Per-scene clip rendering with sound effect mixing
//! - Final assembly (concat, speed change, background music)
//! - Scene timeline reporting

pub mod config;
pub mod error;
pub mod manifest;
pub mod metrics;
pub mod renderer;
pub mod timeline;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use manifest::{RenderManifest, SceneInput};
pub use renderer::{ProjectRenderer, RenderReport, SkippedScene};
pub use timeline::{SceneTiming, Timeline};
