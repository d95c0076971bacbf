//! Scene effects and FFmpeg command assembly.
//!
//! This crate provides:
//! - Typed filter-graph construction ([`filter`])
//! - One builder per visual effect ([`effects`]) and the zoom/pan resolver
//! - The per-scene filter chain in its fixed stage order
//! - Scene render, sound-effect mix and final assembly commands
//! - An async FFmpeg runner with timeout and cancellation, and an ffprobe
//!   duration probe
//!
//! Everything up to command construction is pure; only [`command`],
//! [`probe`] and [`AssemblyPlan::run`] touch processes or files.

pub mod assembly;
pub mod command;
pub mod effects;
pub mod error;
pub mod filter;
pub mod filter_chain;
pub mod probe;
pub mod scene;
pub mod tempo;
pub mod timing;
pub mod zoompan;

pub use assembly::{
    concat_list, plan_assembly, AssemblyPlan, AssemblyStage, AssemblyStep, MUSIC_MASTER_GAIN,
};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegInput, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use filter::{Filter, Fragment, Segment};
pub use filter_chain::{
    active_effects, build_filter_chain, build_filter_chain_for, build_scene_filter, effects_summary,
    has_effects,
};
pub use probe::probe_duration;
pub use scene::{sound_effect_mix_command, video_duration, SceneRender};
pub use tempo::{build_audio_tempo_filter, tempo_stages};
pub use timing::{clamp_intensity, frame_count, MIN_FRAMES};
pub use zoompan::{output_scale, resolve_motion, MotionMode, OVERSAMPLE};
