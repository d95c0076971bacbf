//! Project rendering: scene clips, then final assembly.
//!
//! Scenes render one at a time into a per-render work directory. A scene
//! that fails is logged and skipped; the render only fails when no scene
//! produced a clip. Cancellation aborts everything.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use shorts_media::{
    effects_summary, plan_assembly, probe_duration, sound_effect_mix_command, FfmpegRunner,
    MediaError, MediaResult, SceneRender,
};
use shorts_models::{EncodingConfig, ProjectAudioConfig, Resolution};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::manifest::{RenderManifest, SceneInput};
use crate::metrics;
use crate::timeline::Timeline;

/// A scene left out of the final video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedScene {
    pub index: usize,
    pub id: String,
    pub reason: String,
}

/// Outcome of a project render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderReport {
    pub project_id: String,
    pub resolution: Resolution,
    pub output_path: PathBuf,
    /// Scene offsets in the final video, after the project speed change
    pub timeline: Timeline,
    pub skipped_scenes: Vec<SkippedScene>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Scene clips produced by the first phase.
struct RenderedScenes {
    clips: Vec<PathBuf>,
    timeline: Timeline,
    skipped: Vec<SkippedScene>,
}

pub struct ProjectRenderer {
    config: WorkerConfig,
    runner: FfmpegRunner,
}

impl ProjectRenderer {
    pub fn new(config: WorkerConfig) -> Self {
        let runner = FfmpegRunner::new().with_timeout(config.ffmpeg_timeout.as_secs());
        Self { config, runner }
    }

    /// Abort running and pending FFmpeg processes once `cancel_rx` is true.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.runner = self.runner.with_cancel(cancel_rx);
        self
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Render a project end to end.
    pub async fn render(&self, manifest: &RenderManifest) -> WorkerResult<RenderReport> {
        let span = info_span!("render", project_id = %manifest.project_id);
        let resolution = manifest.resolution();
        let started = Instant::now();

        let result = self.render_with_work_dir(manifest).instrument(span).await;

        match &result {
            Ok(report) => {
                metrics::record_render_completed(resolution.as_str(), started.elapsed().as_secs_f64());
                info!(
                    project_id = %report.project_id,
                    scenes = report.timeline.len(),
                    skipped = report.skipped_scenes.len(),
                    duration = report.timeline.total_duration,
                    "Render complete: {}",
                    report.output_path.display()
                );
            }
            Err(_) => metrics::record_render_failed(resolution.as_str()),
        }
        result
    }

    async fn render_with_work_dir(&self, manifest: &RenderManifest) -> WorkerResult<RenderReport> {
        let job_dir = self
            .config
            .work_dir
            .join(format!("{}-{}", manifest.project_id, Uuid::new_v4()));
        tokio::fs::create_dir_all(&job_dir).await?;
        // Concat lists need absolute clip paths
        let job_dir = tokio::fs::canonicalize(&job_dir).await?;
        debug!("Work directory: {}", job_dir.display());

        let result = self.render_in(manifest, &job_dir).await;

        if self.config.keep_temp {
            info!("Keeping work directory {}", job_dir.display());
        } else if let Err(e) = tokio::fs::remove_dir_all(&job_dir).await {
            warn!("Failed to remove work directory {}: {}", job_dir.display(), e);
        }

        result
    }

    async fn render_in(&self, manifest: &RenderManifest, job_dir: &Path) -> WorkerResult<RenderReport> {
        let started_at = Utc::now();
        let resolution = manifest.resolution();

        info!(
            scenes = manifest.scenes.len(),
            resolution = %resolution,
            "Rendering project"
        );

        let rendered = self.render_scenes(manifest, resolution, job_dir).await?;

        let audio = resolve_music(&manifest.audio).await;
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let output = self
            .config
            .output_dir
            .join(format!("{}.mp4", manifest.project_id));

        let plan = plan_assembly(&rendered.clips, &audio, job_dir, &output, &manifest.encoding)?;
        info!(stages = ?plan.stages(), "Assembling {} clips", rendered.clips.len());
        let output_path = plan.run(&self.runner).await?;

        Ok(RenderReport {
            project_id: manifest.project_id.clone(),
            resolution,
            output_path,
            timeline: rendered.timeline.at_speed(audio.video_speed),
            skipped_scenes: rendered.skipped,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn render_scenes(
        &self,
        manifest: &RenderManifest,
        resolution: Resolution,
        job_dir: &Path,
    ) -> WorkerResult<RenderedScenes> {
        let total = manifest.scenes.len();
        let mut rendered = RenderedScenes {
            clips: Vec::with_capacity(total),
            timeline: Timeline::new(),
            skipped: Vec::new(),
        };

        for (index, scene) in manifest.scenes.iter().enumerate() {
            let started = Instant::now();
            match self
                .render_scene(index, scene, resolution, &manifest.encoding, job_dir)
                .await
            {
                Ok((clip, duration)) => {
                    metrics::record_scene_rendered(resolution.as_str(), started.elapsed().as_secs_f64());
                    info!(
                        scene_id = %scene.id,
                        "Scene {}/{} rendered ({:.2}s)",
                        index + 1,
                        total,
                        duration
                    );
                    rendered.timeline.push(index, &scene.id, duration);
                    rendered.clips.push(clip);
                }
                Err(MediaError::Cancelled) => return Err(MediaError::Cancelled.into()),
                Err(source) => {
                    metrics::record_scene_failed(resolution.as_str());
                    let err = WorkerError::scene_failed(&scene.id, source);
                    warn!(scene_id = %scene.id, index, "Skipping scene: {}", err);
                    rendered.skipped.push(SkippedScene {
                        index,
                        id: scene.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        if rendered.clips.is_empty() {
            return Err(WorkerError::NoScenesRendered {
                failed: rendered.skipped.len(),
                total,
            });
        }
        Ok(rendered)
    }

    /// Render one scene clip; returns its path and measured duration.
    async fn render_scene(
        &self,
        index: usize,
        scene: &SceneInput,
        resolution: Resolution,
        encoding: &EncodingConfig,
        job_dir: &Path,
    ) -> MediaResult<(PathBuf, f64)> {
        if !tokio::fs::try_exists(&scene.image_path).await.unwrap_or(false) {
            return Err(MediaError::FileNotFound(scene.image_path.clone()));
        }
        let voice_duration = probe_duration(&scene.voice_path).await?;
        let audio_path = self
            .prepare_audio(index, scene, voice_duration, encoding, job_dir)
            .await;

        let (width, height) = resolution.dimensions();
        let render = SceneRender {
            image_path: scene.image_path.clone(),
            audio_path,
            output_path: job_dir.join(format!("scene_{index}.mp4")),
            audio_duration: voice_duration,
            width,
            height,
            effects: scene.effects,
        };

        info!(
            scene_id = %scene.id,
            effects = %effects_summary(&scene.effects),
            duration = render.geometry().duration,
            "Rendering scene {}",
            index + 1
        );
        self.runner.run(&render.build_command(encoding)).await?;

        let duration = probe_duration(&render.output_path).await?;
        Ok((render.output_path, duration))
    }

    /// Voice track for a scene, with its sound effect mixed in when one is
    /// configured and usable. Mix problems fall back to the plain voice.
    async fn prepare_audio(
        &self,
        index: usize,
        scene: &SceneInput,
        voice_duration: f64,
        encoding: &EncodingConfig,
        job_dir: &Path,
    ) -> PathBuf {
        let Some(effect) = &scene.sound_effect else {
            return scene.voice_path.clone();
        };

        if !tokio::fs::try_exists(&effect.path).await.unwrap_or(false) {
            warn!(
                scene_id = %scene.id,
                "Sound effect not found, using voice only: {}",
                effect.path.display()
            );
            return scene.voice_path.clone();
        }

        let mixed = job_dir.join(format!("mixed_audio_{index}.mp3"));
        let cmd = sound_effect_mix_command(&scene.voice_path, effect, voice_duration, &mixed, encoding);
        match self.runner.run(&cmd).await {
            Ok(()) => {
                debug!(
                    scene_id = %scene.id,
                    volume = effect.volume_percent,
                    offset = effect.offset_percent,
                    "Mixed sound effect"
                );
                mixed
            }
            Err(e) => {
                warn!(scene_id = %scene.id, "Sound effect mix failed, using voice only: {}", e);
                scene.voice_path.clone()
            }
        }
    }
}

/// Drop background music that isn't on disk.
async fn resolve_music(audio: &ProjectAudioConfig) -> ProjectAudioConfig {
    match &audio.background_music_path {
        Some(path) if !tokio::fs::try_exists(path).await.unwrap_or(false) => {
            warn!("Background music not found, skipping: {}", path.display());
            audio.clone().without_music()
        }
        _ => audio.clone(),
    }
}
