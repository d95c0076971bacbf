//! Final video assembly.
//!
//! Three stages, strictly in order, each reading the previous stage's
//! output:
//!
//! 1. **Concat** the scene clips losslessly (stream copy).
//! 2. **Speed**: retime video and voice together when the project speed is
//!    not 1.
//! 3. **Music**: loop the background track under the result at its own
//!    tempo, so it never inherits the speed change.
//!
//! Skipped stages are simply left out; the last planned stage writes the
//! final output.

use std::fmt;
use std::path::{Path, PathBuf};

use shorts_models::{EncodingConfig, ProjectAudioConfig};
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegInput, FfmpegRunner};
use crate::effects::timestamp_rescale;
use crate::error::{MediaError, MediaResult};
use crate::filter::{num, Filter, Fragment, Segment};
use crate::tempo::tempo_filters;

pub const CONCAT_LIST_FILE: &str = "concat.txt";
pub const TEMP_CONCAT_FILE: &str = "temp_concat.mp4";
pub const TEMP_SPEED_FILE: &str = "temp_speed.mp4";

/// Gain applied to the voice + music mix; `amix` without normalization
/// still leaves the voice quieter than the scene clips.
pub const MUSIC_MASTER_GAIN: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStage {
    Concat,
    Speed,
    Music,
}

impl AssemblyStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyStage::Concat => "concat",
            AssemblyStage::Speed => "speed",
            AssemblyStage::Music => "music",
        }
    }
}

impl fmt::Display for AssemblyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct AssemblyStep {
    pub stage: AssemblyStage,
    pub command: FfmpegCommand,
}

/// Ordered commands plus the concat list they depend on.
#[derive(Debug, Clone)]
pub struct AssemblyPlan {
    pub concat_list_path: PathBuf,
    /// Body of the concat list file
    pub concat_list: String,
    pub steps: Vec<AssemblyStep>,
}

impl AssemblyPlan {
    pub fn stages(&self) -> Vec<AssemblyStage> {
        self.steps.iter().map(|s| s.stage).collect()
    }

    /// Path written by the last stage.
    pub fn final_output(&self) -> Option<&Path> {
        self.steps.last().map(|s| s.command.output())
    }

    /// Write the concat list, then run every stage in order.
    pub async fn run(&self, runner: &FfmpegRunner) -> MediaResult<PathBuf> {
        tokio::fs::write(&self.concat_list_path, &self.concat_list).await?;

        let total = self.steps.len();
        for (i, step) in self.steps.iter().enumerate() {
            info!(
                stage = %step.stage,
                "Assembly step {}/{}: {}",
                i + 1,
                total,
                step.command.output().display()
            );
            runner.run(&step.command).await?;
        }

        self.final_output()
            .map(Path::to_path_buf)
            .ok_or(MediaError::NoScenes)
    }
}

/// Escape a path for a single-quoted concat list entry.
fn quote_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

/// Concat demuxer list, one `file '...'` line per clip.
///
/// Relative entries resolve against the list's directory, so callers pass
/// absolute paths.
pub fn concat_list(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|clip| format!("file '{}'\n", quote_concat_path(clip)))
        .collect()
}

pub fn concat_command(list_path: &Path, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input_with(
            FfmpegInput::new(list_path)
                .arg("-f")
                .arg("concat")
                .arg("-safe")
                .arg("0"),
        )
        .copy_streams()
}

/// `[0:v]setpts=..[v];[0:a]atempo=..[a]` for a whole-video speed change.
pub fn speed_graph(speed: f64) -> Option<String> {
    let rescale = timestamp_rescale(speed)?;
    Some(
        Fragment::graph([
            Segment::new().input("0:v").then(rescale).output("v"),
            Segment::new()
                .input("0:a")
                .then_all(tempo_filters(speed))
                .output("a"),
        ])
        .into_string(),
    )
}

pub fn speed_command(
    input: &Path,
    output: &Path,
    speed: f64,
    encoding: &EncodingConfig,
) -> Option<FfmpegCommand> {
    let graph = speed_graph(speed)?;
    Some(
        FfmpegCommand::new(output)
            .input(input)
            .filter_complex(graph)
            .map("[v]")
            .map("[a]")
            .output_args(encoding.reencode_args())
            .output_args(encoding.audio_args()),
    )
}

/// Looped music at `volume` mixed under the existing audio track.
pub fn music_graph(volume: f64) -> String {
    Fragment::graph([
        Segment::new()
            .input("1:a")
            .then(Filter::new("volume").arg(num(volume)))
            .output("m"),
        Segment::new()
            .input("0:a")
            .input("m")
            .then(
                Filter::new("amix")
                    .opt("inputs", 2)
                    .opt("duration", "first")
                    .opt("normalize", 0),
            )
            .then(Filter::new("volume").arg(num(MUSIC_MASTER_GAIN)))
            .output("a"),
    ])
    .into_string()
}

pub fn music_command(
    input: &Path,
    music: &Path,
    output: &Path,
    volume: f64,
    encoding: &EncodingConfig,
) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input(input)
        .input_with(FfmpegInput::new(music).arg("-stream_loop").arg("-1"))
        .filter_complex(music_graph(volume))
        .map("0:v")
        .map("[a]")
        .video_codec("copy")
        .output_args(encoding.audio_args())
        .shortest()
}

/// Plan the assembly of `clips` into `output`.
///
/// Intermediates go to `work_dir`. A configured music path is used as is;
/// checking that it exists is the caller's job.
pub fn plan_assembly(
    clips: &[PathBuf],
    audio: &ProjectAudioConfig,
    work_dir: &Path,
    output: &Path,
    encoding: &EncodingConfig,
) -> MediaResult<AssemblyPlan> {
    if clips.is_empty() {
        return Err(MediaError::NoScenes);
    }

    let speed = audio.video_speed;
    let music = audio.background_music_path.as_deref();
    let speed_step = audio.is_speed_changed();

    let concat_list_path = work_dir.join(CONCAT_LIST_FILE);
    let mut steps = Vec::with_capacity(3);

    let concat_target = if speed_step || music.is_some() {
        work_dir.join(TEMP_CONCAT_FILE)
    } else {
        output.to_path_buf()
    };
    steps.push(AssemblyStep {
        stage: AssemblyStage::Concat,
        command: concat_command(&concat_list_path, &concat_target),
    });
    let mut working = concat_target;

    if speed_step {
        let target = if music.is_some() {
            work_dir.join(TEMP_SPEED_FILE)
        } else {
            output.to_path_buf()
        };
        if let Some(command) = speed_command(&working, &target, speed, encoding) {
            steps.push(AssemblyStep {
                stage: AssemblyStage::Speed,
                command,
            });
            working = target;
        }
    }

    if let Some(music) = music {
        steps.push(AssemblyStep {
            stage: AssemblyStage::Music,
            command: music_command(&working, music, output, audio.music_volume(), encoding),
        });
    }

    Ok(AssemblyPlan {
        concat_list_path,
        concat_list: concat_list(clips),
        steps,
    })
}
