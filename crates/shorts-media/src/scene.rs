//! Per-scene render commands.
//!
//! A scene is a still image looped at the scene frame rate under its voice
//! track. The visual duration is the voice duration divided by the scene
//! speed; the voice itself is retimed with chained `atempo` stages.

use std::path::{Path, PathBuf};

use shorts_models::{
    EncodingConfig, RenderGeometry, SceneEffectConfig, SoundEffect, SCENE_FPS,
};

use crate::command::{FfmpegCommand, FfmpegInput};
use crate::filter::{num, Filter, Fragment, Segment};
use crate::filter_chain::build_scene_filter;
use crate::tempo::build_audio_tempo_filter;

/// Codec of the intermediate voice + sound effect mix.
pub const MIX_AUDIO_CODEC: &str = "libmp3lame";

/// Visual duration for a voice track played at `speed`.
pub fn video_duration(audio_duration: f64, speed: f64) -> f64 {
    if speed.is_finite() && speed > 0.0 {
        audio_duration / speed
    } else {
        audio_duration
    }
}

/// Everything needed to render one scene clip.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRender {
    pub image_path: PathBuf,
    pub audio_path: PathBuf,
    pub output_path: PathBuf,
    /// Measured duration of `audio_path`, in seconds
    pub audio_duration: f64,
    pub width: u32,
    pub height: u32,
    pub effects: SceneEffectConfig,
}

impl SceneRender {
    pub fn geometry(&self) -> RenderGeometry {
        RenderGeometry::new(
            self.width,
            self.height,
            video_duration(self.audio_duration, self.effects.normalized().speed),
        )
    }

    /// The `-vf` value: the effect chain with the output size pinned.
    pub fn video_filter(&self) -> String {
        build_scene_filter(&self.effects, &self.geometry())
    }

    /// The `-af` value, present only when the scene is retimed.
    pub fn audio_filter(&self) -> Option<String> {
        let tempo = build_audio_tempo_filter(self.effects.normalized().speed);
        (!tempo.is_empty()).then_some(tempo)
    }

    pub fn build_command(&self, encoding: &EncodingConfig) -> FfmpegCommand {
        let geometry = self.geometry();

        let mut cmd = FfmpegCommand::new(&self.output_path)
            .input_with(
                FfmpegInput::new(&self.image_path)
                    .arg("-loop")
                    .arg("1")
                    // zoompan needs a defined input rate on a looped still
                    .arg("-framerate")
                    .arg(SCENE_FPS.to_string()),
            )
            .input(&self.audio_path)
            .video_codec(&encoding.video_codec)
            .duration(geometry.duration)
            .pixel_format(&encoding.pixel_format);

        cmd = cmd.video_filter(self.video_filter());
        if let Some(filter) = self.audio_filter() {
            cmd = cmd.audio_filter(filter);
        }

        cmd.audio_codec(&encoding.audio_codec)
            .audio_bitrate(&encoding.audio_bitrate)
            .output_args(["-ar".to_string(), encoding.sample_rate.to_string()])
            .output_args(["-ac".to_string(), encoding.audio_channels.to_string()])
            .shortest()
    }
}

/// `filter_complex` graph layering a sound effect under a voice track.
///
/// Both streams are normalized to 44.1 kHz stereo first; voice sample
/// formats vary by provider.
pub fn sound_effect_graph(effect: &SoundEffect, voice_duration: f64, sample_rate: u32) -> String {
    let delay = effect.delay_ms(voice_duration);
    let normalize = |input: &str| {
        Segment::new()
            .input(input)
            .then(Filter::new("aresample").arg(sample_rate))
            .then(Filter::new("aformat").opt("channel_layouts", "stereo"))
    };

    Fragment::graph([
        normalize("0:a").output("tts"),
        normalize("1:a")
            .then(Filter::new("adelay").arg(format!("{delay}|{delay}")))
            .then(Filter::new("volume").arg(num(effect.volume())))
            .output("sfx"),
        Segment::new()
            .input("tts")
            .input("sfx")
            .then(
                Filter::new("amix")
                    .opt("inputs", 2)
                    .opt("duration", "first")
                    .opt("dropout_transition", 3)
                    .opt("normalize", 0),
            )
            .output("out"),
    ])
    .into_string()
}

/// Mix a sound effect into a voice track, trimmed to the voice duration.
pub fn sound_effect_mix_command(
    voice_path: impl AsRef<Path>,
    effect: &SoundEffect,
    voice_duration: f64,
    output_path: impl AsRef<Path>,
    encoding: &EncodingConfig,
) -> FfmpegCommand {
    FfmpegCommand::new(output_path)
        .input(voice_path)
        .input(&effect.path)
        .filter_complex(sound_effect_graph(effect, voice_duration, encoding.sample_rate))
        .map("[out]")
        .duration(voice_duration)
        .audio_codec(MIX_AUDIO_CODEC)
        .audio_bitrate(&encoding.audio_bitrate)
        .output_args(["-ar".to_string(), encoding.sample_rate.to_string()])
}
