//! Project render tests.
//!
//! Tests that shell out to FFmpeg are ignored by default; run them with
//! `cargo test -- --ignored` on a machine with ffmpeg and ffprobe.

use std::path::Path;
use std::process::Command;

use shorts_models::{Fade, Zoom};
use shorts_worker::{ProjectRenderer, RenderManifest, WorkerConfig, WorkerError};
use tempfile::TempDir;

fn manifest_json(scenes: &[(&str, &Path, &Path)], extra: &str) -> String {
    let scenes: Vec<String> = scenes
        .iter()
        .map(|(id, image, voice)| {
            format!(
                r#"{{"id": "{id}", "image_path": {:?}, "voice_path": {:?},
                    "effects": {{"effect_zoom": "zoom_in", "effect_fade": "in"}}}}"#,
                image.display().to_string(),
                voice.display().to_string()
            )
        })
        .collect();
    format!(
        r#"{{"project_id": "test-project", {extra} "scenes": [{}]}}"#,
        scenes.join(",")
    )
}

fn config_in(root: &TempDir) -> WorkerConfig {
    WorkerConfig::default()
        .with_work_dir(root.path().join("work"))
        .with_output_dir(root.path().join("out"))
}

fn dir_entries(path: &Path) -> usize {
    std::fs::read_dir(path).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_manifest_from_path() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("manifest.json");
    let json = manifest_json(&[("a", Path::new("a.png"), Path::new("a.mp3"))], "");
    tokio::fs::write(&path, json).await.unwrap();

    let manifest = RenderManifest::from_path(&path).await.unwrap();
    assert_eq!(manifest.project_id, "test-project");
    assert_eq!(manifest.scenes.len(), 1);
    assert_eq!(manifest.scenes[0].effects.zoom, Zoom::ZoomIn);
    assert_eq!(manifest.scenes[0].effects.fade, Fade::In);
}

#[tokio::test]
async fn test_missing_manifest_file() {
    let result = RenderManifest::from_path("/nonexistent/manifest.json").await;
    assert!(matches!(result, Err(WorkerError::Io(_))));
}

#[tokio::test]
async fn test_all_scenes_missing_inputs() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("missing");
    let json = manifest_json(
        &[
            ("a", &missing.join("a.png"), &missing.join("a.mp3")),
            ("b", &missing.join("b.png"), &missing.join("b.mp3")),
        ],
        "",
    );
    let manifest = RenderManifest::from_json(&json).unwrap();

    let renderer = ProjectRenderer::new(config_in(&root));
    let err = renderer.render(&manifest).await.unwrap_err();

    assert!(matches!(
        err,
        WorkerError::NoScenesRendered { failed: 2, total: 2 }
    ));
    assert!(!err.is_retryable());
    // Work directory is removed on failure
    assert_eq!(dir_entries(&root.path().join("work")), 0);
    assert!(!root.path().join("out/test-project.mp4").exists());
}

#[tokio::test]
async fn test_keep_temp_preserves_work_dir() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("missing");
    let json = manifest_json(&[("a", &missing.join("a.png"), &missing.join("a.mp3"))], "");
    let manifest = RenderManifest::from_json(&json).unwrap();

    let renderer = ProjectRenderer::new(config_in(&root).with_keep_temp(true));
    assert!(renderer.render(&manifest).await.is_err());
    assert_eq!(dir_entries(&root.path().join("work")), 1);
}

fn ffmpeg(args: &[&str]) {
    let status = Command::new("ffmpeg")
        .args(["-y", "-v", "error"])
        .args(args)
        .status()
        .expect("ffmpeg should run");
    assert!(status.success(), "ffmpeg {:?} failed", args);
}

fn make_scene_inputs(dir: &Path, name: &str, seconds: u32) -> (std::path::PathBuf, std::path::PathBuf) {
    let image = dir.join(format!("{name}.png"));
    let voice = dir.join(format!("{name}.mp3"));
    ffmpeg(&[
        "-f", "lavfi", "-i", "color=c=blue:s=320x480", "-frames:v", "1",
        image.to_str().unwrap(),
    ]);
    ffmpeg(&[
        "-f", "lavfi", "-i", &format!("sine=frequency=440:duration={seconds}"),
        voice.to_str().unwrap(),
    ]);
    (image, voice)
}

#[tokio::test]
#[ignore = "requires ffmpeg"]
async fn test_render_skips_broken_scene() {
    let root = TempDir::new().unwrap();
    let (image, voice) = make_scene_inputs(root.path(), "a", 1);
    let missing = root.path().join("missing.png");

    let json = manifest_json(
        &[("a", &image, &voice), ("b", &missing, &voice), ("c", &image, &voice)],
        r#""audio": {"video_speed": 2.0},"#,
    );
    let manifest = RenderManifest::from_json(&json).unwrap();

    let renderer = ProjectRenderer::new(config_in(&root));
    let report = renderer.render(&manifest).await.unwrap();

    assert!(report.output_path.exists());
    assert_eq!(report.timeline.len(), 2);
    assert_eq!(report.timeline.scenes[1].index, 2);
    assert_eq!(report.skipped_scenes.len(), 1);
    assert_eq!(report.skipped_scenes[0].id, "b");
    // Two ~1s scenes played back at 2x
    assert!(report.timeline.total_duration > 0.5 && report.timeline.total_duration < 2.0);
    assert_eq!(dir_entries(&root.path().join("work")), 0);
}

#[tokio::test]
#[ignore = "requires ffmpeg"]
async fn test_render_with_sound_effect_and_music() {
    let root = TempDir::new().unwrap();
    let (image, voice) = make_scene_inputs(root.path(), "a", 2);
    let (_, boom) = make_scene_inputs(root.path(), "boom", 1);
    let (_, music) = make_scene_inputs(root.path(), "music", 1);

    let json = format!(
        r#"{{"project_id": "sfx", "resolution": "final",
            "audio": {{"background_music_path": {:?}, "background_music_volume": 20}},
            "scenes": [{{"id": "a", "image_path": {:?}, "voice_path": {:?},
                "sound_effect": {{"path": {:?}, "offset_percent": 50}},
                "effects": {{"effect_pan": "left", "effect_vignette": "dark"}}}}]}}"#,
        music.display().to_string(),
        image.display().to_string(),
        voice.display().to_string(),
        boom.display().to_string()
    );
    let manifest = RenderManifest::from_json(&json).unwrap();

    let renderer = ProjectRenderer::new(config_in(&root));
    let report = renderer.render(&manifest).await.unwrap();

    assert!(report.output_path.ends_with("sfx.mp4"));
    assert!(report.skipped_scenes.is_empty());
    let duration = shorts_media::probe_duration(&report.output_path).await.unwrap();
    assert!((duration - 2.0).abs() < 0.5);
}
