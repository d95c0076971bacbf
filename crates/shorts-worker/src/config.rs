//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Root for per-render temporary directories
    pub work_dir: PathBuf,
    /// Where finished videos are written
    pub output_dir: PathBuf,
    /// Limit for any single FFmpeg invocation
    pub ffmpeg_timeout: Duration,
    /// Keep the per-render temporary directory after completion
    pub keep_temp: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/shorts"),
            output_dir: PathBuf::from("./output"),
            ffmpeg_timeout: Duration::from_secs(600), // 10 minutes
            keep_temp: false,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: std::env::var("WORKER_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            output_dir: std::env::var("WORKER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            ffmpeg_timeout: std::env::var("WORKER_FFMPEG_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.ffmpeg_timeout),
            keep_temp: std::env::var("WORKER_KEEP_TEMP")
                .ok()
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.keep_temp),
        }
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_keep_temp(mut self, keep: bool) -> Self {
        self.keep_temp = keep;
        self
    }
}

/// `1/true/yes/on` and `0/false/no/off`, case-insensitive.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
