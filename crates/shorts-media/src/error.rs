//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors from running or preparing ffmpeg / ffprobe.
///
/// The filter builders never produce these; every malformed effect input is
/// normalized before it reaches them.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid media duration for {path}: {value}")]
    InvalidDuration { path: PathBuf, value: String },

    #[error("No scene clips to assemble")]
    NoScenes,
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    pub fn ffprobe_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::FfprobeFailed {
            message: message.into(),
            stderr,
        }
    }

    pub fn invalid_duration(path: impl Into<PathBuf>, value: impl Into<String>) -> Self {
        Self::InvalidDuration {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Whether retrying the same command could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffmpeg_failed_message() {
        let err = MediaError::ffmpeg_failed("scene 2 render", Some("boom".into()), Some(1));
        assert_eq!(err.to_string(), "FFmpeg command failed: scene 2 render");
        match err {
            MediaError::FfmpegFailed { stderr, exit_code, .. } => {
                assert_eq!(stderr.as_deref(), Some("boom"));
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(MediaError::Timeout(5).is_transient());
        assert!(!MediaError::Cancelled.is_transient());
        assert!(!MediaError::NoScenes.is_transient());
    }
}
