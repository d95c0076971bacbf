//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Manifest parse error: {0}")]
    ManifestParse(#[from] serde_json::Error),

    #[error("Scene {scene_id} failed: {source}")]
    SceneFailed {
        scene_id: String,
        #[source]
        source: shorts_media::MediaError,
    },

    #[error("No scene rendered ({failed} of {total} failed)")]
    NoScenesRendered { failed: usize, total: usize },

    #[error("Media error: {0}")]
    Media(#[from] shorts_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn invalid_manifest(msg: impl Into<String>) -> Self {
        Self::InvalidManifest(msg.into())
    }

    pub fn scene_failed(scene_id: impl Into<String>, source: shorts_media::MediaError) -> Self {
        Self::SceneFailed {
            scene_id: scene_id.into(),
            source,
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            WorkerError::Media(e) | WorkerError::SceneFailed { source: e, .. } => e.is_transient(),
            WorkerError::Io(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_media::MediaError;

    #[test]
    fn test_retryable() {
        assert!(WorkerError::Media(MediaError::Timeout(10)).is_retryable());
        assert!(!WorkerError::scene_failed("s1", MediaError::Cancelled).is_retryable());
        assert!(!WorkerError::invalid_manifest("no scenes").is_retryable());
    }

    #[test]
    fn test_messages() {
        let err = WorkerError::NoScenesRendered { failed: 3, total: 3 };
        assert_eq!(err.to_string(), "No scene rendered (3 of 3 failed)");
        let err = WorkerError::scene_failed("intro", MediaError::NoScenes);
        assert_eq!(err.to_string(), "Scene intro failed: No scene clips to assemble");
    }
}
