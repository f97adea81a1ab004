//! Worker error types.

use std::time::Duration;

use swing_media::MediaError;
use swing_ml_client::MlError;
use swing_models::SwingSequence;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Longest cause text carried by a [`PipelineFailure`].
pub const FAILURE_MESSAGE_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Video produced no frames")]
    NoFrames,

    #[error("Video does not look like a golf swing (best score {best_score:.2})")]
    NotAGolfSwing { best_score: f64 },

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] MlError),

    #[error("Run cancelled")]
    Cancelled,

    #[error("Oracle call exceeded {}s deadline", .0.as_secs())]
    DeadlineExceeded(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The source video cannot be used at all: undecodable or empty.
    pub fn is_unusable_video(&self) -> bool {
        match self {
            WorkerError::NoFrames => true,
            WorkerError::Media(e) => e.is_decode_error(),
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, WorkerError::Cancelled)
    }
}

/// A run aborted by a failing stage.
///
/// `sequence` holds whatever the completed stages wrote; callers are
/// expected to discard it.
#[derive(Debug, Error)]
#[error("Pipeline failed at stage {stage}: {message}")]
pub struct PipelineFailure {
    pub stage: &'static str,
    /// Cause text, truncated to [`FAILURE_MESSAGE_LIMIT`] characters
    pub message: String,
    #[source]
    pub cause: WorkerError,
    pub sequence: Box<SwingSequence>,
}

impl PipelineFailure {
    pub fn new(stage: &'static str, cause: WorkerError, sequence: SwingSequence) -> Self {
        let message = cause
            .to_string()
            .chars()
            .take(FAILURE_MESSAGE_LIMIT)
            .collect();
        Self {
            stage,
            message,
            cause,
            sequence: Box::new(sequence),
        }
    }

    pub fn is_unusable_video(&self) -> bool {
        self.cause.is_unusable_video()
    }
}
