//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Failed to decode {path}: {message}")]
    DecodeFailed { path: PathBuf, message: String },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create a decode failure error.
    pub fn decode_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DecodeFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an encoding failure error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True when the source video could not be opened or decoded.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            MediaError::DecodeFailed { .. }
                | MediaError::FileNotFound(_)
                | MediaError::InvalidVideo(_)
                | MediaError::FfprobeFailed { .. }
        )
    }
}
