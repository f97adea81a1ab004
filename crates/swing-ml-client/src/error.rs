//! Oracle client error types.

use thiserror::Error;

pub type MlResult<T> = Result<T, MlError>;

#[derive(Debug, Error)]
pub enum MlError {
    #[error("Oracle unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MlError {
    /// Map a transport error, keeping timeouts distinct.
    pub(crate) fn from_send(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            MlError::Timeout(timeout_secs)
        } else {
            MlError::Network(err)
        }
    }
}
