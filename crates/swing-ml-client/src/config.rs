//! Oracle endpoint configuration.

use std::time::Duration;

use url::Url;

use crate::error::{MlError, MlResult};

pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/";
pub const DEFAULT_POSE_URL: &str = "http://localhost:8001/";
pub const DEFAULT_CLASSIFICATION_MODEL: &str = "openai/clip-vit-large-patch14";
pub const DEFAULT_GENERATION_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";
pub const DEFAULT_DETECTION_MODEL: &str = "facebook/detr-resnet-50";

/// Configuration shared by the oracle clients.
///
/// Built once at startup and handed to each client read-only.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Base URL of the hosted inference API
    pub inference_url: String,
    /// Bearer token for the inference API
    pub api_token: Option<String>,
    pub classification_model: String,
    pub generation_model: String,
    pub detection_model: String,
    /// Base URL of the pose-estimation service
    pub pose_url: String,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Minimum detector score for a person candidate
    pub detection_threshold: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            api_token: None,
            classification_model: DEFAULT_CLASSIFICATION_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            detection_model: DEFAULT_DETECTION_MODEL.to_string(),
            pose_url: DEFAULT_POSE_URL.to_string(),
            timeout: Duration::from_secs(120),
            detection_threshold: 0.3,
        }
    }
}

impl OracleConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            inference_url: std::env::var("INFERENCE_API_URL").unwrap_or(defaults.inference_url),
            api_token: std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty()),
            classification_model: std::env::var("CLASSIFICATION_MODEL")
                .unwrap_or(defaults.classification_model),
            generation_model: std::env::var("GENERATION_MODEL")
                .unwrap_or(defaults.generation_model),
            detection_model: std::env::var("DETECTION_MODEL").unwrap_or(defaults.detection_model),
            pose_url: std::env::var("POSE_SERVICE_URL").unwrap_or(defaults.pose_url),
            timeout: Duration::from_secs(
                std::env::var("ORACLE_HTTP_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.timeout.as_secs()),
            ),
            detection_threshold: std::env::var("DETECTION_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.detection_threshold),
        }
    }

    /// Point both the inference API and the pose service at one base URL.
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.inference_url = base.clone();
        self.pose_url = base;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Check that both base URLs parse.
    pub fn validate(&self) -> MlResult<()> {
        parse_base_url(&self.inference_url)?;
        parse_base_url(&self.pose_url)?;
        Ok(())
    }
}

/// Parse a base URL, forcing a trailing slash so relative joins append.
pub(crate) fn parse_base_url(raw: &str) -> MlResult<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| MlError::Config(format!("invalid URL {raw:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(MlError::Config(format!("URL {raw:?} cannot be a base")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OracleConfig::default();
        assert_eq!(config.classification_model, "openai/clip-vit-large-patch14");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.detection_threshold, 0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("http://localhost:9000/api").unwrap();
        assert_eq!(url.join("estimate").unwrap().as_str(), "http://localhost:9000/api/estimate");
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let config = OracleConfig::default().with_base_url("not a url");
        assert!(matches!(config.validate(), Err(MlError::Config(_))));
    }
}
