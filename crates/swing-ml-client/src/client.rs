//! Hosted inference API client (classification, generation, detection).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use swing_media::to_base64;
use swing_models::{EncodedImage, PersonDetection};
use tracing::{debug, warn};
use url::Url;

use crate::config::{parse_base_url, OracleConfig};
use crate::error::{MlError, MlResult};
use crate::oracle::{
    ClassificationOracle, DetectionOracle, GenerationOracle, GenerationParams, LabelScores,
};
use crate::types::{
    ClassificationParameters, ClassificationRequest, DetectedObject, GenerationRequest,
    GenerationResponse, LabelScore, ZERO_SHOT_TASK,
};

const PERSON_LABEL: &str = "person";

/// Client for a Hugging Face style inference API.
pub struct InferenceClient {
    http: Client,
    config: OracleConfig,
    base_url: Url,
}

impl InferenceClient {
    pub fn new(config: OracleConfig) -> MlResult<Self> {
        let base_url = parse_base_url(&config.inference_url)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self {
            http,
            config,
            base_url,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> MlResult<Self> {
        Self::new(OracleConfig::from_env())
    }

    fn model_url(&self, model: &str) -> MlResult<Url> {
        self.base_url
            .join(&format!("models/{model}"))
            .map_err(|e| MlError::Config(format!("invalid model id {model:?}: {e}")))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> MlResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| MlError::from_send(e, self.config.timeout.as_secs()))?;
        check_status(response).await
    }
}

/// Map non-success statuses; overload and gateway statuses become `ServiceUnavailable`.
pub(crate) async fn check_status(response: Response) -> MlResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT
        | StatusCode::TOO_MANY_REQUESTS => {
            warn!(%status, "Oracle temporarily unavailable");
            Err(MlError::ServiceUnavailable(format!("{status}: {body}")))
        }
        _ => Err(MlError::RequestFailed(format!(
            "oracle returned {status}: {body}"
        ))),
    }
}

#[async_trait]
impl ClassificationOracle for InferenceClient {
    async fn classify(
        &self,
        image: &EncodedImage,
        candidate_labels: &[&str],
    ) -> MlResult<LabelScores> {
        let url = self.model_url(&self.config.classification_model)?;
        debug!(labels = candidate_labels.len(), "Sending classification request to {}", url);

        let body = ClassificationRequest {
            inputs: to_base64(image),
            parameters: ClassificationParameters { candidate_labels },
            task: ZERO_SHOT_TASK,
        };

        let response = self.send(self.http.post(url).json(&body)).await?;
        let bytes = response.bytes().await?;
        let scores: Vec<LabelScore> = serde_json::from_slice(&bytes).map_err(|e| {
            MlError::InvalidResponse(format!(
                "classification response: {e}: {}",
                String::from_utf8_lossy(&bytes)
            ))
        })?;

        Ok(scores.into_iter().map(|s| (s.label, s.score)).collect())
    }
}

#[async_trait]
impl GenerationOracle for InferenceClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> MlResult<String> {
        let url = self.model_url(&self.config.generation_model)?;
        debug!(prompt_len = prompt.len(), "Sending generation request to {}", url);

        let body = GenerationRequest {
            inputs: prompt,
            parameters: params,
        };

        let response = self.send(self.http.post(url).json(&body)).await?;
        let generated: GenerationResponse = response.json().await?;
        generated.into_text()
    }
}

#[async_trait]
impl DetectionOracle for InferenceClient {
    async fn detect(&self, image: &EncodedImage) -> MlResult<Vec<PersonDetection>> {
        let url = self.model_url(&self.config.detection_model)?;

        let request = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, image.mime)
            .body(image.bytes.clone());

        let response = self.send(request).await?;
        let objects: Vec<DetectedObject> = response.json().await?;
        let threshold = self.config.detection_threshold;

        let people: Vec<PersonDetection> = objects
            .into_iter()
            .filter(|o| o.label == PERSON_LABEL && o.score > threshold)
            .map(DetectedObject::into_detection)
            .collect();

        debug!(people = people.len(), "Detected people");
        Ok(people)
    }
}
