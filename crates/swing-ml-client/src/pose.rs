//! Pose-estimation service client.

use async_trait::async_trait;
use reqwest::Client;
use swing_media::to_base64;
use swing_models::{BoundingBox, EncodedImage, PoseResult};
use tracing::{debug, warn};
use url::Url;

use crate::client::check_status;
use crate::config::{parse_base_url, OracleConfig};
use crate::error::{MlError, MlResult};
use crate::oracle::PoseOracle;
use crate::types::{HealthResponse, PosePerson, PoseRequest};

/// Client for the pose-estimation service.
pub struct PoseClient {
    http: Client,
    base_url: Url,
    timeout_secs: u64,
}

impl PoseClient {
    pub fn new(config: &OracleConfig) -> MlResult<Self> {
        let base_url = parse_base_url(&config.pose_url)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self {
            http,
            base_url,
            timeout_secs: config.timeout.as_secs(),
        })
    }

    fn endpoint(&self, name: &str) -> MlResult<Url> {
        self.base_url
            .join(name)
            .map_err(|e| MlError::Config(e.to_string()))
    }

    /// Check if the pose service is healthy.
    ///
    /// Every failure, including an unreadable health body, is logged and
    /// reported as unhealthy.
    pub async fn health_check(&self) -> bool {
        let url = match self.endpoint("health") {
            Ok(url) => url,
            Err(e) => {
                warn!("Pose service health URL invalid: {}", e);
                return false;
            }
        };

        let response = match self.http.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("Pose service health check failed: {}", response.status());
                return false;
            }
            Err(e) => {
                warn!("Pose service health check error: {}", e);
                return false;
            }
        };

        match response.json::<HealthResponse>().await {
            Ok(health) => health.status == "healthy" || health.status == "ok",
            Err(e) => {
                warn!("Pose service health response unreadable: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl PoseOracle for PoseClient {
    async fn estimate(
        &self,
        image: &EncodedImage,
        bbox: &BoundingBox,
    ) -> MlResult<Vec<PoseResult>> {
        let url = self.endpoint("estimate")?;
        debug!(bbox = ?bbox.to_xywh(), "Sending pose request to {}", url);

        let body = PoseRequest {
            image: to_base64(image),
            boxes: vec![bbox.to_xywh()],
        };

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MlError::from_send(e, self.timeout_secs))?;
        let people: Vec<PosePerson> = check_status(response).await?.json().await?;

        people.into_iter().map(PosePerson::into_result).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> PoseClient {
        PoseClient::new(&OracleConfig::default().with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_estimate_parses_people() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/estimate"))
            .and(body_partial_json(json!({"boxes": [[10.0, 20.0, 30.0, 40.0]]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "keypoints": [[12.0, 22.0], [14.0, 30.0]],
                "scores": [0.9, 0.4],
                "labels": [0, 1],
                "bbox": [10.0, 20.0, 30.0, 40.0]
            }])))
            .mount(&server)
            .await;

        let image = EncodedImage::jpeg(64, 64, vec![0xFF, 0xD8]);
        let results = client_for(&server)
            .estimate(&image, &BoundingBox::new(10.0, 20.0, 30.0, 40.0))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].keypoints.len(), 2);
        assert_eq!(results[0].score(0), 0.9);
        assert_eq!(results[0].bbox.to_xywh(), [10.0, 20.0, 30.0, 40.0]);
    }

    #[tokio::test]
    async fn test_gateway_timeout_maps_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(504))
            .mount(&server)
            .await;

        let image = EncodedImage::jpeg(1, 1, vec![0xFF]);
        let err = client_for(&server)
            .estimate(&image, &BoundingBox::whole_frame(1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, MlError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        assert!(client_for(&server).health_check().await);
    }

    #[tokio::test]
    async fn test_unreadable_health_body_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        assert!(!client_for(&server).health_check().await);
    }

    #[tokio::test]
    async fn test_failing_health_endpoint_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(!client_for(&server).health_check().await);
    }
}
