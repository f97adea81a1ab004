//! Oracle request/response wire types.

use serde::{Deserialize, Serialize};
use swing_models::{BoundingBox, Keypoint, PersonDetection, PoseResult};

use crate::error::{MlError, MlResult};
use crate::oracle::GenerationParams;

pub const ZERO_SHOT_TASK: &str = "zero-shot-image-classification";

/// Zero-shot image classification request.
#[derive(Debug, Serialize)]
pub struct ClassificationRequest<'a> {
    /// Base64-encoded image
    pub inputs: String,
    pub parameters: ClassificationParameters<'a>,
    pub task: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ClassificationParameters<'a> {
    pub candidate_labels: &'a [&'a str],
}

/// One entry of a classification response.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Text generation request.
#[derive(Debug, Serialize)]
pub struct GenerationRequest<'a> {
    pub inputs: &'a str,
    pub parameters: &'a GenerationParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}

/// The generation endpoint answers with a list, a single object or bare text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GenerationResponse {
    List(Vec<GeneratedText>),
    Single(GeneratedText),
    Text(String),
}

impl GenerationResponse {
    pub fn into_text(self) -> MlResult<String> {
        match self {
            GenerationResponse::List(items) => items
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| MlError::InvalidResponse("empty generation list".to_string())),
            GenerationResponse::Single(g) => Ok(g.generated_text),
            GenerationResponse::Text(text) => Ok(text),
        }
    }
}

/// Corner-format box returned by the detector.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CornerBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

/// One object-detection result.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectedObject {
    pub score: f64,
    pub label: String,
    #[serde(rename = "box")]
    pub bbox: CornerBox,
}

impl DetectedObject {
    pub fn into_detection(self) -> PersonDetection {
        PersonDetection {
            bbox: BoundingBox::from_corners(
                self.bbox.xmin,
                self.bbox.ymin,
                self.bbox.xmax,
                self.bbox.ymax,
            ),
            confidence: self.score,
            label: self.label,
        }
    }
}

/// Pose-service request: one image, one or more xywh boxes.
#[derive(Debug, Serialize)]
pub struct PoseRequest {
    /// Base64-encoded image
    pub image: String,
    pub boxes: Vec<[f64; 4]>,
}

/// One person returned by the pose service.
#[derive(Debug, Clone, Deserialize)]
pub struct PosePerson {
    pub keypoints: Vec<Vec<f64>>,
    pub scores: Vec<f64>,
    #[serde(default)]
    pub labels: Vec<i64>,
    /// xywh box the pose was estimated in
    pub bbox: [f64; 4],
}

impl PosePerson {
    pub fn into_result(self) -> MlResult<PoseResult> {
        let keypoints = self
            .keypoints
            .iter()
            .map(|c| Keypoint::from_slice(c))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| MlError::InvalidResponse("keypoint with fewer than 2 coordinates".into()))?;

        if keypoints.len() != self.scores.len() {
            return Err(MlError::InvalidResponse(format!(
                "{} keypoints but {} scores",
                keypoints.len(),
                self.scores.len()
            )));
        }

        let [x, y, w, h] = self.bbox;
        Ok(PoseResult {
            keypoints,
            scores: self.scores,
            labels: self.labels,
            bbox: BoundingBox::new(x, y, w, h),
        })
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_response_shapes() {
        let list: GenerationResponse =
            serde_json::from_str(r#"[{"generated_text": "a"}, {"generated_text": "b"}]"#).unwrap();
        assert_eq!(list.into_text().unwrap(), "a");

        let single: GenerationResponse =
            serde_json::from_str(r#"{"generated_text": "solo"}"#).unwrap();
        assert_eq!(single.into_text().unwrap(), "solo");

        let bare: GenerationResponse = serde_json::from_str(r#""just text""#).unwrap();
        assert_eq!(bare.into_text().unwrap(), "just text");

        let empty: GenerationResponse = serde_json::from_str("[]").unwrap();
        assert!(empty.into_text().is_err());
    }

    #[test]
    fn test_pose_person_rejects_mismatched_scores() {
        let person = PosePerson {
            keypoints: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            scores: vec![0.9],
            labels: vec![],
            bbox: [0.0, 0.0, 10.0, 10.0],
        };
        assert!(matches!(person.into_result(), Err(MlError::InvalidResponse(_))));
    }

    #[test]
    fn test_detected_object_converts_to_xywh() {
        let obj: DetectedObject = serde_json::from_str(
            r#"{"score": 0.97, "label": "person", "box": {"xmin": 10, "ymin": 20, "xmax": 110, "ymax": 220}}"#,
        )
        .unwrap();
        let det = obj.into_detection();
        assert_eq!(det.bbox.to_xywh(), [10.0, 20.0, 100.0, 200.0]);
        assert_eq!(det.confidence, 0.97);
    }
}
