//! Oracle contracts consumed by the pipeline.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use swing_models::{BoundingBox, EncodedImage, PersonDetection, PoseResult};

use crate::error::MlResult;

/// Label -> score, in the order the oracle returned them.
pub type LabelScores = IndexMap<String, f64>;

/// Proposes person bounding boxes for an image.
#[async_trait]
pub trait DetectionOracle: Send + Sync {
    /// May return an empty list.
    async fn detect(&self, image: &EncodedImage) -> MlResult<Vec<PersonDetection>>;
}

/// Estimates body keypoints inside a box.
#[async_trait]
pub trait PoseOracle: Send + Sync {
    /// One result per person found in `bbox`; may be empty.
    async fn estimate(&self, image: &EncodedImage, bbox: &BoundingBox) -> MlResult<Vec<PoseResult>>;
}

/// Zero-shot image classification against caller-supplied labels.
#[async_trait]
pub trait ClassificationOracle: Send + Sync {
    async fn classify(&self, image: &EncodedImage, candidate_labels: &[&str])
        -> MlResult<LabelScores>;
}

/// Free-text generation from a prompt.
#[async_trait]
pub trait GenerationOracle: Send + Sync {
    /// Returns the raw generated text, untrimmed.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> MlResult<String>;
}

/// Sampling parameters for text generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub do_sample: bool,
    /// Include the prompt in the returned text
    pub return_full_text: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 750,
            temperature: 0.7,
            top_p: 0.9,
            do_sample: true,
            return_full_text: false,
        }
    }
}
