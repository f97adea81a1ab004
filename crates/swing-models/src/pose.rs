//! Pose estimation results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;

/// A single keypoint in image coordinates. `z` is present for 3D models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Keypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Build from a coordinate slice (`[x, y]` or `[x, y, z]`).
    pub fn from_slice(coords: &[f64]) -> Option<Self> {
        match coords {
            [x, y] => Some(Self::new(*x, *y)),
            [x, y, z, ..] => Some(Self {
                x: *x,
                y: *y,
                z: Some(*z),
            }),
            _ => None,
        }
    }
}

/// Keypoints for one person, as returned by the pose oracle.
///
/// `keypoints`, `scores` and `labels` are parallel, ordered by keypoint id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseResult {
    pub keypoints: Vec<Keypoint>,
    /// Per-keypoint confidence
    pub scores: Vec<f64>,
    pub labels: Vec<i64>,
    /// Box the pose was estimated in
    pub bbox: BoundingBox,
}

impl PoseResult {
    /// Score for keypoint `idx`, or 0.0 if absent.
    pub fn score(&self, idx: usize) -> f64 {
        self.scores.get(idx).copied().unwrap_or(0.0)
    }

    /// Number of keypoints above the given confidence.
    pub fn confident_keypoints(&self, threshold: f64) -> usize {
        self.scores.iter().filter(|s| **s > threshold).count()
    }
}
