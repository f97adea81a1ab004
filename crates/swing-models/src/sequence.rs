//! The swing sequence threaded through every pipeline stage.

use std::fmt;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::SwingAnalysis;
use crate::frame::{EncodedImage, Frame};
use crate::geometry::BoundingBox;
use crate::phase::SwingPhase;
use crate::pose::PoseResult;

/// Unique identifier for an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AnalysisId(pub String);

impl AnalysisId {
    /// Generate a new random analysis ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of the decoded source video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceVideo {
    pub width: u32,
    pub height: u32,
    /// Native frame rate
    pub fps: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Every `stride`-th decoded frame was kept
    pub stride: usize,
}

/// A sampled frame plus everything later stages attach to it.
#[derive(Debug, Clone)]
pub struct AnnotatedFrame {
    pub frame: Frame,
    /// Box selected by the golfer locator
    pub golfer_box: Option<BoundingBox>,
    /// Present only when pose estimation succeeded
    pub pose: Option<PoseResult>,
    pub phase: Option<SwingPhase>,
    /// Skeleton overlay used as classifier input
    pub rendering: Option<EncodedImage>,
}

impl AnnotatedFrame {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            golfer_box: None,
            pose: None,
            phase: None,
            rendering: None,
        }
    }

    pub fn index(&self) -> usize {
        self.frame.index()
    }
}

/// Unit of work for one pipeline run.
///
/// Owned by a single run. Stages enrich it in place and never remove data
/// written by an earlier stage.
#[derive(Debug, Clone)]
pub struct SwingSequence {
    pub analysis_id: AnalysisId,
    pub video_path: PathBuf,
    pub source: Option<SourceVideo>,
    pub frames: Vec<AnnotatedFrame>,
    pub analysis: SwingAnalysis,
    pub feedback: String,
}

impl SwingSequence {
    /// Start an empty sequence for a video.
    pub fn new(video_path: impl AsRef<Path>) -> Self {
        Self::with_id(AnalysisId::new(), video_path)
    }

    pub fn with_id(analysis_id: AnalysisId, video_path: impl AsRef<Path>) -> Self {
        Self {
            analysis_id,
            video_path: video_path.as_ref().to_path_buf(),
            source: None,
            frames: Vec::new(),
            analysis: SwingAnalysis::new(),
            feedback: String::new(),
        }
    }

    /// Frames assigned to `phase`, in frame order.
    pub fn frames_in_phase(&self, phase: SwingPhase) -> impl Iterator<Item = &AnnotatedFrame> {
        self.frames.iter().filter(move |f| f.phase == Some(phase))
    }

    pub fn pose_count(&self) -> usize {
        self.frames.iter().filter(|f| f.pose.is_some()).count()
    }

    pub fn rendered_count(&self) -> usize {
        self.frames.iter().filter(|f| f.rendering.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_id_display() {
        let id = AnalysisId::from_string("abc-123");
        assert_eq!(id.to_string(), "abc-123");
        assert_eq!(id.as_str(), "abc-123");
        assert_ne!(AnalysisId::new(), AnalysisId::new());
    }

    #[test]
    fn test_new_sequence_is_empty() {
        let seq = SwingSequence::new("/tmp/swing.mp4");
        assert_eq!(seq.video_path, PathBuf::from("/tmp/swing.mp4"));
        assert!(seq.frames.is_empty());
        assert!(seq.feedback.is_empty());
        assert!(seq.source.is_none());
    }

    #[test]
    fn test_frames_in_phase() {
        let mut seq = SwingSequence::new("v.mp4");
        for i in 0..3 {
            let mut f = AnnotatedFrame::new(Frame::filled(i, 2, 2, [0, 0, 0]));
            f.phase = Some(if i == 1 {
                SwingPhase::Top
            } else {
                SwingPhase::Address
            });
            seq.frames.push(f);
        }
        let idx: Vec<usize> = seq
            .frames_in_phase(SwingPhase::Address)
            .map(|f| f.index())
            .collect();
        assert_eq!(idx, vec![0, 2]);
    }
}
