//! Shared data models for the swing analysis pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Sampled frames and their encoded renderings
//! - Person detections and pose estimation results
//! - Swing phases and the fixed phase descriptor vocabulary
//! - Per-phase classification scores and analyses
//! - The swing sequence threaded through the pipeline
//! - The persisted analysis record

pub mod analysis;
pub mod frame;
pub mod geometry;
pub mod phase;
pub mod pose;
pub mod record;
pub mod sequence;
pub mod vocabulary;

// Re-export common types
pub use analysis::{PhaseAnalysis, PhaseDetection, PhaseScoreMap, SwingAnalysis};
pub use frame::{EncodedImage, Frame, FrameError};
pub use geometry::{BoundingBox, PersonDetection};
pub use phase::SwingPhase;
pub use pose::{Keypoint, PoseResult};
pub use record::{AnalysisRecord, AnalysisResults};
pub use sequence::{AnalysisId, AnnotatedFrame, SourceVideo, SwingSequence};
pub use vocabulary::{contains_negative_keyword, NEGATIVE_KEYWORDS, PHASE_DESCRIPTORS};
