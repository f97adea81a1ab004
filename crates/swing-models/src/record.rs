//! Persisted analysis record.
//!
//! This is the JSON document handed to the service layer after a run. Phase
//! analyses are keyed by display label, detection flags by phase key.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::PhaseAnalysis;
use crate::sequence::{AnalysisId, SwingSequence};

/// Analysis results section of the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResults {
    /// Phase label -> analysis, classified phases only
    pub clip_analysis: IndexMap<String, PhaseAnalysis>,
    /// Phase key -> 1 if classified, 0 otherwise
    pub phase_analysis: IndexMap<String, u8>,
}

/// Complete record of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisRecord {
    pub analysis_id: AnalysisId,
    pub created_at: DateTime<Utc>,
    /// Location of the source video
    pub original_video: String,
    /// Locations of the sampled frames
    pub frames: Vec<String>,
    /// Locations of the skeleton renderings
    pub annotated_frames: Vec<String>,
    pub frame_count: usize,
    pub analysis_results: AnalysisResults,
    pub feedback: String,
}

impl AnalysisRecord {
    /// Build a record from a finished sequence and the locations its images were written to.
    pub fn from_sequence(
        sequence: &SwingSequence,
        original_video: impl Into<String>,
        frames: Vec<String>,
        annotated_frames: Vec<String>,
    ) -> Self {
        let clip_analysis = sequence
            .analysis
            .phases
            .iter()
            .map(|(phase, analysis)| (phase.label().to_string(), analysis.clone()))
            .collect();

        Self {
            analysis_id: sequence.analysis_id.clone(),
            created_at: Utc::now(),
            original_video: original_video.into(),
            frames,
            annotated_frames,
            frame_count: sequence.frames.len(),
            analysis_results: AnalysisResults {
                clip_analysis,
                phase_analysis: sequence.analysis.flags(),
            },
            feedback: sequence.feedback.clone(),
        }
    }
}
