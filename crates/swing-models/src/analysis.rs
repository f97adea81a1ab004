//! Per-phase classification scores and derived analyses.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::phase::SwingPhase;

/// Averaged classifier score per descriptor for one phase.
///
/// Insertion order is preserved: the classifier inserts descriptors in
/// vocabulary order and the analyzer re-orders them by descending score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PhaseScoreMap(IndexMap<String, f64>);

impl PhaseScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, descriptor: impl Into<String>, score: f64) {
        self.0.insert(descriptor.into(), score);
    }

    pub fn get(&self, descriptor: &str) -> Option<f64> {
        self.0.get(descriptor).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PhaseScoreMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Strengths and areas for improvement derived from one phase's scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseAnalysis {
    /// Top positive descriptors (at most two)
    pub strengths: Vec<String>,
    /// Top fault descriptors (at most two)
    pub areas_for_improvement: Vec<String>,
    /// Highest score in the phase, 0.0 if none
    pub confidence: f64,
    /// Every descriptor score, highest first
    pub all_scores: PhaseScoreMap,
}

impl PhaseAnalysis {
    /// True when there is something to say about this phase.
    pub fn has_findings(&self) -> bool {
        !self.strengths.is_empty() || !self.areas_for_improvement.is_empty()
    }
}

/// Outcome of classifying one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhaseDetection {
    /// At least one frame produced scores
    Classified,
    /// No renderable frames were assigned to the phase
    NoFrames,
    /// Every classification attempt for the phase failed
    Failed,
}

impl PhaseDetection {
    /// Numeric flag used in the analysis record (1 = detected, 0 otherwise).
    pub fn flag(self) -> u8 {
        match self {
            Self::Classified => 1,
            Self::NoFrames | Self::Failed => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classified => "classified",
            Self::NoFrames => "no_frames",
            Self::Failed => "failed",
        }
    }
}

/// Analysis for every phase of a swing.
///
/// `detection` covers all ten phases once classification has run;
/// `phases` only holds phases that were classified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SwingAnalysis {
    pub phases: IndexMap<SwingPhase, PhaseAnalysis>,
    pub detection: IndexMap<SwingPhase, PhaseDetection>,
}

impl SwingAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a classified phase.
    pub fn insert_classified(&mut self, phase: SwingPhase, analysis: PhaseAnalysis) {
        self.phases.insert(phase, analysis);
        self.detection.insert(phase, PhaseDetection::Classified);
    }

    /// Record a phase that produced no analysis.
    pub fn mark_undetected(&mut self, phase: SwingPhase, detection: PhaseDetection) {
        self.phases.shift_remove(&phase);
        self.detection.insert(phase, detection);
    }

    pub fn detection_of(&self, phase: SwingPhase) -> Option<PhaseDetection> {
        self.detection.get(&phase).copied()
    }

    /// Number of phases with a computed analysis.
    pub fn classified_count(&self) -> usize {
        self.phases.len()
    }

    /// Detection flags keyed by phase key, in phase order of insertion.
    pub fn flags(&self) -> IndexMap<String, u8> {
        self.detection
            .iter()
            .map(|(phase, d)| (phase.key().to_string(), d.flag()))
            .collect()
    }
}
