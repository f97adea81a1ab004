//! Score averaging and strengths/weaknesses extraction for one phase.

use swing_ml_client::LabelScores;
use swing_models::{contains_negative_keyword, PhaseAnalysis, PhaseScoreMap};

/// Descriptors must score above this to be reported.
pub const FINDING_THRESHOLD: f64 = 0.3;

/// Most strengths (and most improvements) reported per phase.
pub const MAX_FINDINGS: usize = 2;

/// Mean score per descriptor across frames, in vocabulary order.
///
/// A descriptor missing from a frame's map counts as 0.0 for that frame,
/// so labels an oracle drops are understated rather than treated as unknown.
pub fn average_scores(descriptors: &[&str], frame_scores: &[LabelScores]) -> PhaseScoreMap {
    let n = frame_scores.len() as f64;
    descriptors
        .iter()
        .map(|desc| {
            let sum: f64 = frame_scores
                .iter()
                .map(|scores| scores.get(*desc).copied().unwrap_or(0.0))
                .sum();
            let mean = if n > 0.0 { sum / n } else { 0.0 };
            (*desc, mean)
        })
        .collect()
}

/// Derive strengths, improvements and confidence from averaged scores.
///
/// Pure: the same map always yields the same analysis.
pub fn analyze_phase_scores(scores: &PhaseScoreMap) -> PhaseAnalysis {
    let mut sorted: Vec<(&str, f64)> = scores.iter().collect();
    // Stable, so equal scores keep vocabulary order
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (improvements, strengths): (Vec<&str>, Vec<&str>) = sorted
        .iter()
        .filter(|(_, score)| *score > FINDING_THRESHOLD)
        .map(|(desc, _)| *desc)
        .partition(|desc| contains_negative_keyword(desc));

    PhaseAnalysis {
        strengths: strengths
            .into_iter()
            .take(MAX_FINDINGS)
            .map(String::from)
            .collect(),
        areas_for_improvement: improvements
            .into_iter()
            .take(MAX_FINDINGS)
            .map(String::from)
            .collect(),
        confidence: sorted.first().map(|(_, s)| *s).unwrap_or(0.0),
        all_scores: sorted.into_iter().collect(),
    }
}
