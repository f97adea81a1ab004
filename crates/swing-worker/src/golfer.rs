//! Golfer selection among detected people.
//!
//! The golfer is assumed to be filmed roughly centred and to be the largest
//! person in frame, with detector confidence weighed in last.

use swing_models::{BoundingBox, PersonDetection};

pub const CENTER_WEIGHT: f64 = 0.4;
pub const SIZE_WEIGHT: f64 = 0.3;
pub const CONFIDENCE_WEIGHT: f64 = 0.3;

/// Weighted sum of the normalized sub-scores.
pub fn combined_score(center: f64, size: f64, confidence: f64) -> f64 {
    CENTER_WEIGHT * center + SIZE_WEIGHT * size + CONFIDENCE_WEIGHT * confidence
}

/// Combined score for every candidate, in detector order.
///
/// Centre and size are normalized by the largest value observed in this
/// frame. When every box sits exactly on the frame centre each centre score
/// is 1.0; when every box is empty each size score is 0.0.
pub fn candidate_scores(width: u32, height: u32, candidates: &[PersonDetection]) -> Vec<f64> {
    let (fx, fy) = (width as f64 / 2.0, height as f64 / 2.0);

    let distances: Vec<f64> = candidates
        .iter()
        .map(|c| {
            let (cx, cy) = c.bbox.center();
            (cx - fx).hypot(cy - fy)
        })
        .collect();
    let areas: Vec<f64> = candidates.iter().map(|c| c.bbox.area()).collect();

    let max_distance = distances.iter().copied().fold(0.0, f64::max);
    let max_area = areas.iter().copied().fold(0.0, f64::max);

    candidates
        .iter()
        .zip(distances.iter().zip(&areas))
        .map(|(c, (distance, area))| {
            let center = if max_distance > 0.0 {
                1.0 - distance / max_distance
            } else {
                1.0
            };
            let size = if max_area > 0.0 { area / max_area } else { 0.0 };
            combined_score(center, size, c.confidence)
        })
        .collect()
}

/// Pick the box most likely to be the golfer.
///
/// Falls back to the whole frame when there are no candidates. Ties go to
/// the earliest candidate.
pub fn select_golfer(width: u32, height: u32, candidates: &[PersonDetection]) -> BoundingBox {
    let scores = candidate_scores(width, height, candidates);

    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.into_iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }

    best.map(|(i, _)| candidates[i].bbox)
        .unwrap_or_else(|| BoundingBox::whole_frame(width, height))
}
