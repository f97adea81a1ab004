//! Frame-to-phase segmentation by ordinal position.
//!
//! Frames are split into ten equal buckets of `max(1, N / 10)` frames; the
//! last phase absorbs the remainder of the integer division.

use swing_models::{AnnotatedFrame, SwingPhase};

pub fn frames_per_phase(total: usize) -> usize {
    (total / SwingPhase::COUNT).max(1)
}

/// Phase index in `[0, 9]` for the frame at `index` of `total`.
pub fn phase_index(index: usize, total: usize) -> usize {
    (index / frames_per_phase(total)).min(SwingPhase::COUNT - 1)
}

pub fn phase_for(index: usize, total: usize) -> SwingPhase {
    SwingPhase::ALL[phase_index(index, total)]
}

/// Assign every frame its phase.
pub fn assign_phases(frames: &mut [AnnotatedFrame]) {
    let total = frames.len();
    for (i, frame) in frames.iter_mut().enumerate() {
        frame.phase = Some(phase_for(i, total));
    }
}
