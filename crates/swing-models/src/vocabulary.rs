//! Fixed classification vocabulary.
//!
//! The phase descriptor table and the negative-keyword lexicon determine
//! scoring output. Changing either changes analysis results, so they live here
//! as versioned data rather than inline literals.

/// Candidate labels per phase, indexed by [`crate::SwingPhase::index`].
///
/// Each list holds positive technique statements followed by common faults.
pub const PHASE_DESCRIPTORS: [&[&str]; 10] = [
    // P1: Address
    &[
        "proper athletic golf stance with knees flexed",
        "spine tilted forward from hips at address",
        "arms hanging naturally at address",
        "weight distributed evenly between feet",
        "poor posture with rounded back",
        "knees too straight at address",
        "weight too much on toes or heels",
    ],
    // P2: Takeaway
    &[
        "club moves back low and slow",
        "shoulders rotating while arms stay connected",
        "club head stays outside hands",
        "maintaining triangle between arms and chest",
        "lifting club too quickly",
        "breaking wrists too early",
        "club moving too far inside",
    ],
    // P3: Halfway Back
    &[
        "club shaft parallel to ground and target line",
        "hands at hip height in backswing",
        "good shoulder rotation with stable head",
        "maintaining spine angle",
        "lifting arms instead of turning",
        "loss of spine angle",
        "swaying off the ball",
    ],
    // P4: Top
    &[
        "club shaft parallel to ground at top",
        "left arm reasonably straight",
        "90 degree shoulder turn",
        "weight maintained on inside of back foot",
        "over-rotation at top",
        "collapsing left arm",
        "swaying or lifting up",
    ],
    // P5: Early Downswing
    &[
        "lower body leads the downswing",
        "arms dropping into slot",
        "maintaining width in downswing",
        "good weight shift to lead side",
        "casting club from top",
        "arms leading the downswing",
        "losing spine angle",
    ],
    // P6: Pre-Impact
    &[
        "hips open at impact",
        "hands ahead of club head",
        "maintaining spine angle",
        "weight shifted to lead side",
        "early extension",
        "flipping hands through impact",
        "hanging back on trail foot",
    ],
    // P7: Impact
    &[
        "hands leading club at impact",
        "hips rotated 45 degrees open",
        "weight forward at impact",
        "shaft leaning forward",
        "flipping at impact",
        "weight on back foot",
        "casting through impact",
    ],
    // P8: Release
    &[
        "full extension of arms after impact",
        "rotating body through impact",
        "maintaining spine angle",
        "good weight transfer",
        "early release",
        "stopping body rotation",
        "falling backward",
    ],
    // P9: Follow Through
    &[
        "arms extending toward target",
        "body rotating toward target",
        "weight fully shifted forward",
        "maintaining balance",
        "chicken wing left arm",
        "incomplete hip turn",
        "poor weight transfer",
    ],
    // P10: Finish
    &[
        "belt buckle facing target",
        "chest facing target",
        "weight on front foot",
        "balanced finish position",
        "falling backward",
        "incomplete turn through",
        "poor balance at finish",
    ],
];

/// Substrings marking a descriptor as an area for improvement.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "poor",
    "too",
    "improper",
    "incorrect",
    "loss",
    "early",
    "lifting",
    "incomplete",
    "unstable",
];

/// Case-insensitive substring match against [`NEGATIVE_KEYWORDS`].
pub fn contains_negative_keyword(descriptor: &str) -> bool {
    let lower = descriptor.to_lowercase();
    NEGATIVE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}
