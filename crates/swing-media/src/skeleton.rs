//! Skeleton topology and drawing style for the 33-point body model.
//!
//! Keypoints 11-16 are the arms, 23-32 the legs and feet.

/// Keypoint pairs joined when drawing a skeleton.
pub const KEYPOINT_EDGES: [(usize, usize); 20] = [
    (11, 12),
    (12, 14),
    (14, 16),
    (11, 13),
    (13, 15),
    (15, 17),
    (23, 25),
    (25, 27),
    (24, 26),
    (26, 28),
    (11, 23),
    (23, 25),
    (25, 27),
    (27, 29),
    (29, 31),
    (12, 24),
    (24, 26),
    (26, 28),
    (28, 30),
    (30, 32),
];

const ORANGE: [u8; 3] = [255, 128, 0];
const BLUE: [u8; 3] = [51, 153, 255];
const GREEN: [u8; 3] = [102, 255, 102];

/// Colour for each entry of [`KEYPOINT_EDGES`].
pub const LINK_COLORS: [[u8; 3]; 20] = [
    ORANGE, ORANGE, ORANGE, ORANGE, ORANGE, ORANGE, BLUE, BLUE, BLUE, BLUE, GREEN, GREEN, GREEN,
    GREEN, GREEN, GREEN, GREEN, GREEN, GREEN, GREEN,
];

pub const KEYPOINT_COLOR: [u8; 3] = [0, 255, 0];

/// Keypoints and links at or below this score are not drawn.
pub const KEYPOINT_THRESHOLD: f64 = 0.3;

pub const KEYPOINT_RADIUS: i32 = 4;

pub const LINE_THICKNESS: i32 = 2;
