//! The ten canonical swing phases.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::vocabulary::PHASE_DESCRIPTORS;

/// Swing phase, ordered from address to finish.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum SwingPhase {
    #[serde(rename = "P1_ADDRESS")]
    Address,
    #[serde(rename = "P2_TAKEAWAY")]
    Takeaway,
    #[serde(rename = "P3_HALFWAY_BACK")]
    HalfwayBack,
    #[serde(rename = "P4_TOP")]
    Top,
    #[serde(rename = "P5_EARLY_DOWN")]
    EarlyDownswing,
    #[serde(rename = "P6_PRE_IMPACT")]
    PreImpact,
    #[serde(rename = "P7_IMPACT")]
    Impact,
    #[serde(rename = "P8_RELEASE")]
    Release,
    #[serde(rename = "P9_FOLLOW")]
    FollowThrough,
    #[serde(rename = "P10_FINISH")]
    Finish,
}

impl SwingPhase {
    pub const COUNT: usize = 10;

    /// All phases in swing order.
    pub const ALL: [SwingPhase; Self::COUNT] = [
        Self::Address,
        Self::Takeaway,
        Self::HalfwayBack,
        Self::Top,
        Self::EarlyDownswing,
        Self::PreImpact,
        Self::Impact,
        Self::Release,
        Self::FollowThrough,
        Self::Finish,
    ];

    /// Zero-based position in swing order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable identifier (e.g. `P4_TOP`), used as the detection-flag key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Address => "P1_ADDRESS",
            Self::Takeaway => "P2_TAKEAWAY",
            Self::HalfwayBack => "P3_HALFWAY_BACK",
            Self::Top => "P4_TOP",
            Self::EarlyDownswing => "P5_EARLY_DOWN",
            Self::PreImpact => "P6_PRE_IMPACT",
            Self::Impact => "P7_IMPACT",
            Self::Release => "P8_RELEASE",
            Self::FollowThrough => "P9_FOLLOW",
            Self::Finish => "P10_FINISH",
        }
    }

    /// Display name (e.g. `P4: Top`), used in prompts and the analysis map.
    pub fn label(self) -> &'static str {
        match self {
            Self::Address => "P1: Address",
            Self::Takeaway => "P2: Takeaway",
            Self::HalfwayBack => "P3: Halfway Back",
            Self::Top => "P4: Top",
            Self::EarlyDownswing => "P5: Early Downswing",
            Self::PreImpact => "P6: Pre-Impact",
            Self::Impact => "P7: Impact",
            Self::Release => "P8: Release",
            Self::FollowThrough => "P9: Follow Through",
            Self::Finish => "P10: Finish",
        }
    }

    /// Classification vocabulary for this phase.
    pub fn descriptors(self) -> &'static [&'static str] {
        PHASE_DESCRIPTORS[self.index()]
    }
}

impl fmt::Display for SwingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
