use async_trait::async_trait;
use swing_models::SwingSequence;

use crate::error::WorkerResult;
use crate::pipeline::{PipelineStage, RunContext};
use crate::segmenter::assign_phases;

/// Assigns each frame a swing phase by position.
pub struct SegmentationStage;

#[async_trait]
impl PipelineStage for SegmentationStage {
    async fn process(&self, sequence: &mut SwingSequence, _ctx: &RunContext) -> WorkerResult<()> {
        assign_phases(&mut sequence.frames);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "segmentation"
    }
}
