use std::sync::Arc;

use async_trait::async_trait;
use swing_media::FrameRenderer;
use swing_models::SwingSequence;
use tracing::warn;

use crate::error::WorkerResult;
use crate::pipeline::{PipelineStage, RunContext};

/// Draws the skeleton over every frame that has a pose.
pub struct VisualizationStage {
    renderer: Arc<dyn FrameRenderer>,
}

impl VisualizationStage {
    pub fn new(renderer: Arc<dyn FrameRenderer>) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl PipelineStage for VisualizationStage {
    async fn process(&self, sequence: &mut SwingSequence, ctx: &RunContext) -> WorkerResult<()> {
        for annotated in sequence.frames.iter_mut() {
            let Some(pose) = &annotated.pose else {
                continue;
            };
            match self.renderer.render(&annotated.frame, pose) {
                Ok(image) => annotated.rendering = Some(image),
                Err(e) => warn!(frame = annotated.frame.index(), "Rendering failed: {}", e),
            }
        }

        ctx.logger.log_progress(&format!(
            "Rendered {} skeleton overlays",
            sequence.rendered_count()
        ));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "visualization"
    }
}
