use std::sync::Arc;

use async_trait::async_trait;
use swing_media::FrameSource;
use swing_models::{AnnotatedFrame, SwingSequence};

use crate::error::{WorkerError, WorkerResult};
use crate::pipeline::{PipelineStage, RunContext};

/// Decodes the video into sampled frames.
///
/// An empty result ends the run with [`WorkerError::NoFrames`].
pub struct SamplingStage {
    source: Arc<dyn FrameSource>,
}

impl SamplingStage {
    pub fn new(source: Arc<dyn FrameSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl PipelineStage for SamplingStage {
    async fn process(&self, sequence: &mut SwingSequence, ctx: &RunContext) -> WorkerResult<()> {
        let sampled = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => return Err(WorkerError::Cancelled),
            res = self.source.sample(&sequence.video_path, ctx.config.target_fps) => res?,
        };

        ctx.logger.log_progress(&format!(
            "Sampled {} frames with {} (native {:.2} fps, stride {})",
            sampled.frames.len(),
            self.source.name(),
            sampled.source.fps,
            sampled.source.stride
        ));

        sequence.source = Some(sampled.source);
        if sampled.frames.is_empty() {
            return Err(WorkerError::NoFrames);
        }

        sequence
            .frames
            .extend(sampled.frames.into_iter().map(AnnotatedFrame::new));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sampling"
    }
}
