use std::sync::Arc;

use async_trait::async_trait;
use swing_media::encode_frame;
use swing_ml_client::ClassificationOracle;
use swing_models::SwingSequence;
use tracing::debug;

use crate::error::{WorkerError, WorkerResult};
use crate::metrics;
use crate::pipeline::{PipelineStage, RunContext};

/// Candidate labels for the swing check; the first is the positive one.
pub const SWING_LABELS: [&str; 2] = ["a golf swing", "something other than a golf swing"];

/// Frames inspected from the start of the video.
const FRAMES_TO_CHECK: usize = 10;

/// Score a frame must exceed on [`SWING_LABELS`]`[0]`.
const SWING_THRESHOLD: f64 = 0.5;

/// Rejects videos whose opening frames do not look like a golf swing.
pub struct ValidationStage {
    oracle: Arc<dyn ClassificationOracle>,
}

impl ValidationStage {
    pub fn new(oracle: Arc<dyn ClassificationOracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl PipelineStage for ValidationStage {
    async fn process(&self, sequence: &mut SwingSequence, ctx: &RunContext) -> WorkerResult<()> {
        let mut best_score = 0.0_f64;

        for annotated in sequence.frames.iter().take(FRAMES_TO_CHECK) {
            let image = encode_frame(&annotated.frame)?;
            let result = ctx
                .cancel
                .guard(
                    ctx.config.oracle_timeout,
                    self.oracle.classify(&image, &SWING_LABELS),
                )
                .await;
            metrics::record_oracle_call("classification", result.is_ok());

            let score = result?.get(SWING_LABELS[0]).copied().unwrap_or(0.0);
            debug!(frame = annotated.index(), score, "Swing check");

            if score > SWING_THRESHOLD {
                return Ok(());
            }
            best_score = best_score.max(score);
        }

        Err(WorkerError::NotAGolfSwing { best_score })
    }

    fn name(&self) -> &'static str {
        "validation"
    }
}
