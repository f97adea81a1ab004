use std::sync::Arc;

use async_trait::async_trait;
use swing_ml_client::{GenerationOracle, GenerationParams};
use swing_models::SwingSequence;
use tracing::error;

use crate::error::WorkerResult;
use crate::feedback::{
    build_prompt, normalize_feedback, GENERATION_FAILED_FEEDBACK, NO_ANALYSIS_FEEDBACK,
};
use crate::metrics;
use crate::pipeline::{PipelineStage, RunContext};

/// Turns the phase analyses into coaching text.
///
/// Generation failures never fail the run: the feedback falls back to a
/// fixed apology and the error is only logged.
pub struct FeedbackStage {
    oracle: Arc<dyn GenerationOracle>,
    params: GenerationParams,
}

impl FeedbackStage {
    pub fn new(oracle: Arc<dyn GenerationOracle>) -> Self {
        Self {
            oracle,
            params: GenerationParams::default(),
        }
    }
}

#[async_trait]
impl PipelineStage for FeedbackStage {
    async fn process(&self, sequence: &mut SwingSequence, ctx: &RunContext) -> WorkerResult<()> {
        if sequence.analysis.phases.is_empty() {
            sequence.feedback = NO_ANALYSIS_FEEDBACK.to_string();
            return Ok(());
        }

        let prompt = build_prompt(&sequence.analysis.phases);
        let generated = ctx
            .cancel
            .guard(
                ctx.config.oracle_timeout,
                self.oracle.generate(&prompt, &self.params),
            )
            .await;
        metrics::record_oracle_call("generation", generated.is_ok());

        sequence.feedback = match generated {
            Ok(raw) => normalize_feedback(&raw),
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                error!(analysis_id = %sequence.analysis_id, "Feedback generation failed: {}", e);
                GENERATION_FAILED_FEEDBACK.to_string()
            }
        };
        Ok(())
    }

    fn name(&self) -> &'static str {
        "feedback"
    }
}
