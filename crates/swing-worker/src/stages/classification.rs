use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use swing_ml_client::{ClassificationOracle, LabelScores};
use swing_models::{EncodedImage, PhaseDetection, SwingPhase, SwingSequence};
use tracing::{debug, warn};

use crate::analyzer::{analyze_phase_scores, average_scores};
use crate::error::{WorkerError, WorkerResult};
use crate::metrics;
use crate::pipeline::{PipelineStage, RunContext};
use crate::retry::retry_with_backoff;

/// Scores each phase's renderings against the phase vocabulary.
///
/// A frame whose calls all fail is left out of the average. A phase with
/// no renderings is marked [`PhaseDetection::NoFrames`]; one where every
/// frame failed is marked [`PhaseDetection::Failed`].
pub struct ClassificationStage {
    oracle: Arc<dyn ClassificationOracle>,
}

impl ClassificationStage {
    pub fn new(oracle: Arc<dyn ClassificationOracle>) -> Self {
        Self { oracle }
    }

    async fn classify_frame(
        &self,
        ctx: &RunContext,
        image: &EncodedImage,
        descriptors: &[&str],
    ) -> WorkerResult<LabelScores> {
        let retry = ctx.config.classify_retry();
        let deadline = ctx.config.oracle_timeout;

        retry_with_backoff(
            &retry,
            move || async move {
                let result = ctx
                    .cancel
                    .guard(deadline, self.oracle.classify(image, descriptors))
                    .await;
                metrics::record_oracle_call("classification", result.is_ok());
                result
            },
            |e: &WorkerError| !e.is_cancelled(),
        )
        .await
    }
}

#[async_trait]
impl PipelineStage for ClassificationStage {
    async fn process(&self, sequence: &mut SwingSequence, ctx: &RunContext) -> WorkerResult<()> {
        let concurrency = ctx.config.classify_concurrency.max(1);

        for phase in SwingPhase::ALL {
            let descriptors = phase.descriptors();
            if descriptors.is_empty() {
                debug!(phase = phase.key(), "No descriptors");
                continue;
            }

            let renderings: Vec<(usize, &EncodedImage)> = sequence
                .frames_in_phase(phase)
                .filter_map(|f| f.rendering.as_ref().map(|r| (f.index(), r)))
                .collect();

            if renderings.is_empty() {
                debug!(phase = phase.key(), "No frames");
                record(sequence, phase, PhaseDetection::NoFrames);
                continue;
            }

            let pending: Vec<_> = renderings
                .iter()
                .map(|&(index, image)| {
                    let scored = self.classify_frame(ctx, image, descriptors);
                    async move { (index, scored.await) }
                })
                .collect();

            // `buffered` keeps results in frame order
            let results: Vec<(usize, WorkerResult<LabelScores>)> = stream::iter(pending)
                .buffered(concurrency)
                .collect()
                .await;

            let mut frame_scores = Vec::with_capacity(results.len());
            for (index, result) in results {
                match result {
                    Ok(scores) if scores.is_empty() => {
                        debug!(phase = phase.key(), frame = index, "Empty score map");
                    }
                    Ok(scores) => frame_scores.push(scores),
                    Err(e) if e.is_cancelled() => return Err(e),
                    Err(e) => {
                        warn!(phase = phase.key(), frame = index, "Classification failed: {}", e);
                    }
                }
            }

            if frame_scores.is_empty() {
                ctx.logger
                    .log_warning(&format!("{}: no frame could be classified", phase.label()));
                record(sequence, phase, PhaseDetection::Failed);
                continue;
            }

            let averaged = average_scores(descriptors, &frame_scores);
            let analysis = analyze_phase_scores(&averaged);
            ctx.logger.log_progress(&format!(
                "{}: {} frames scored, confidence {:.3}",
                phase.label(),
                frame_scores.len(),
                analysis.confidence
            ));
            sequence.analysis.insert_classified(phase, analysis);
            metrics::record_phase(PhaseDetection::Classified.as_str());
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "classification"
    }
}

fn record(sequence: &mut SwingSequence, phase: SwingPhase, detection: PhaseDetection) {
    sequence.analysis.mark_undetected(phase, detection);
    metrics::record_phase(detection.as_str());
}
