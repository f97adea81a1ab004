use std::sync::Arc;

use async_trait::async_trait;
use swing_media::encode_frame;
use swing_media::skeleton::KEYPOINT_THRESHOLD;
use swing_ml_client::{DetectionOracle, PoseOracle};
use swing_models::SwingSequence;
use tracing::{debug, warn};

use crate::error::WorkerResult;
use crate::golfer::select_golfer;
use crate::metrics;
use crate::pipeline::{PipelineStage, RunContext};

/// Locates the golfer in each frame and estimates their pose.
///
/// Detection failures abort the stage. Pose failures only cost the frame
/// its pose: the frame stays in the sequence without one.
pub struct PoseStage {
    detector: Arc<dyn DetectionOracle>,
    estimator: Arc<dyn PoseOracle>,
}

impl PoseStage {
    pub fn new(detector: Arc<dyn DetectionOracle>, estimator: Arc<dyn PoseOracle>) -> Self {
        Self {
            detector,
            estimator,
        }
    }
}

#[async_trait]
impl PipelineStage for PoseStage {
    async fn process(&self, sequence: &mut SwingSequence, ctx: &RunContext) -> WorkerResult<()> {
        let deadline = ctx.config.oracle_timeout;
        for annotated in sequence.frames.iter_mut() {
            let frame = &annotated.frame;
            let image = encode_frame(frame)?;

            let detected = ctx.cancel.guard(deadline, self.detector.detect(&image)).await;
            metrics::record_oracle_call("detection", detected.is_ok());
            let people = detected?;

            let golfer = select_golfer(frame.width(), frame.height(), &people);
            debug!(
                frame = frame.index(),
                candidates = people.len(),
                bbox = ?golfer.to_xywh(),
                "Selected golfer"
            );
            annotated.golfer_box = Some(golfer);

            let estimated = ctx
                .cancel
                .guard(deadline, self.estimator.estimate(&image, &golfer))
                .await;
            metrics::record_oracle_call("pose", estimated.is_ok());

            match estimated {
                Ok(results) => match results.into_iter().next() {
                    Some(pose) => {
                        debug!(
                            frame = annotated.index(),
                            confident = pose.confident_keypoints(KEYPOINT_THRESHOLD),
                            "Pose estimated"
                        );
                        annotated.pose = Some(pose);
                    }
                    None => debug!(frame = annotated.index(), "No pose in selected box"),
                },
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!(frame = annotated.index(), "Pose estimation failed: {}", e);
                }
            }
        }

        ctx.logger.log_progress(&format!(
            "Pose estimated for {}/{} frames",
            sequence.pose_count(),
            sequence.frames.len()
        ));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "pose"
    }
}
