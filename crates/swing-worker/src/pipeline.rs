//! Stage orchestration.
//!
//! A run starts from an empty [`SwingSequence`] for the video and folds it
//! through each registered stage in order. The first failing stage aborts
//! the run; nothing already written to the sequence is rolled back.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use swing_media::{FrameRenderer, FrameSource};
use swing_ml_client::{ClassificationOracle, DetectionOracle, GenerationOracle, PoseOracle};
use swing_models::SwingSequence;
use tracing::Instrument;

use crate::cancel::CancelToken;
use crate::config::WorkerConfig;
use crate::error::{PipelineFailure, WorkerError, WorkerResult};
use crate::logging::RunLogger;
use crate::metrics;
use crate::stages::{
    ClassificationStage, FeedbackStage, PoseStage, SamplingStage, SegmentationStage,
    ValidationStage, VisualizationStage,
};

/// Per-run state shared by every stage.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: Arc<WorkerConfig>,
    pub cancel: CancelToken,
    pub logger: RunLogger,
}

impl RunContext {
    /// Fail fast if the run was cancelled.
    pub fn check_cancelled(&self) -> WorkerResult<()> {
        if self.cancel.is_cancelled() {
            Err(WorkerError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// One step of the pipeline: enrich the sequence in place.
#[async_trait]
pub trait PipelineStage: Send + Sync {
    async fn process(&self, sequence: &mut SwingSequence, ctx: &RunContext) -> WorkerResult<()>;

    /// Stage identity used in failures, logs and metrics.
    fn name(&self) -> &'static str;
}

/// The external services a standard pipeline talks to.
#[derive(Clone)]
pub struct Oracles {
    pub detection: Arc<dyn DetectionOracle>,
    pub pose: Arc<dyn PoseOracle>,
    pub classification: Arc<dyn ClassificationOracle>,
    pub generation: Arc<dyn GenerationOracle>,
}

/// Ordered list of stages run over one sequence.
pub struct SwingPipeline {
    stages: Vec<Box<dyn PipelineStage>>,
    config: Arc<WorkerConfig>,
}

impl SwingPipeline {
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            stages: Vec::new(),
            config: Arc::new(config),
        }
    }

    /// Append a stage.
    pub fn add_stage(mut self, stage: impl PipelineStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// The full analysis pipeline.
    ///
    /// Validation runs right after sampling when `validate_swing` is set.
    pub fn standard(
        config: WorkerConfig,
        frames: Arc<dyn FrameSource>,
        renderer: Arc<dyn FrameRenderer>,
        oracles: Oracles,
    ) -> Self {
        let validate = config.validate_swing;
        let mut pipeline = Self::new(config).add_stage(SamplingStage::new(frames));

        if validate {
            pipeline = pipeline.add_stage(ValidationStage::new(oracles.classification.clone()));
        }

        pipeline
            .add_stage(PoseStage::new(oracles.detection, oracles.pose))
            .add_stage(VisualizationStage::new(renderer))
            .add_stage(SegmentationStage)
            .add_stage(ClassificationStage::new(oracles.classification))
            .add_stage(FeedbackStage::new(oracles.generation))
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage over a fresh sequence for `video_path`.
    ///
    /// Applies `run_timeout` from the config, if set.
    pub async fn run(&self, video_path: impl AsRef<Path>) -> Result<SwingSequence, PipelineFailure> {
        let (handle, cancel) = CancelToken::channel();
        let timer = self.config.run_timeout.map(|t| handle.cancel_after(t));

        let result = self.run_with(SwingSequence::new(video_path), cancel).await;

        if let Some(timer) = timer {
            timer.abort();
        }
        result
    }

    /// Run every stage over `sequence`, observing `cancel`.
    pub async fn run_with(
        &self,
        mut sequence: SwingSequence,
        cancel: CancelToken,
    ) -> Result<SwingSequence, PipelineFailure> {
        let ctx = RunContext {
            config: self.config.clone(),
            cancel,
            logger: RunLogger::new(&sequence.analysis_id, &sequence.video_path),
        };
        let span = ctx.logger.create_span();

        async {
            ctx.logger
                .log_start(&format!("{} stages", self.stages.len()));

            for stage in &self.stages {
                let started = Instant::now();
                let outcome = match ctx.check_cancelled() {
                    Ok(()) => stage.process(&mut sequence, &ctx).await,
                    Err(e) => Err(e),
                };
                let elapsed = started.elapsed().as_secs_f64();
                metrics::record_stage(stage.name(), outcome.is_ok(), elapsed);

                if let Err(cause) = outcome {
                    let failure = PipelineFailure::new(stage.name(), cause, sequence);
                    ctx.logger.log_error(&failure.to_string());
                    return Err(failure);
                }

                tracing::debug!(stage = stage.name(), elapsed_secs = elapsed, "Stage complete");
            }

            ctx.logger.log_completion(&format!(
                "{} frames, {} phases classified",
                sequence.frames.len(),
                sequence.analysis.classified_count()
            ));
            Ok(sequence)
        }
        .instrument(span)
        .await
    }
}
