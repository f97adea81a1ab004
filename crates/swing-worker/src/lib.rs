//! Golf swing analysis pipeline.
//!
//! This crate provides:
//! - The stage orchestrator and the standard stage list
//! - Golfer selection, phase segmentation and phase score analysis
//! - Classification retry with exponential backoff
//! - Coaching prompt rendering
//! - Run cancellation, per-call deadlines, logging and metrics
//! - Writing finished runs to disk

pub mod analyzer;
pub mod cancel;
pub mod config;
pub mod error;
pub mod feedback;
pub mod golfer;
pub mod logging;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod retry;
pub mod segmenter;
pub mod stages;

pub use cancel::{CancelHandle, CancelToken};
pub use config::WorkerConfig;
pub use error::{PipelineFailure, WorkerError, WorkerResult};
pub use logging::RunLogger;
pub use output::{write_analysis, WrittenAnalysis};
pub use pipeline::{Oracles, PipelineStage, RunContext, SwingPipeline};
