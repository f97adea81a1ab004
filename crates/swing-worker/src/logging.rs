//! Per-run structured logging.

use std::path::Path;

use swing_models::AnalysisId;
use tracing::{error, info, warn, Span};

/// Tags every event of one analysis run with its id and video name.
#[derive(Debug, Clone)]
pub struct RunLogger {
    analysis_id: String,
    video: String,
}

impl RunLogger {
    pub fn new(analysis_id: &AnalysisId, video_path: &Path) -> Self {
        let video = video_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| video_path.display().to_string());
        Self {
            analysis_id: analysis_id.to_string(),
            video,
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(analysis_id = %self.analysis_id, video = %self.video, "Analysis started: {}", message);
    }

    pub fn log_progress(&self, message: &str) {
        info!(analysis_id = %self.analysis_id, video = %self.video, "{}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(analysis_id = %self.analysis_id, video = %self.video, "{}", message);
    }

    pub fn log_error(&self, message: &str) {
        error!(analysis_id = %self.analysis_id, video = %self.video, "Analysis failed: {}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(analysis_id = %self.analysis_id, video = %self.video, "Analysis finished: {}", message);
    }

    pub fn analysis_id(&self) -> &str {
        &self.analysis_id
    }

    pub fn video(&self) -> &str {
        &self.video
    }

    /// Span wrapping every stage of the run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("swing_run", analysis_id = %self.analysis_id, video = %self.video)
    }
}
