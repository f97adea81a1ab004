//! Worker configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryConfig;

/// Pipeline run configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Frames kept per second of source video
    pub target_fps: f64,
    /// Total classification attempts per frame, first call included
    pub classify_max_attempts: u32,
    /// Wait before the second attempt; doubles after each failure
    pub classify_base_delay: Duration,
    /// Classification calls in flight per phase (1 = sequential)
    pub classify_concurrency: usize,
    /// Deadline for a single oracle call
    pub oracle_timeout: Duration,
    /// Deadline for a whole run, if any
    pub run_timeout: Option<Duration>,
    /// Reject videos that do not look like a golf swing
    pub validate_swing: bool,
    /// Root directory for written frames and analysis records
    pub output_dir: PathBuf,
    /// Prometheus listener address
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            target_fps: 1.0,
            classify_max_attempts: 3,
            classify_base_delay: Duration::from_secs(1),
            classify_concurrency: 1,
            oracle_timeout: Duration::from_secs(120),
            run_timeout: None,
            validate_swing: false,
            output_dir: PathBuf::from("media/analysis"),
            metrics_addr: None,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            target_fps: std::env::var("SWING_TARGET_FPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|fps: &f64| *fps > 0.0)
                .unwrap_or(defaults.target_fps),
            classify_max_attempts: std::env::var("SWING_CLASSIFY_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &u32| *n > 0)
                .unwrap_or(defaults.classify_max_attempts),
            classify_base_delay: std::env::var("SWING_CLASSIFY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.classify_base_delay),
            classify_concurrency: std::env::var("SWING_CLASSIFY_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.classify_concurrency),
            oracle_timeout: Duration::from_secs(
                std::env::var("SWING_ORACLE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.oracle_timeout.as_secs()),
            ),
            run_timeout: std::env::var("SWING_RUN_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
            validate_swing: std::env::var("SWING_VALIDATE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.validate_swing),
            output_dir: std::env::var("SWING_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            metrics_addr: std::env::var("METRICS_ADDR")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Retry policy for classification calls.
    pub fn classify_retry(&self) -> RetryConfig {
        RetryConfig::new("classify")
            .with_max_attempts(self.classify_max_attempts)
            .with_base_delay(self.classify_base_delay)
    }
}
