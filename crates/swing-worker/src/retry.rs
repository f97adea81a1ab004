//! Exponential backoff for flaky oracle calls.
//!
//! The first retry waits `base_delay` and each later one doubles it, capped
//! at `max_delay`. With the defaults a call is tried three times, sleeping
//! 1 s and then 2 s between attempts.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::metrics;

/// Backoff policy for one kind of call.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, first call included
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Label for logs and the retry counter
    pub operation: String,
}

impl RetryConfig {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            operation: operation.into(),
        }
    }

    /// Clamped to at least one attempt.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Sleep before the attempt following the `failures`-th failure.
    pub fn backoff(&self, failures: u32) -> Duration {
        let factor = 2u32.saturating_pow(failures.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Run `call` until it succeeds, attempts run out, or `should_retry`
/// rejects the error. The last error is returned unchanged.
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    config: &RetryConfig,
    call: F,
    should_retry: P,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut failures = 0u32;

    loop {
        let err = match call().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        failures += 1;

        if failures >= config.max_attempts || !should_retry(&err) {
            if failures > 1 {
                warn!(
                    operation = %config.operation,
                    attempts = failures,
                    "Giving up: {}", err
                );
            }
            return Err(err);
        }

        let wait = config.backoff(failures);
        debug!(
            operation = %config.operation,
            attempt = failures,
            ?wait,
            "Attempt failed, backing off: {}", err
        );
        metrics::record_retry(&config.operation);
        tokio::time::sleep(wait).await;
    }
}
