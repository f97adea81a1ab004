//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; the binary installs a Prometheus
//! exporter when `METRICS_ADDR` is set, otherwise these are no-ops.

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Metric name constants for consistency.
pub mod names {
    /// Oracle calls by oracle and outcome.
    pub const ORACLE_CALLS_TOTAL: &str = "swing_oracle_calls_total";

    /// Retry attempts by operation.
    pub const ORACLE_RETRIES_TOTAL: &str = "swing_oracle_retries_total";

    /// Stage duration in seconds by stage and outcome.
    pub const STAGE_DURATION_SECONDS: &str = "swing_stage_duration_seconds";

    /// Classified phases by detection outcome.
    pub const PHASES_TOTAL: &str = "swing_phases_total";
}

/// Install the Prometheus exporter with an HTTP listener.
pub fn install_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()
}

/// Record the outcome of one oracle call.
pub fn record_oracle_call(oracle: &'static str, ok: bool) {
    counter!(
        names::ORACLE_CALLS_TOTAL,
        "oracle" => oracle,
        "outcome" => if ok { "ok" } else { "error" }
    )
    .increment(1);
}

/// Record a retry attempt.
pub fn record_retry(operation: &str) {
    counter!(
        names::ORACLE_RETRIES_TOTAL,
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Record how long a stage ran.
pub fn record_stage(stage: &'static str, ok: bool, duration_secs: f64) {
    histogram!(
        names::STAGE_DURATION_SECONDS,
        "stage" => stage,
        "outcome" => if ok { "ok" } else { "error" }
    )
    .record(duration_secs);
}

/// Record a phase's detection outcome.
pub fn record_phase(detection: &'static str) {
    counter!(names::PHASES_TOTAL, "detection" => detection).increment(1);
}
