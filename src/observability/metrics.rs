//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rest_bridge_requests_total` (counter): bridge invocations by outcome, status
//! - `rest_bridge_request_duration_seconds` (histogram): invocation latency by outcome
//!
//! # Design Decisions
//! - Outcome label is the failure kind (`remote_error`, `transport_failure`, ...)
//!   or `success`
//! - Recording without an installed exporter is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Prometheus exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install Prometheus exporter"),
    }
}

/// Record one finished bridge invocation.
pub fn record_outcome(outcome: &'static str, status: u16, start: Instant) {
    counter!(
        "rest_bridge_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("rest_bridge_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
