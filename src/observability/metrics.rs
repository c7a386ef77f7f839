//! Metrics collection and exposition.
//!
//! # Metrics
//! - `health_probe_total` (counter): probes by outcome (`passed`, `failed`)
//! - `health_check_total` (counter): aggregate checks by verdict (`ok`, `failed`)
//! - `health_check_duration_seconds` (histogram): wall time of one aggregate check
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(passed: bool) {
    let outcome = if passed { "passed" } else { "failed" };
    counter!("health_probe_total", "outcome" => outcome).increment(1);
}

pub fn record_check(healthy: bool, started: Instant) {
    let verdict = if healthy { "ok" } else { "failed" };
    counter!("health_check_total", "verdict" => verdict).increment(1);
    histogram!("health_check_duration_seconds").record(started.elapsed().as_secs_f64());
}
