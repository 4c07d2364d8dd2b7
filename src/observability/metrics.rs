//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ise_proxy_requests_total` (counter): requests by route, status
//! - `ise_proxy_request_duration_seconds` (histogram): latency by route
//! - `ise_proxy_upstream_requests_total` (counter): upstream calls by outcome
//! - `ise_proxy_upstream_duration_seconds` (histogram): upstream latency
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed inbound request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "ise_proxy_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("ise_proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream call; `outcome` is "response" or "error".
pub fn record_upstream(outcome: &'static str, start: Instant) {
    metrics::counter!("ise_proxy_upstream_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("ise_proxy_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}
