//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): HTTP requests by method, status
//! - `gateway_request_duration_seconds` (histogram): HTTP latency
//! - `gateway_upstream_requests_total` (counter): upstream calls by api, outcome
//! - `gateway_upstream_request_duration_seconds` (histogram): upstream latency
//! - `gateway_current_block_height` (gauge): last height seen by the block cache

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a served HTTP request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call. `outcome` is `ok` or `error`.
pub fn record_upstream(api: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!("gateway_upstream_requests_total", "api" => api, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("gateway_upstream_request_duration_seconds", "api" => api)
        .record(start.elapsed().as_secs_f64());
}

/// Record the height held by the current-block cache.
pub fn record_block_height(height: f64) {
    metrics::gauge!("gateway_current_block_height").set(height);
}
