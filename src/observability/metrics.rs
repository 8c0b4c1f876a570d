//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by method, status, cache outcome
//! - `edge_request_duration_seconds` (histogram): latency distribution
//! - `edge_cache_events_total` (counter): lookups, stores and absorbed failures
//! - `edge_cache_entries` (gauge): entries held by the in-memory store
//! - `edge_revalidations_total` (counter): background refresh outcomes
//!
//! Recording is a no-op until a recorder is installed, so tests need no setup.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, cache: &'static str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("cache", cache.to_string()),
    ];
    counter!("edge_requests_total", &labels).increment(1);
    histogram!("edge_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record a cache event (`hit`, `miss`, `stored`, `lookup_error`, `store_error`).
pub fn record_cache_event(event: &'static str) {
    counter!("edge_cache_events_total", "event" => event).increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("edge_cache_entries").set(entries as f64);
}

/// Record a background revalidation outcome (`refreshed`, `failed`).
pub fn record_revalidation(outcome: &'static str) {
    counter!("edge_revalidations_total", "outcome" => outcome).increment(1);
}
