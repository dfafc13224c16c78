//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): exchanges by terminal outcome and
//!   reply status
//! - `relay_request_duration_seconds` (histogram): end-to-end exchange
//!   latency
//!
//! Recording without an installed exporter is a no-op, so handlers call in
//! unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(err) => tracing::error!(%err, "Failed to start metrics exporter"),
    }
}

/// Record one terminal relay outcome.
pub fn record_relay(outcome: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
