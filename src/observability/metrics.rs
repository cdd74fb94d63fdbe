//! Request metrics.
//!
//! # Metrics
//! - `mux_requests_total` (counter): dispatched requests by method, status, pattern
//! - `mux_request_duration_seconds` (histogram): dispatch latency by method, pattern
//!
//! # Design Decisions
//! - Labelled by matched pattern, never raw path, to keep cardinality bounded
//! - Recorded through the `metrics` facade; a no-op until an exporter is installed

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter, serving scrapes on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, pattern: &str, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();

    ::metrics::counter!(
        "mux_requests_total",
        "method" => method.to_owned(),
        "status" => status.to_string(),
        "pattern" => pattern.to_owned()
    )
    .increment(1);

    ::metrics::histogram!(
        "mux_request_duration_seconds",
        "method" => method.to_owned(),
        "pattern" => pattern.to_owned()
    )
    .record(elapsed);
}
