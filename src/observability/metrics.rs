//! Metrics collection and exposition.
//!
//! # Metrics
//! - `toolbox_requests_total` (counter): requests by method, path, status
//! - `toolbox_request_duration_seconds` (histogram): latency by path
//! - `toolbox_rate_limited_total` (counter): 429 rejections by class
//! - `toolbox_rate_limit_tracked_keys` (gauge): limiter map size by class

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Must be called from within the Tokio runtime. Failure to install is
/// logged and otherwise ignored; the server runs fine without metrics.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, path: &str, status: u16, started: Instant) {
    counter!(
        "toolbox_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("toolbox_request_duration_seconds", "path" => path.to_string())
        .record(started.elapsed().as_secs_f64());
}

/// Record a rate-limit rejection for an endpoint class.
pub fn record_rate_limited(class: &str) {
    counter!("toolbox_rate_limited_total", "class" => class.to_string()).increment(1);
}

/// Record how many identities a class limiter currently tracks.
pub fn record_tracked_keys(class: &str, tracked: usize) {
    gauge!("toolbox_rate_limit_tracked_keys", "class" => class.to_string()).set(tracked as f64);
}
