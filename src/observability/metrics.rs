//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (requests, latency, upstream outcomes)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `user_proxy_requests_total` (counter): inbound requests by method, route, status
//! - `user_proxy_request_duration_seconds` (histogram): inbound latency
//! - `user_proxy_upstream_requests_total` (counter): upstream calls by operation, outcome
//! - `user_proxy_upstream_duration_seconds` (histogram): upstream latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Upstream outcome is the status code, or the failure kind when no response arrived

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one completed inbound request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "user_proxy_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "user_proxy_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call.
pub fn record_upstream(operation: &'static str, outcome: &str, start: Instant) {
    metrics::counter!(
        "user_proxy_upstream_requests_total",
        "operation" => operation,
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("user_proxy_upstream_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Axum middleware recording every inbound request against its route template.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
