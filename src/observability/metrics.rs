//! Metrics collection and exposition.
//!
//! # Metrics
//! - `echo_requests_total` (counter): requests by method, route, status
//! - `echo_request_duration_seconds` (histogram): handling latency by method, route
//!
//! # Design Decisions
//! - The route label is the registered pattern (`/dns/:domains`), never the
//!   raw path, so label cardinality stays bounded
//! - Methods outside the standard set share the `other` label for the
//!   same reason
//! - Without an installed recorder every call is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Route label for requests no route matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Method label for metrics. Extension methods collapse into `other`.
pub fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "HEAD" => "HEAD",
        "OPTIONS" => "OPTIONS",
        "PATCH" => "PATCH",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => "other",
    }
}

/// Record one handled request.
pub fn record_request(method: &Method, route: &str, status: u16, start: Instant) {
    let method = method_label(method);
    metrics::counter!(
        "echo_requests_total",
        "method" => method,
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "echo_request_duration_seconds",
        "method" => method,
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
