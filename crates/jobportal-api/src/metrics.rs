//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "jobportal_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jobportal_http_request_duration_seconds";
    pub const RATE_LIMIT_HITS_TOTAL: &str = "jobportal_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a rate limit rejection.
pub fn record_rate_limit_hit(path: &str) {
    counter!(names::RATE_LIMIT_HITS_TOTAL, "path" => sanitize_path(path)).increment(1);
}

/// Record method/path/status/latency for every request.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

/// Collapse job ids into a placeholder so metric cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    match path.strip_prefix("/api/jobs/") {
        Some("search") | None => path.to_string(),
        Some(_) => "/api/jobs/:id".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/api/jobs"), "/api/jobs");
        assert_eq!(sanitize_path("/api/jobs/search"), "/api/jobs/search");
        assert_eq!(
            sanitize_path("/api/jobs/3f8a9c1e-aaaa-bbbb-cccc-0123456789ab"),
            "/api/jobs/:id"
        );
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
