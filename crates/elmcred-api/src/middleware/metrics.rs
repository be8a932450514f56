//! # Request Metrics
//!
//! Counts requests by method and status class through the `metrics`
//! facade. The counters appear on `/metrics` when a Prometheus recorder
//! is installed and cost nothing otherwise.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Middleware that counts requests by method and status class.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();

    let response = next.run(request).await;

    let class = match response.status().as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    };
    ::metrics::counter!("elmcred_http_requests_total", "method" => method, "status" => class)
        .increment(1);

    response
}
