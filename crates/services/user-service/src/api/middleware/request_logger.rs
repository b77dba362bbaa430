//! Request logging middleware.
//!
//! Runs inside the request-id layer, so every request already carries an
//! `x-request-id` when it gets here.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tower_http::request_id::RequestId;
use tracing::Span;

/// Correlation identifier assigned to the request, if any.
pub fn request_id<B>(request: &axum::http::Request<B>) -> Option<String> {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(str::to_string)
}

/// Span wrapping the whole request so that handler and service logs carry
/// the request id.
pub fn make_request_span(request: &Request) -> Span {
    let request_id = request_id(request).unwrap_or_else(|| "unknown".to_string());
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Log method, path, status, duration and request id of every request.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(&request).unwrap_or_else(|| "unknown".to_string());

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = %request_id,
        "HTTP Request"
    );

    response
}
