//! Logging middleware
//!
//! Tags every request with an id, echoed in `x-request-id`, and writes one
//! completion line with method, path, status and duration.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Layer function logging each request
pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!("request", request_id = %request_id, method = %method, path = %path);

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let duration_ms = started.elapsed().as_millis() as u64;
    let status = response.status();

    span.in_scope(|| {
        if status.is_server_error() {
            error!(status = status.as_u16(), duration_ms = duration_ms, "Request completed");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), duration_ms = duration_ms, "Request completed");
        } else {
            info!(status = status.as_u16(), duration_ms = duration_ms, "Request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}
