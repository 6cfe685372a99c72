//! Request logging middleware.
//!
//! Logs every HTTP request with method, path, status code, and latency, and
//! tags it with a request id echoed back in `x-request-id`.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const LIVENESS_PATH: &str = "/api/health";

/// Logs at INFO level for completed requests, WARN level for 5xx.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Liveness probes are noise
    if path == LIVENESS_PATH {
        return with_request_id(next.run(request).await, &request_id);
    }

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();
        info!("Request started");

        let response = next.run(request).await;

        let latency_ms = start.elapsed().as_millis() as u64;
        let status = response.status().as_u16();
        if status >= 500 {
            warn!(status, latency_ms, "Request failed (5xx)");
        } else {
            info!(status, latency_ms, "Request completed");
        }

        with_request_id(response, &request_id)
    }
    .instrument(span)
    .await
}

fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
