//! HTTP middleware

use axum::{
    extract::Request,
    http::{HeaderValue, Method, Uri, header},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use super::extractors::RequestId;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request logging middleware
///
/// Logs every request with timing information and tags it with a request
/// id, echoed back in the `x-request-id` header.
pub async fn request_logging_middleware(
    method: Method,
    uri: Uri,
    mut request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    request.extensions_mut().insert(RequestId(request_id.clone()));

    info!(
        method = %method,
        uri = %uri,
        request_id = %request_id,
        "HTTP request started"
    );

    let mut response = next.run(request).await;
    let status = response.status().as_u16();
    let duration = start.elapsed();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if status >= 400 {
        warn!(
            method = %method,
            uri = %uri,
            status = status,
            request_id = %request_id,
            duration_ms = duration.as_millis(),
            "HTTP request completed with error"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            status = status,
            request_id = %request_id,
            duration_ms = duration.as_millis(),
            "HTTP request completed"
        );
    }

    response
}

/// Security headers middleware
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
