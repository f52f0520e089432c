//! Request/response logging middleware with sensitive data redaction

use std::time::Instant;

use axum::{
    body::{to_bytes, Body},
    extract::MatchedPath,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, Level};

use crate::api::types::{ApiError, ApiErrorType};

/// Largest request body buffered for debug logging
pub const MAX_LOGGED_BODY_SIZE: usize = 1024 * 1024;

const LOGGED_BODY_PREVIEW: usize = 512;

static SENSITIVE_JSON_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(password|token|access_token|secret|jwt_secret)"\s*:\s*"(?:[^"\\]|\\.)*""#)
        .expect("valid redaction regex")
});

/// Middleware to log HTTP requests and responses with sensitive data redaction.
/// Spans come from `TraceLayer`; this only emits events.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);
    let headers_log = redact_headers(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %headers_log,
        "Incoming request"
    );

    let request = if tracing::enabled!(Level::DEBUG) && is_json(&request) {
        match log_json_body(request).await {
            Ok(request) => request,
            Err(response) => return response,
        }
    } else {
        request
    };

    let response = next.run(request).await;
    let status = response.status();

    info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

/// Buffer the body, log a redacted preview, and hand back an equivalent request
async fn log_json_body(request: Request<Body>) -> Result<Request<Body>, Response> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_LOGGED_BODY_SIZE).await.map_err(|_| {
        ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            ApiErrorType::ValidationError,
            format!("Request body exceeds {} bytes", MAX_LOGGED_BODY_SIZE),
        )
        .into_response()
    })?;

    let text = String::from_utf8_lossy(&bytes);
    debug!(
        body = %truncate_for_log(&redact_json_sensitive_fields(&text), LOGGED_BODY_PREVIEW),
        "Request body"
    );

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

fn is_json<B>(request: &Request<B>) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Redact sensitive headers for logging
fn redact_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .filter(|(name, _)| should_log_header(name.as_str()))
        .map(|(name, value)| {
            let value = if is_sensitive_header(name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            format!("{}={}", name.as_str(), value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check if a header contains sensitive information
fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "cookie" | "set-cookie" | "proxy-authorization"
    )
}

/// Check if a header should be logged
fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "accept"
            | "user-agent"
            | "x-request-id"
            | "x-forwarded-for"
            | "authorization"
            | "cookie"
    )
}

/// Replace the string values of password and token fields in a JSON text
pub fn redact_json_sensitive_fields(json: &str) -> String {
    SENSITIVE_JSON_FIELD
        .replace_all(json, r#""$1":"[REDACTED]""#)
        .into_owned()
}

/// Truncate long strings for logging
pub fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated {} bytes]", &s[..end], s.len() - end)
}
