//! Request ID handling for the ingress.
//!
//! # Design Decisions
//! - A well-formed inbound `x-request-id` is reused as the bus correlation id
//! - Anything else gets a fresh UUID v4

use axum::http::HeaderMap;
use uuid::Uuid;

/// Header carrying the correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation id for an inbound request.
pub fn request_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .unwrap_or_else(Uuid::new_v4)
}
