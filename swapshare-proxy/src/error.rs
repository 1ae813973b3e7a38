//! Proxy error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Proxy error types mapped to HTTP status codes.
///
/// Every message here is sent to the client as `{"error": message}`, so
/// handlers log upstream details themselves and pass a generic message.
#[derive(Debug)]
pub enum ProxyError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Internal(String),
}

impl std::fmt::Display for ProxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(e) => write!(f, "Bad request: {}", e),
            Self::Unauthorized(e) => write!(f, "Unauthorized: {}", e),
            Self::Forbidden(e) => write!(f, "Forbidden: {}", e),
            Self::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ProxyError {}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(e) => (StatusCode::BAD_REQUEST, e),
            Self::Unauthorized(e) => (StatusCode::UNAUTHORIZED, e),
            Self::Forbidden(e) => (StatusCode::FORBIDDEN, e),
            Self::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
