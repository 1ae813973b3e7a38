//! Shared-secret gate for privileged routes.

use crate::error::ProxyError;
use crate::server::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use swapshare_core::API_KEY_HEADER;

/// Rejects the request with 403 unless `x-api-key` matches the configured key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ProxyError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .map(|v| v.as_bytes());

    if let Err(e) = check_api_key(provided, state.api_key.as_deref()) {
        tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        return Err(e);
    }

    Ok(next.run(request).await)
}

/// A missing or empty configured key rejects everything.
fn check_api_key(provided: Option<&[u8]>, expected: Option<&str>) -> Result<(), ProxyError> {
    let provided = provided.ok_or_else(|| ProxyError::Forbidden("Missing API Key".to_string()))?;

    match expected {
        Some(key) if !key.is_empty() && key.as_bytes() == provided => Ok(()),
        _ => Err(ProxyError::Forbidden("Unauthorized".to_string())),
    }
}
