//! Passwordless sign-in link issuance.

use crate::error::ProxyError;
use crate::server::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

#[derive(Default, Deserialize)]
pub struct MagicLinkRequest {
    pub email: Option<String>,
    pub redirect_to: Option<String>,
}

/// `POST /magic-link`
pub async fn send_magic_link(
    State(state): State<AppState>,
    payload: Result<Json<MagicLinkRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ProxyError> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!("Unreadable magic-link body: {}", rejection);
            MagicLinkRequest::default()
        }
    };

    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| looks_like_email(e))
        .ok_or_else(|| ProxyError::BadRequest("A valid email is required".to_string()))?;

    let redirect_to = req
        .redirect_to
        .as_deref()
        .filter(|r| !r.is_empty())
        .unwrap_or(state.login_redirect_url.as_ref());

    state
        .backend
        .send_magic_link(email, redirect_to)
        .await
        .map_err(|e| {
            tracing::error!("Magic link request failed: {}", e);
            ProxyError::Internal("Failed to send magic link".to_string())
        })?;

    tracing::info!("Magic link sent");
    Ok(Json(serde_json::json!({ "message": "Magic link sent" })))
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
