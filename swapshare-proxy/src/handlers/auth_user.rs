//! Session token lookup and the sign-in redirect.

use crate::error::ProxyError;
use crate::server::AppState;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Json;
use reqwest::Url;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct TokenQuery {
    pub access_token: Option<String>,
}

impl TokenQuery {
    fn token(self) -> Option<String> {
        self.access_token.filter(|t| !t.is_empty())
    }
}

/// `GET /auth-user`: resolve the user that owns a session token.
pub async fn auth_user(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<serde_json::Value>, ProxyError> {
    let token = query
        .token()
        .ok_or_else(|| ProxyError::BadRequest("No access token found.".to_string()))?;

    match state.backend.fetch_user(&token).await {
        Ok(user) => {
            tracing::info!("Resolved auth user {}", user.id);
            Ok(Json(serde_json::json!({ "user": user })))
        }
        Err(e) => {
            tracing::error!("Auth failed: {}", e);
            Err(ProxyError::Unauthorized("Invalid access token".to_string()))
        }
    }
}

/// `GET /login-success`: verify the token from the email link, then hand it
/// to the app through its URL scheme.
pub async fn login_success(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Redirect, ProxyError> {
    let token = query
        .token()
        .ok_or_else(|| ProxyError::BadRequest("Missing access_token".to_string()))?;

    let user = state.backend.fetch_user(&token).await.map_err(|e| {
        tracing::error!("Verification redirect failed: {}", e);
        ProxyError::Internal("Failed to verify access token".to_string())
    })?;
    tracing::info!(
        "Verified user on redirect: {}",
        user.email.as_deref().unwrap_or(&user.id)
    );

    let target = redirect_target(&state.login_redirect_url, &token)?;
    Ok(Redirect::to(&target))
}

fn redirect_target(base: &str, token: &str) -> Result<String, ProxyError> {
    let mut url = Url::parse(base).map_err(|e| {
        tracing::error!("Invalid login redirect URL {}: {}", base, e);
        ProxyError::Internal("Failed to verify access token".to_string())
    })?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url.to_string())
}

/// `GET /`: landing page for the email confirmation link.
pub async fn confirm_email(Query(query): Query<TokenQuery>) -> &'static str {
    if query.token().is_some() {
        tracing::debug!("Email confirmation link opened");
        "Email confirmation successful! You can now log in."
    } else {
        "Hello World! No token provided."
    }
}
