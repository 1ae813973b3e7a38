//! Axum router setup.

use crate::auth::require_api_key;
use crate::config::ProxyConfig;
use crate::handlers::{account, auth_user, magic_link};
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use swapshare_core::AccountBackend;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;


/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn AccountBackend>,
    pub api_key: Option<Arc<str>>,
    pub login_redirect_url: Arc<str>,
}

impl AppState {
    pub fn new(backend: Arc<dyn AccountBackend>, config: &ProxyConfig) -> Self {
        Self {
            backend,
            api_key: config.api_key.as_deref().map(Arc::from),
            login_redirect_url: Arc::from(config.login_redirect_url.as_str()),
        }
    }
}

pub fn build_router(state: AppState, config: &ProxyConfig) -> Router {
    // Routes behind the API key
    let gated = Router::new()
        .route("/delete-user", delete(account::delete_user))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let public = Router::new()
        .route("/", get(auth_user::confirm_email))
        .route("/auth-user", get(auth_user::auth_user))
        .route("/login-success", get(auth_user::login_success))
        .route("/magic-link", post(magic_link::send_magic_link))
        .route("/health", get(health));

    Router::new()
        .merge(gated)
        .merge(public)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.max_payload_size))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
