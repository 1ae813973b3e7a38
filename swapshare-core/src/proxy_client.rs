//! HTTP client for the Swap & Share account proxy.

use crate::cascade::CascadeStep;
use crate::models::AuthUser;
use crate::{Result, SwapShareError};
use reqwest::Response;
use serde::{Deserialize, Serialize};

/// Header carrying the shared secret for gated routes.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Body of a successful `DELETE /delete-user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub message: String,
    /// Table deletes that failed and were skipped.
    #[serde(default)]
    pub failed_steps: Vec<CascadeStep>,
}

#[derive(Deserialize)]
struct AuthUserEnvelope {
    user: AuthUser,
}

/// Client used by the app side to reach the proxy routes.
pub struct ProxyClient {
    client: reqwest::Client,
    proxy_url: String,
    api_key: Option<String>,
}

impl ProxyClient {
    pub fn new(proxy_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Delete the account and all of its data.
    pub async fn delete_user(&self, user_id: &str) -> Result<DeleteUserResponse> {
        let url = format!("{}/delete-user", self.proxy_url);
        let mut request = self
            .client
            .delete(&url)
            .json(&serde_json::json!({ "userID": user_id }));
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let resp = Self::check(request.send().await?).await?;
        Ok(resp.json().await?)
    }

    /// Ask for a sign-in link to be emailed.
    pub async fn request_magic_link(&self, email: &str, redirect_to: Option<&str>) -> Result<()> {
        let url = format!("{}/magic-link", self.proxy_url);
        let body = serde_json::json!({
            "email": email,
            "redirect_to": redirect_to,
        });
        let resp = self.client.post(&url).json(&body).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Look up the user behind a session token.
    pub async fn auth_user(&self, access_token: &str) -> Result<AuthUser> {
        let url = format!("{}/auth-user", self.proxy_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("access_token", access_token)])
            .send()
            .await?;

        let envelope: AuthUserEnvelope = Self::check(resp).await?.json().await?;
        Ok(envelope.user)
    }

    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_else(|_| "unknown".to_string());
        Err(SwapShareError::Remote {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};

    async fn fake_delete(
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        if headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) != Some("secret") {
            return (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({"error": "Unauthorized"})),
            );
        }
        assert_eq!(body["userID"], "user-1");
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "User deleted successfully",
                "failed_steps": [{"table": "chats", "column": "senderID", "error": "boom"}]
            })),
        )
    }

    async fn fake_auth_user() -> Json<serde_json::Value> {
        Json(serde_json::json!({"user": {"id": "user-1", "email": "a@b.c"}}))
    }

    async fn fake_magic_link() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    async fn spawn_fake_proxy() -> String {
        let app = Router::new()
            .route("/delete-user", delete(fake_delete))
            .route("/auth-user", get(fake_auth_user))
            .route("/magic-link", post(fake_magic_link));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn delete_user_sends_api_key() {
        let url = spawn_fake_proxy().await;
        let client = ProxyClient::new(&url, Some("secret".to_string())).unwrap();
        let resp = client.delete_user("user-1").await.unwrap();
        assert_eq!(resp.message, "User deleted successfully");
        assert_eq!(resp.failed_steps.len(), 1);
        assert_eq!(resp.failed_steps[0].table, "chats");
    }

    #[tokio::test]
    async fn delete_user_without_key_is_forbidden() {
        let url = spawn_fake_proxy().await;
        let client = ProxyClient::new(&url, None).unwrap();
        let err = client.delete_user("user-1").await.unwrap_err();
        assert!(matches!(err, SwapShareError::Remote { status: 403, .. }));
    }

    #[tokio::test]
    async fn auth_user_unwraps_envelope() {
        let url = spawn_fake_proxy().await;
        let client = ProxyClient::new(&url, None).unwrap();
        let user = client.auth_user("token").await.unwrap();
        assert_eq!(user.id, "user-1");
    }

    #[tokio::test]
    async fn magic_link_failure_is_reported() {
        let url = spawn_fake_proxy().await;
        let client = ProxyClient::new(&url, None).unwrap();
        assert!(client.request_magic_link("a@b.c", None).await.is_err());
    }
}
