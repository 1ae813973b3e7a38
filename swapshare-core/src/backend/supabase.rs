//! HTTP client for the Supabase auth and REST APIs.

use crate::backend::{AccountBackend, SupabaseConfig};
use crate::models::{AuthUser, SwapRequest};
use crate::{Result, SwapShareError};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, Url};
use std::time::Duration;

const SWAP_COLUMNS: &str = "id,Notification,receiver_id,requester_id";

/// reqwest-backed [`AccountBackend`] talking to a Supabase project.
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    service_role_key: String,
    access_token: Option<String>,
}

impl SupabaseClient {
    /// Create a new client from project settings.
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_role_key: config.service_role_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- Internal helpers ---

    fn url(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| SwapShareError::Config(format!("Invalid Supabase URL: {}", e)))
    }

    /// Headers for privileged calls made with the service-role key.
    fn with_service_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_role_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.service_role_key),
            )
            .header("Content-Type", "application/json")
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

/// PostgREST `or` filter matching rows where the user is either party. The
/// id is double-quoted so reserved characters stay part of the value.
fn participant_filter(user_id: &str) -> String {
    let quoted = format!("\"{}\"", user_id.replace('\\', "\\\\").replace('"', "\\\""));
    format!("(receiver_id.eq.{0},requester_id.eq.{0})", quoted)
}

#[async_trait]
impl AccountBackend for SupabaseClient {
    async fn fetch_user(&self, access_token: &str) -> Result<AuthUser> {
        let url = self.url("/auth/v1/user")?;
        let resp = self
            .client
            .get(url)
            .header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await?;

        let user = Self::check(resp).await?.json::<AuthUser>().await?;
        Ok(user)
    }

    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<()> {
        let mut url = self.url("/auth/v1/otp")?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);

        let body = serde_json::json!({
            "email": email,
            "create_user": true,
        });
        let resp = self
            .client
            .post(url)
            .header("apikey", &self.service_role_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn delete_rows(&self, table: &str, column: &str, user_id: &str) -> Result<()> {
        let mut url = self.url("/rest/v1")?;
        url.path_segments_mut()
            .map_err(|_| SwapShareError::Config("Supabase URL cannot be a base".to_string()))?
            .push(table);
        url.query_pairs_mut()
            .append_pair(column, &format!("eq.{}", user_id));

        let resp = self
            .with_service_auth(self.client.delete(url))
            .send()
            .await?;

        let status = Self::check(resp).await?.status();
        tracing::debug!("Deleted from {} where {}={}: {}", table, column, user_id, status);
        Ok(())
    }

    async fn delete_auth_user(&self, user_id: &str) -> Result<()> {
        let mut url = self.url("/auth/v1/admin/users")?;
        url.path_segments_mut()
            .map_err(|_| SwapShareError::Config("Supabase URL cannot be a base".to_string()))?
            .push(user_id);

        let resp = self
            .with_service_auth(self.client.delete(url))
            .send()
            .await?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn swap_notifications(&self, user_id: &str) -> Result<Vec<SwapRequest>> {
        let mut url = self.url("/rest/v1/swap_requests")?;
        url.query_pairs_mut()
            .append_pair("select", SWAP_COLUMNS)
            .append_pair("Notification", "eq.true")
            .append_pair("or", &participant_filter(user_id));

        let bearer = self
            .access_token
            .as_deref()
            .unwrap_or(&self.service_role_key);
        let resp = self
            .client
            .get(url)
            .header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", bearer))
            .send()
            .await?;

        let rows = Self::check(resp).await?.json::<Vec<SwapRequest>>().await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, RawQuery, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn push(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    async fn fake_user(
        headers: HeaderMap,
    ) -> std::result::Result<Json<serde_json::Value>, StatusCode> {
        let bearer = headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if bearer != "Bearer good-token" {
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(Json(serde_json::json!({
            "id": "user-1",
            "email": "user@example.com",
            "aud": "authenticated"
        })))
    }

    async fn fake_otp(
        State(rec): State<Recorder>,
        RawQuery(query): RawQuery,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> StatusCode {
        assert_eq!(headers.get("apikey").unwrap(), "service-key");
        if headers.contains_key("Authorization") {
            return StatusCode::BAD_REQUEST;
        }
        rec.push(format!(
            "POST otp?{} {}",
            query.unwrap_or_default(),
            body["email"].as_str().unwrap_or_default()
        ));
        StatusCode::OK
    }

    async fn fake_delete_rows(
        State(rec): State<Recorder>,
        Path(table): Path<String>,
        RawQuery(query): RawQuery,
        headers: HeaderMap,
    ) -> StatusCode {
        assert_eq!(headers.get("apikey").unwrap(), "service-key");
        if table == "chats" {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        rec.push(format!("DELETE {}?{}", table, query.unwrap_or_default()));
        StatusCode::NO_CONTENT
    }

    async fn fake_select_swaps(
        State(rec): State<Recorder>,
        Path(table): Path<String>,
        RawQuery(query): RawQuery,
    ) -> Json<serde_json::Value> {
        rec.push(format!("GET {}?{}", table, query.unwrap_or_default()));
        Json(serde_json::json!([
            {"id": 1, "Notification": true, "requester_id": "user-1", "receiver_id": "user-2"},
            {"id": 2, "Notification": true, "requester_id": "user-3", "receiver_id": "user-1"}
        ]))
    }

    async fn fake_delete_auth_user(
        State(rec): State<Recorder>,
        Path(id): Path<String>,
    ) -> StatusCode {
        rec.push(format!("DELETE auth {}", id));
        StatusCode::OK
    }

    async fn spawn_fake_supabase() -> (SupabaseClient, Recorder) {
        let recorder = Recorder::default();
        let app = Router::new()
            .route("/auth/v1/user", get(fake_user))
            .route("/auth/v1/otp", post(fake_otp))
            .route("/auth/v1/admin/users/{id}", delete(fake_delete_auth_user))
            .route(
                "/rest/v1/{table}",
                get(fake_select_swaps).delete(fake_delete_rows),
            )
            .with_state(recorder.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = SupabaseConfig::new(&format!("http://{}/", addr), "service-key");
        (SupabaseClient::new(&config).unwrap(), recorder)
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = SupabaseConfig::new("https://project.supabase.co///", "key");
        let client = SupabaseClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://project.supabase.co");
    }

    #[test]
    fn empty_key_is_rejected() {
        let config = SupabaseConfig::new("https://project.supabase.co", "");
        assert!(SupabaseClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn fetch_user_with_valid_token() {
        let (client, _) = spawn_fake_supabase().await;
        let user = client.fetch_user("good-token").await.unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email.as_deref(), Some("user@example.com"));
    }

    #[tokio::test]
    async fn fetch_user_with_bad_token_is_remote_error() {
        let (client, _) = spawn_fake_supabase().await;
        let err = client.fetch_user("expired").await.unwrap_err();
        assert!(matches!(err, SwapShareError::Remote { status: 401, .. }));
    }

    #[tokio::test]
    async fn delete_rows_sends_eq_filter() {
        let (client, recorder) = spawn_fake_supabase().await;
        client
            .delete_rows("swap_requests", "requester_id", "user-1")
            .await
            .unwrap();
        assert_eq!(
            recorder.calls(),
            vec!["DELETE swap_requests?requester_id=eq.user-1".to_string()]
        );
    }

    #[tokio::test]
    async fn delete_rows_surfaces_server_failure() {
        let (client, _) = spawn_fake_supabase().await;
        let err = client
            .delete_rows("chats", "senderID", "user-1")
            .await
            .unwrap_err();
        assert!(matches!(err, SwapShareError::Remote { status: 500, .. }));
    }

    #[tokio::test]
    async fn delete_auth_user_targets_admin_endpoint() {
        let (client, recorder) = spawn_fake_supabase().await;
        client.delete_auth_user("user-1").await.unwrap();
        assert_eq!(recorder.calls(), vec!["DELETE auth user-1".to_string()]);
    }

    #[tokio::test]
    async fn magic_link_carries_redirect() {
        let (client, recorder) = spawn_fake_supabase().await;
        client
            .send_magic_link("user@example.com", "your-app://login-success")
            .await
            .unwrap();
        let calls = recorder.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("POST otp?redirect_to=your-app%3A%2F%2Flogin-success"));
        assert!(calls[0].ends_with("user@example.com"));
    }

    #[tokio::test]
    async fn swap_notifications_filters_by_user() {
        let (client, recorder) = spawn_fake_supabase().await;
        let rows = client.swap_notifications("user-1").await.unwrap();
        assert_eq!(rows.len(), 2);

        let calls = recorder.calls();
        assert!(calls[0].starts_with("GET swap_requests?select="));
        assert!(calls[0].contains("Notification=eq.true"));
        assert!(calls[0].contains("receiver_id.eq.%22user-1%22"));
    }

    #[test]
    fn participant_filter_quotes_the_id() {
        assert_eq!(
            participant_filter("user-1"),
            r#"(receiver_id.eq."user-1",requester_id.eq."user-1")"#
        );
        assert_eq!(
            participant_filter(r#"a,b)"c\"#),
            r#"(receiver_id.eq."a,b)\"c\\",requester_id.eq."a,b)\"c\\")"#
        );
    }
}
