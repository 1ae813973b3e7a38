//! Seam between Swap & Share and the hosted Supabase platform.
//!
//! Every identity and persistence operation is delegated to Supabase. The
//! [`AccountBackend`] trait names the handful of calls the backend makes so
//! that the proxy routes and the badge logic can run against a fake.

pub mod supabase;

pub use supabase::SupabaseClient;

use crate::models::{AuthUser, SwapRequest};
use crate::{Result, SwapShareError};
use async_trait::async_trait;

/// Environment variable holding the project base URL.
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
/// Environment variable holding the service-role key.
pub const ENV_SERVICE_ROLE: &str = "SUPABASE_SERVICE_ROLE";

/// Calls made against the backend-as-a-service platform.
#[async_trait]
pub trait AccountBackend: Send + Sync {
    /// Resolve the user that owns `access_token`.
    async fn fetch_user(&self, access_token: &str) -> Result<AuthUser>;

    /// Ask the auth service to email a passwordless sign-in link.
    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<()>;

    /// Delete every row of `table` whose `column` equals `user_id`.
    async fn delete_rows(&self, table: &str, column: &str, user_id: &str) -> Result<()>;

    /// Remove the user from the auth service.
    async fn delete_auth_user(&self, user_id: &str) -> Result<()>;

    /// Swap requests with an unread notification involving `user_id`.
    async fn swap_notifications(&self, user_id: &str) -> Result<Vec<SwapRequest>>;
}

/// Connection settings for a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_role_key: String,
    /// Session token of the signed-in user, used for row-level reads.
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl SupabaseConfig {
    pub fn new(url: &str, service_role_key: &str) -> Self {
        Self {
            url: url.to_string(),
            service_role_key: service_role_key.to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }

    /// Read `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE` from the environment.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(ENV_SUPABASE_URL)
            .map_err(|_| SwapShareError::Config(format!("{} is not set", ENV_SUPABASE_URL)))?;
        let key = std::env::var(ENV_SERVICE_ROLE)
            .map_err(|_| SwapShareError::Config(format!("{} is not set", ENV_SERVICE_ROLE)))?;
        let config = Self::new(&url, &key);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(SwapShareError::Config("Supabase URL is empty".to_string()));
        }
        if self.service_role_key.trim().is_empty() {
            return Err(SwapShareError::Config(
                "Supabase service role key is empty".to_string(),
            ));
        }
        Ok(())
    }
}
