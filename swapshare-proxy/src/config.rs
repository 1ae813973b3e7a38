//! Proxy server configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use swapshare_core::SupabaseConfig;

pub use swapshare_core::backend::{ENV_SERVICE_ROLE, ENV_SUPABASE_URL};

pub const ENV_API_KEY: &str = "SECRET_API_KEY";
pub const ENV_PORT: &str = "PORT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub listen_addr: String,
    pub supabase_url: String,
    #[serde(skip_serializing)]
    pub service_role_key: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Where `/login-success` sends the app once the token checks out.
    pub login_redirect_url: String,
    pub max_payload_size: usize,
    pub request_timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            supabase_url: String::new(),
            service_role_key: String::new(),
            api_key: None,
            login_redirect_url: "your-app://login-success".to_string(),
            max_payload_size: 65_536,
            request_timeout_secs: 30,
        }
    }
}

impl ProxyConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml_dep::from_str(&content)?;
        Ok(config)
    }

    /// Override settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SUPABASE_URL) {
            self.supabase_url = url;
        }
        if let Some(key) = lookup(ENV_SERVICE_ROLE) {
            self.service_role_key = key;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.set_port(&port);
        }
    }

    /// Replace the port of `listen_addr`, keeping the host.
    pub fn set_port(&mut self, port: &str) {
        if port.parse::<u16>().is_err() {
            tracing::warn!("Ignoring invalid port {:?}", port);
            return;
        }
        let host = self
            .listen_addr
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        self.listen_addr = format!("{}:{}", host, port);
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.supabase_url.trim().is_empty() {
            anyhow::bail!("{} is not set", ENV_SUPABASE_URL);
        }
        if self.service_role_key.trim().is_empty() {
            anyhow::bail!("{} is not set", ENV_SERVICE_ROLE);
        }
        Ok(())
    }

    pub fn supabase_config(&self) -> SupabaseConfig {
        let mut config = SupabaseConfig::new(&self.supabase_url, &self.service_role_key);
        config.timeout_secs = self.request_timeout_secs;
        config
    }
}
