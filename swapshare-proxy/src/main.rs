//! Swap & Share Account Proxy
//!
//! A thin HTTP service in front of the hosted Supabase project. It looks up
//! users behind session tokens, issues magic links, completes the email
//! sign-in redirect and removes accounts with all of their data. The
//! service-role key never leaves this process.

mod auth;
mod config;
mod error;
mod handlers;
mod server;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use swapshare_core::SupabaseClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swapshare-proxy", about = "Swap & Share account proxy server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "proxy.toml")]
    config: PathBuf,

    /// Listen address override
    #[arg(short, long)]
    listen: Option<String>,

    /// Supabase project URL override
    #[arg(long)]
    supabase_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut cfg = if cli.config.exists() {
        config::ProxyConfig::load(&cli.config)?
    } else {
        tracing::info!("No config file found, using defaults");
        config::ProxyConfig::default()
    };
    cfg.apply_env();

    if let Some(listen) = cli.listen {
        cfg.listen_addr = listen;
    }
    if let Some(url) = cli.supabase_url {
        cfg.supabase_url = url;
    }

    tracing::info!("Supabase URL: {}", cfg.supabase_url);
    tracing::info!("Service role key set: {}", !cfg.service_role_key.is_empty());
    tracing::info!("API key set: {}", cfg.api_key.is_some());
    if cfg.api_key.is_none() {
        tracing::warn!("No API key configured, gated routes will reject every request");
    }
    cfg.validate()?;

    let backend = SupabaseClient::new(&cfg.supabase_config())?;
    let state = server::AppState::new(Arc::new(backend), &cfg);
    let app = server::build_router(state, &cfg);

    tracing::info!("Starting Swap & Share proxy on {}", cfg.listen_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
