//! Swap & Share Core Library
//!
//! This library provides the shared pieces of the Swap & Share backend:
//! the data model, the Supabase REST client, the account deletion cascade,
//! the swap notification badge and the local item store.

pub mod backend;
pub mod cascade;
pub mod database;
pub mod models;
pub mod platform;
pub mod proxy_client;
pub mod swaps;

pub use backend::{AccountBackend, SupabaseClient, SupabaseConfig};
pub use cascade::{delete_user_cascade, CascadeReport, CascadeStep, USER_DATA_TABLES};
pub use database::ItemStore;
pub use models::{AuthUser, Item, SwapRequest, CATEGORIES};
pub use platform::{ensure_data_dir, get_data_dir, get_default_store_path};
pub use proxy_client::{DeleteUserResponse, ProxyClient, API_KEY_HEADER};
pub use swaps::{count_new_swaps, fetch_new_swap_count, SwapBadge};

use thiserror::Error;

/// Result type for Swap & Share operations
pub type Result<T> = std::result::Result<T, SwapShareError>;

/// General error type for Swap & Share operations
#[derive(Error, Debug)]
pub enum SwapShareError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote error {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
