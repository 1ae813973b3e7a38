//! Data model shared by the proxy, the CLI and the local store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Browse categories offered when listing an item.
pub const CATEGORIES: [&str; 12] = [
    "Books",
    "Clothes",
    "Furniture",
    "Home Appliances",
    "Electronics",
    "Sports",
    "Miscellaneous",
    "Home Goods",
    "Vehicles & Parts",
    "Bicycles",
    "Beauty",
    "Tools",
];

/// A user record as returned by the Supabase auth service.
///
/// Only the fields the backend reads are typed; everything else is kept
/// in `extra` so the record can be passed back to clients unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sign_in_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A row of the remote `swap_requests` table, read for badge display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: i64,
    #[serde(rename = "Notification")]
    pub notification: bool,
    pub requester_id: String,
    pub receiver_id: String,
}

impl SwapRequest {
    /// Whether the given user is either side of this request.
    pub fn involves(&self, user_id: &str) -> bool {
        self.requester_id == user_id || self.receiver_id == user_id
    }
}

/// A locally persisted item used for offline previews and mock data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: Option<i64>,
    pub name: String,
    pub category: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl Item {
    /// Create an unsaved item stamped with the current time.
    pub fn new(name: &str, category: &str, description: &str) -> Self {
        Self {
            item_id: None,
            name: name.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            timestamp: Utc::now(),
        }
    }
}
