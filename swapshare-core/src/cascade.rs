//! Account deletion cascade.
//!
//! Removes a user's rows from every table that references them and then
//! deletes the user from the auth service. Steps run one after another;
//! a failed table delete is logged and skipped, and nothing is rolled back.

use crate::backend::AccountBackend;
use serde::{Deserialize, Serialize};

/// Tables holding user data, with the columns that reference the user.
/// `users` comes last so referencing rows are gone first.
pub const USER_DATA_TABLES: [(&str, &[&str]); 5] = [
    ("swap_requests", &["requester_id", "receiver_id"]),
    ("chats", &["senderID", "receiverID"]),
    ("Reviews", &["UserID"]),
    ("item", &["userID"]),
    ("users", &["UserID"]),
];

/// Outcome of a single table delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeStep {
    pub table: String,
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CascadeStep {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything that happened while deleting one user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CascadeReport {
    pub user_id: String,
    pub steps: Vec<CascadeStep>,
    /// Error from the final auth-service delete, if it failed.
    pub auth_error: Option<String>,
}

impl CascadeReport {
    pub fn auth_user_deleted(&self) -> bool {
        self.auth_error.is_none()
    }

    pub fn failed_steps(&self) -> Vec<&CascadeStep> {
        self.steps.iter().filter(|s| !s.succeeded()).collect()
    }

    /// True when every table delete and the auth delete succeeded.
    pub fn is_complete(&self) -> bool {
        self.auth_user_deleted() && self.steps.iter().all(CascadeStep::succeeded)
    }
}

/// Delete every trace of `user_id`, one request per (table, column) pair.
pub async fn delete_user_cascade(backend: &dyn AccountBackend, user_id: &str) -> CascadeReport {
    tracing::info!("Deleting user data for {}", user_id);

    let mut report = CascadeReport {
        user_id: user_id.to_string(),
        ..Default::default()
    };

    for (table, columns) in USER_DATA_TABLES {
        for column in columns {
            let error = match backend.delete_rows(table, column, user_id).await {
                Ok(()) => {
                    tracing::info!("Deleted from {} where {}={}", table, column, user_id);
                    None
                }
                Err(e) => {
                    tracing::error!("Error deleting from {} (column {}): {}", table, column, e);
                    Some(e.to_string())
                }
            };
            report.steps.push(CascadeStep {
                table: table.to_string(),
                column: column.to_string(),
                error,
            });
        }
    }

    match backend.delete_auth_user(user_id).await {
        Ok(()) => tracing::info!("User {} deleted from auth", user_id),
        Err(e) => {
            tracing::error!("Error deleting {} from auth: {}", user_id, e);
            report.auth_error = Some(e.to_string());
        }
    }

    report
}
