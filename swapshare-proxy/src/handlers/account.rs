//! Account removal.

use crate::error::ProxyError;
use crate::server::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use swapshare_core::{delete_user_cascade, DeleteUserResponse};

#[derive(Default, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
}

/// `DELETE /delete-user`: remove the user's rows from every table, then the
/// auth record. Table failures are reported but do not fail the request;
/// a failed auth delete does. A missing or unreadable body counts as a
/// missing `userID`.
pub async fn delete_user(
    State(state): State<AppState>,
    payload: Result<Json<DeleteUserRequest>, JsonRejection>,
) -> Result<Json<DeleteUserResponse>, ProxyError> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!("Unreadable delete-user body: {}", rejection);
            DeleteUserRequest::default()
        }
    };

    let user_id = req
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Missing userID in request body");
            ProxyError::BadRequest("User ID is required".to_string())
        })?;

    let report = delete_user_cascade(state.backend.as_ref(), &user_id).await;

    if !report.auth_user_deleted() {
        return Err(ProxyError::Internal("Failed to delete user".to_string()));
    }

    let failed_steps: Vec<_> = report.failed_steps().into_iter().cloned().collect();
    if !failed_steps.is_empty() {
        tracing::warn!(
            "User {} deleted with {} failed table deletes",
            user_id,
            failed_steps.len()
        );
    }

    Ok(Json(DeleteUserResponse {
        message: "User deleted successfully".to_string(),
        failed_steps,
    }))
}
