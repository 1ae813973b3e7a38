//! New-swap notification badge.

use crate::backend::AccountBackend;
use crate::models::SwapRequest;
use crate::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Count requests with an unread notification where `user_id` is either side.
pub fn count_new_swaps(requests: &[SwapRequest], user_id: &str) -> usize {
    requests
        .iter()
        .filter(|r| r.notification && r.involves(user_id))
        .count()
}

/// Run the filtered query once and count the matching rows.
pub async fn fetch_new_swap_count(backend: &dyn AccountBackend, user_id: &str) -> Result<usize> {
    let rows = backend.swap_notifications(user_id).await?;
    let count = count_new_swaps(&rows, user_id);
    tracing::debug!("Fetched {} swap rows, {} new for {}", rows.len(), count, user_id);
    Ok(count)
}

/// Latest badge count, shared with whatever displays it.
#[derive(Debug, Clone, Default)]
pub struct SwapBadge {
    count: Arc<AtomicUsize>,
}

impl SwapBadge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Fetch the count for the current user and store it.
    ///
    /// Without a user nothing is fetched. A failed fetch is logged and the
    /// previous count is kept. Returns the count now shown.
    pub async fn refresh(&self, backend: &dyn AccountBackend, user_id: Option<&str>) -> usize {
        let Some(user_id) = user_id.filter(|id| !id.is_empty()) else {
            tracing::warn!("User ID not available, skipping swap fetch");
            return self.count();
        };

        match fetch_new_swap_count(backend, user_id).await {
            Ok(count) => {
                self.count.store(count, Ordering::Relaxed);
                count
            }
            Err(e) => {
                tracing::error!("Error fetching swap notifications: {}", e);
                self.count()
            }
        }
    }
}
