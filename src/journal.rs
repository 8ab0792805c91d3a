use std::sync::Arc;

use crate::aggregate;
use crate::models::{LocationCluster, UserStats};
use crate::store::{PhotoStore, ProfileStore, StoreError};

// ── Journal facade ─────────────────────────────────────────────────────────

/// Front door for the aggregation views over a user's photo collection.
///
/// Every read works on the same capped working set: the user's most recent
/// photos up to `fetch_limit`, fetched through the photo store. Statistics
/// are recomputed from that set on demand and persisted opportunistically;
/// a failed persistence write is logged and never surfaces to the caller.
#[derive(Clone)]
pub struct Journal {
    photos: Arc<dyn PhotoStore>,
    profiles: Arc<dyn ProfileStore>,
    fetch_limit: u32,
}

impl Journal {
    pub fn new(
        photos: Arc<dyn PhotoStore>,
        profiles: Arc<dyn ProfileStore>,
        fetch_limit: u32,
    ) -> Self {
        Self {
            photos,
            profiles,
            fetch_limit,
        }
    }

    /// Cluster the user's recent photos into map pins.
    pub async fn map_pins(&self, user_id: i64) -> Result<Vec<LocationCluster>, StoreError> {
        let photos = self.photos.fetch_recent(user_id, self.fetch_limit).await?;
        Ok(aggregate::cluster_photos(&photos))
    }

    /// Recompute the user's statistics and return them, persisting the fresh
    /// figures in the background.
    pub async fn user_stats(&self, user_id: i64) -> Result<UserStats, StoreError> {
        let photos = self.photos.fetch_recent(user_id, self.fetch_limit).await?;
        let stats = aggregate::compute_stats(&photos);

        let profiles = Arc::clone(&self.profiles);
        let persisted = stats.clone();
        tokio::spawn(async move {
            if let Err(e) = profiles.write_stats(user_id, &persisted).await {
                tracing::error!("Failed to persist stats for user {}: {}", user_id, e);
            }
        });

        Ok(stats)
    }

    /// Recompute and persist the user's statistics entirely in the
    /// background. Used after collection changes where the caller does not
    /// need the figures.
    pub fn refresh_stats(&self, user_id: i64) {
        let photos = Arc::clone(&self.photos);
        let profiles = Arc::clone(&self.profiles);
        let limit = self.fetch_limit;

        tokio::spawn(async move {
            let stats = match photos.fetch_recent(user_id, limit).await {
                Ok(set) => aggregate::compute_stats(&set),
                Err(e) => {
                    tracing::warn!("Skipping stats refresh for user {}: {}", user_id, e);
                    return;
                }
            };

            if let Err(e) = profiles.write_stats(user_id, &stats).await {
                tracing::error!("Failed to persist stats for user {}: {}", user_id, e);
            }
        });
    }
}
