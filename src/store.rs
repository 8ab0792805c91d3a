use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db;
use crate::models::{PhotoRecord, UserStats};

// ── Errors ─────────────────────────────────────────────────────────────────

/// Failures surfaced by the photo and profile stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or the query itself failed.
    #[error("store unavailable: {0}")]
    Connection(String),
    /// The backend rejected the caller's credentials.
    #[error("store rejected credentials: {0}")]
    Auth(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Connection(err.to_string())
    }
}

// ── Store traits ───────────────────────────────────────────────────────────

/// Read access to a user's photo collection.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Fetch up to `limit` of the user's most recent photos, newest first.
    async fn fetch_recent(&self, user_id: i64, limit: u32)
        -> Result<Vec<PhotoRecord>, StoreError>;
}

/// Write access to a user's persisted profile statistics.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn write_stats(&self, user_id: i64, stats: &UserStats) -> Result<(), StoreError>;
}

// ── SQLite implementation ──────────────────────────────────────────────────

/// Store implementation backed by the application's SQLite pool.
#[derive(Clone)]
pub struct SqliteJournalStore {
    pool: SqlitePool,
}

impl SqliteJournalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoStore for SqliteJournalStore {
    async fn fetch_recent(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<PhotoRecord>, StoreError> {
        let photos = db::photos_for_user(&self.pool, user_id, None, None, limit).await?;
        Ok(photos)
    }
}

#[async_trait]
impl ProfileStore for SqliteJournalStore {
    async fn write_stats(&self, user_id: i64, stats: &UserStats) -> Result<(), StoreError> {
        db::write_user_stats(&self.pool, user_id, stats).await?;
        Ok(())
    }
}
