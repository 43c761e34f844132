//! Write-and-forget persistence for accepted leads.
//!
//! The service only ever puts records; reading them back happens out of band
//! (an operator inspecting the database), so the trait exposes nothing else.

use async_trait::async_trait;
use intake_contact::LeadRecord;
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The "durable key-value put" seam of the submission pipeline.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn put(&self, record: &LeadRecord) -> Result<(), StoreError>;
}

/// Durable adapter backed by SQLite. Records are stored as JSON blobs under
/// their `lead:<ULID>` key; a colliding key overwrites, matching the
/// key-value namespace this replaces.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for SqliteStore {
    #[tracing::instrument(skip_all, fields(lead = %record.id))]
    async fn put(&self, record: &LeadRecord) -> Result<(), StoreError> {
        let value = serde_json::to_string(record)?;

        sqlx::query("INSERT OR REPLACE INTO leads (key, value, created_at) VALUES (?, ?, ?)")
            .bind(&record.id)
            .bind(value)
            .bind(&record.submitted_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!("lead persisted");
        Ok(())
    }
}

/// Adapter for deployments with no database binding: the write is logged and
/// reported as a success, keeping persistence an explicit placeholder rather
/// than a hard requirement.
#[derive(Debug, Clone, Default)]
pub struct NoopStore;

#[async_trait]
impl SubmissionStore for NoopStore {
    async fn put(&self, record: &LeadRecord) -> Result<(), StoreError> {
        tracing::debug!(lead = %record.id, email = %record.email, "no store configured, dropping lead record");
        Ok(())
    }
}
