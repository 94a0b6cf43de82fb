//! Staging document store: contract and SQLite implementation.

use crate::{
    error::StorageError,
    models::staging::{RawEmailDocument, StagedEmail},
};
use async_trait::async_trait;
use chrono::Utc;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// Append-only, unordered collection of raw email documents.
#[async_trait]
pub trait StagingStore: Send + Sync {
    /// Document whose raw content equals `raw_content` exactly, if any.
    async fn find_one(&self, raw_content: &str) -> Result<Option<RawEmailDocument>, StorageError>;

    /// Append a document and return its identity.
    async fn insert_one(&self, doc: &RawEmailDocument) -> Result<Uuid, StorageError>;

    /// Every staged document, in no particular order, streamed once.
    fn find(&self) -> BoxStream<'_, Result<RawEmailDocument, StorageError>>;
}

/// Staging store kept in its own SQLite database.
#[derive(Clone)]
pub struct SqliteStagingStore {
    pool: SqlitePool,
}

impl SqliteStagingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `staged_emails` collection if absent.
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS staged_emails (
                id TEXT PRIMARY KEY,
                message TEXT NOT NULL,
                file_path TEXT NOT NULL,
                staged_at TEXT NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_staged_emails_message ON staged_emails(message)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl StagingStore for SqliteStagingStore {
    async fn find_one(&self, raw_content: &str) -> Result<Option<RawEmailDocument>, StorageError> {
        let row: Option<StagedEmail> = sqlx::query_as(
            "SELECT id, message, file_path, staged_at FROM staged_emails WHERE message = ? LIMIT 1",
        )
        .bind(raw_content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(RawEmailDocument::from))
    }

    async fn insert_one(&self, doc: &RawEmailDocument) -> Result<Uuid, StorageError> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO staged_emails (id, message, file_path, staged_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&doc.raw_content)
        .bind(&doc.origin_file_path)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        debug!("staged document {} from {:?}", id, doc.origin_file_path);
        Ok(id)
    }

    fn find(&self) -> BoxStream<'_, Result<RawEmailDocument, StorageError>> {
        sqlx::query_as::<_, StagedEmail>(
            "SELECT id, message, file_path, staged_at FROM staged_emails",
        )
        .fetch(&self.pool)
        .map_ok(RawEmailDocument::from)
        .map_err(StorageError::from)
        .boxed()
    }
}
