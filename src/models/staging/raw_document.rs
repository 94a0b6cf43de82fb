//! Raw email documents held by the staging store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Unparsed message text plus the dataset path it was sampled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEmailDocument {
    pub raw_content: String,
    pub origin_file_path: String,
}

impl RawEmailDocument {
    pub fn new(raw_content: impl Into<String>, origin_file_path: impl Into<String>) -> Self {
        Self {
            raw_content: raw_content.into(),
            origin_file_path: origin_file_path.into(),
        }
    }
}

/// Row of the `staged_emails` table.
#[derive(Debug, FromRow)]
pub struct StagedEmail {
    pub id: Uuid,
    pub message: String,
    pub file_path: String,
    pub staged_at: DateTime<Utc>,
}

impl From<StagedEmail> for RawEmailDocument {
    fn from(s: StagedEmail) -> Self {
        RawEmailDocument {
            raw_content: s.message,
            origin_file_path: s.file_path,
        }
    }
}
