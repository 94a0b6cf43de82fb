//! Database row for a projected email.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct EmailRow {
    pub id: i64,
    pub file_path: Option<String>,
    pub message_id: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub sender_email: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub x_from: Option<String>,
    pub x_folder: Option<String>,
    pub x_origin: Option<String>,
    pub x_file_name: Option<String>,
    pub created_at: NaiveDateTime,
}
