//! Header entry of a projected email.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct MetadataRow {
    pub id: i64,
    pub email_id: i64,
    pub key: String,
    pub value: Option<String>,
}
