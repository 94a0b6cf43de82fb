//! One addressee of a projected email.

use crate::models::email::RecipientType;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct RecipientRow {
    pub id: i64,
    pub email_id: i64,
    pub recipient_type: RecipientType,
    pub recipient_email: String,
}
