//! Materialise one `ParsedEmail` into `emails`, `recipients` and `email_metadata`.

use crate::{
    error::StorageError,
    models::email::{
        ParsedEmail, RecipientType,
        parsed_email::{X_FILE_NAME, X_FOLDER, X_FROM, X_ORIGIN},
    },
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

/// Result of projecting one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Inserted(i64),
    /// `message_id` already present; nothing written.
    DuplicateSkipped,
}

/// Project `email` inside its own transaction.
///
/// Either every row for the record is committed or none is: any failing insert
/// drops the transaction, which rolls it back.
pub async fn project_email(
    pool: &SqlitePool,
    email: &ParsedEmail,
) -> Result<Projection, StorageError> {
    let mut tx = pool.begin().await?;
    let outcome = write_email(&mut *tx, email).await?;
    match outcome {
        Projection::Inserted(_) => tx.commit().await?,
        Projection::DuplicateSkipped => tx.rollback().await?,
    }
    Ok(outcome)
}

/// Write `email` through an open connection or transaction.
///
/// The `emails` insert is the dedup gate: `UNIQUE(message_id)` turns an
/// already-projected id into a no-op, and then nothing else is written. Doing
/// the lookup and the insert in one statement keeps concurrent workers from
/// racing between them.
pub async fn write_email(
    conn: &mut SqliteConnection,
    email: &ParsedEmail,
) -> Result<Projection, StorageError> {
    let res = sqlx::query(
        "INSERT INTO emails (file_path, message_id, date, sender_email, subject, content, x_from, x_folder, x_origin, x_file_name) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) ON CONFLICT(message_id) DO NOTHING",
    )
    .bind(&email.file_path)
    .bind(&email.message_id)
    .bind(email.date)
    .bind(&email.sender_email)
    .bind(&email.subject)
    .bind(&email.content)
    .bind(email.header(X_FROM))
    .bind(email.header(X_FOLDER))
    .bind(email.header(X_ORIGIN))
    .bind(email.header(X_FILE_NAME))
    .execute(&mut *conn)
    .await?;
    if res.rows_affected() == 0 {
        debug!("skip {}: already projected", email.message_id);
        return Ok(Projection::DuplicateSkipped);
    }
    let email_id = res.last_insert_rowid();

    for kind in RecipientType::ALL {
        for addr in email.addresses(kind) {
            sqlx::query(
                "INSERT INTO recipients (email_id, recipient_type, recipient_email) VALUES (?, ?, ?)",
            )
            .bind(email_id)
            .bind(kind)
            .bind(addr.trim())
            .execute(&mut *conn)
            .await?;
        }
    }

    for (key, value) in email.metadata_entries() {
        sqlx::query("INSERT INTO email_metadata (email_id, key, value) VALUES (?, ?, ?)")
            .bind(email_id)
            .bind(key)
            .bind(value)
            .execute(&mut *conn)
            .await?;
    }

    debug!("projected {} as email {}", email.message_id, email_id);
    Ok(Projection::Inserted(email_id))
}
