//! Database helpers: pools, relational schema and path handling.

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;

/// Relational schema produced by the projector.
///
/// Column names and types mirror the reporting database this pipeline feeds;
/// SQLite accepts the declared type names as-is.
const RELATIONAL_SCHEMA: [&str; 3] = [
    r#"CREATE TABLE IF NOT EXISTS emails (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        file_path VARCHAR(255),
        message_id VARCHAR(255) UNIQUE,
        date TIMESTAMPTZ,
        sender_email VARCHAR(255),
        subject TEXT,
        content TEXT,
        x_from TEXT,
        x_folder VARCHAR(255),
        x_origin VARCHAR(255),
        x_file_name VARCHAR(255),
        created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS recipients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email_id INT REFERENCES emails(id) ON DELETE CASCADE,
        recipient_type VARCHAR(10) CHECK (recipient_type IN ('To', 'Cc', 'Bcc')),
        recipient_email VARCHAR(255)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS email_metadata (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email_id INT REFERENCES emails(id) ON DELETE CASCADE,
        key VARCHAR(255),
        value TEXT
    )"#,
];

/// Open a pool for a sqlx SQLite URL, creating the file when needed.
///
/// sqlx enables `foreign_keys` on every SQLite connection, which the
/// cascading deletes rely on.
pub async fn connect(db_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let db_url = ensure_sqlite_path(db_url);
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect(&db_url)
        .await
}

/// Create the `emails`, `recipients` and `email_metadata` tables if absent.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for ddl in RELATIONAL_SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
    }
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipients_email ON recipients(email_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_email_metadata_email ON email_metadata(email_id)")
        .execute(pool)
        .await?;
    Ok(())
}

/// Ensure SQLite file and parent folder exist for a given sqlx URL.
pub fn ensure_sqlite_path(db_url: &str) -> String {
    if !db_url.starts_with("sqlite:") {
        return db_url.to_string();
    }
    let path_part = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    if path_part.starts_with(":memory:") {
        return db_url.to_string();
    }
    let (path_only, _) = match path_part.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_part, None),
    };
    if !path_only.is_empty() {
        let p = Path::new(path_only);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        let _ = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(p);
    }
    db_url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_urls_pass_through() {
        assert_eq!(ensure_sqlite_path("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(ensure_sqlite_path("sqlite://:memory:"), "sqlite://:memory:");
    }

    #[test]
    fn file_urls_create_parent_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("mail.db");
        let url = format!("sqlite://{}?mode=rwc", file.display());
        assert_eq!(ensure_sqlite_path(&url), url);
        assert!(file.exists());
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('emails', 'recipients', 'email_metadata') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(names, vec!["email_metadata", "emails", "recipients"]);
    }
}
