//! Error types for parsing, storage, intake and orchestration.

use thiserror::Error;

/// Why a raw message could not become a `ParsedEmail`.
///
/// Every variant is scoped to a single record: the batch skips the record,
/// reports it and moves on.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Text could not be split into headers and body.
    #[error("malformed message: {0}")]
    Malformed(#[from] mailparse::MailParseError),

    /// `From` header absent or empty after normalisation.
    #[error("missing sender: From header absent or empty")]
    MissingSender,

    /// No `Message-ID`, so the record has no identity key.
    #[error("missing Message-ID header")]
    MissingMessageId,

    /// `Date` header present but not a valid RFC 2822 date.
    #[error("unparseable Date header: {0:?}")]
    InvalidDate(String),
}

/// Relational or staging store failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// True when the store itself is gone, as opposed to one statement failing.
    pub fn is_unreachable(&self) -> bool {
        let Self::Database(e) = self;
        matches!(
            e,
            sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::Configuration(_)
                | sqlx::Error::WorkerCrashed
        )
    }
}

/// Failure while acquiring or staging the raw sample.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("fetching sample: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("reading sample: {0}")]
    Io(#[from] std::io::Error),

    #[error("decoding sample csv: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for SampleError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(StorageError::Database(e))
    }
}

/// Environment variable present but unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Step-level failure surfaced to whoever schedules the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error("projection worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl From<sqlx::Error> for PipelineError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(StorageError::Database(e))
    }
}
