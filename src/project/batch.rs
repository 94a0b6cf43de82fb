//! Project every staged document, one transaction per record.

use super::projector::{Projection, project_email};
use crate::{
    error::{ParseError, PipelineError, StorageError},
    models::{
        report::{ProjectionReport, RecordOutcome},
        staging::RawEmailDocument,
    },
    parse::parse_email,
    staging::StagingStore,
};
use futures::TryStreamExt;
use sqlx::SqlitePool;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

/// Parse and project everything in the staging store.
///
/// Documents are streamed from the staging store and up to `workers` records
/// are in flight at once. Records that fail to parse or that storage rejects
/// are counted and skipped; an unreachable store aborts the whole run.
pub async fn project_all<S>(
    store: &S,
    pool: &SqlitePool,
    workers: usize,
) -> Result<ProjectionReport, PipelineError>
where
    S: StagingStore + ?Sized,
{
    let workers = workers.max(1);
    info!("projecting staged documents with {} worker(s)", workers);

    let mut docs = store.find();
    let mut report = ProjectionReport::default();
    let mut tasks = JoinSet::new();
    while let Some(doc) = docs.try_next().await? {
        if tasks.len() >= workers {
            if let Some(res) = tasks.join_next().await {
                absorb(&mut report, res)?;
            }
        }
        let pool = pool.clone();
        tasks.spawn(async move { project_document(&pool, doc).await });
    }
    while let Some(res) = tasks.join_next().await {
        absorb(&mut report, res)?;
    }

    info!(
        "projection done: {} inserted, {} duplicates, {} missing sender, {} malformed, {} failed",
        report.inserted, report.duplicates, report.missing_sender, report.malformed, report.failed
    );
    Ok(report)
}

fn absorb(
    report: &mut ProjectionReport,
    res: Result<Result<RecordOutcome, StorageError>, JoinError>,
) -> Result<(), PipelineError> {
    let outcome = res??;
    report.record(&outcome);
    Ok(())
}

/// Parse one staged document and project it.
///
/// Only an unreachable store is returned as an error.
pub async fn project_document(
    pool: &SqlitePool,
    doc: RawEmailDocument,
) -> Result<RecordOutcome, StorageError> {
    let email = match parse_email(&doc.raw_content) {
        Ok(email) => email.with_file_path(doc.origin_file_path),
        Err(ParseError::MissingSender) => {
            warn!("skip {:?}: missing sender", doc.origin_file_path);
            return Ok(RecordOutcome::MissingSender);
        }
        Err(e) => {
            warn!("skip {:?}: {}", doc.origin_file_path, e);
            return Ok(RecordOutcome::Malformed(e.to_string()));
        }
    };

    match project_email(pool, &email).await {
        Ok(Projection::Inserted(email_id)) => {
            debug!("{} stored as email {}", email.message_id, email_id);
            Ok(RecordOutcome::Inserted)
        }
        Ok(Projection::DuplicateSkipped) => {
            debug!("duplicate {}", email.message_id);
            Ok(RecordOutcome::DuplicateSkipped)
        }
        Err(e) if e.is_unreachable() => {
            error!("store unreachable while projecting {}: {}", email.message_id, e);
            Err(e)
        }
        Err(e) => {
            error!("projecting {} rolled back: {}", email.message_id, e);
            Ok(RecordOutcome::Failed(e.to_string()))
        }
    }
}
