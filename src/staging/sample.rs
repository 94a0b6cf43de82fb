//! Sample acquisition: pull the raw dataset, sample rows, stage them once.

use super::store::StagingStore;
use crate::{
    error::SampleError,
    models::{report::StageReport, staging::RawEmailDocument},
};
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{debug, info};

/// One row of the raw dataset CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleRow {
    pub file: String,
    pub message: String,
}

/// Fetch the dataset, sample `sample_size` rows and stage the new ones.
pub async fn stage_sample<S>(
    store: &S,
    source: &str,
    sample_size: usize,
) -> Result<StageReport, SampleError>
where
    S: StagingStore + ?Sized,
{
    let rows = load_rows(source).await?;
    info!("loaded {} dataset rows from {}", rows.len(), source);
    let docs: Vec<RawEmailDocument> = sample_rows(&rows, sample_size)
        .into_iter()
        .map(|r| RawEmailDocument::new(r.message, r.file))
        .collect();
    stage_documents(store, docs).await
}

/// Insert each document unless one with identical raw content is already staged.
pub async fn stage_documents<S>(
    store: &S,
    docs: Vec<RawEmailDocument>,
) -> Result<StageReport, SampleError>
where
    S: StagingStore + ?Sized,
{
    let mut report = StageReport {
        sampled: docs.len(),
        ..StageReport::default()
    };
    for doc in docs {
        if store.find_one(&doc.raw_content).await?.is_some() {
            debug!("already staged: {:?}", doc.origin_file_path);
            report.duplicates += 1;
            continue;
        }
        store.insert_one(&doc).await?;
        report.inserted += 1;
    }
    info!(
        "staged {} new documents ({} already present)",
        report.inserted, report.duplicates
    );
    Ok(report)
}

/// Read dataset rows from an `http(s)://` URL or a local path.
pub async fn load_rows(source: &str) -> Result<Vec<SampleRow>, SampleError> {
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        reqwest::get(source).await?.error_for_status()?.text().await?
    } else {
        tokio::fs::read_to_string(source).await?
    };
    parse_rows(&text)
}

/// Decode the `file,message` CSV; extra columns are ignored.
pub fn parse_rows(text: &str) -> Result<Vec<SampleRow>, SampleError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Random sample without replacement; everything when `amount` exceeds the row count.
pub fn sample_rows(rows: &[SampleRow], amount: usize) -> Vec<SampleRow> {
    let mut rng = rand::thread_rng();
    rows.choose_multiple(&mut rng, amount).cloned().collect()
}
