//! Per-step summaries handed back to the orchestrator.

use serde::Serialize;

/// Result of one staging run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub sampled: usize,
    pub inserted: usize,
    pub duplicates: usize,
}

/// What happened to a single staged document during projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted,
    /// `message_id` already projected; not an error.
    DuplicateSkipped,
    MissingSender,
    Malformed(String),
    /// Storage rejected the record; its transaction was rolled back.
    Failed(String),
}

/// Result of one projection run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionReport {
    pub inserted: usize,
    pub duplicates: usize,
    pub missing_sender: usize,
    pub malformed: usize,
    pub failed: usize,
}

impl ProjectionReport {
    pub fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Inserted => self.inserted += 1,
            RecordOutcome::DuplicateSkipped => self.duplicates += 1,
            RecordOutcome::MissingSender => self.missing_sender += 1,
            RecordOutcome::Malformed(_) => self.malformed += 1,
            RecordOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.inserted + self.duplicates + self.missing_sender + self.malformed + self.failed
    }
}

/// Summary of a full `run`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub staged: Option<StageReport>,
    pub projected: Option<ProjectionReport>,
}
