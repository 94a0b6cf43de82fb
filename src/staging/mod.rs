//! Intake side: the staging document store and sample acquisition.

pub mod sample;
pub mod store;

pub use sample::{stage_documents, stage_sample};
pub use store::{SqliteStagingStore, StagingStore};
