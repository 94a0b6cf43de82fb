//! mailstage library entrypoint.
//!
//! Modules:
//! - `app`: configuration, store handles, step orchestration
//! - `staging`: raw document store and sample intake
//! - `parse`: raw message text to structured record
//! - `project`: relational projection with per-record transactions
//! - `db`: pools and the relational schema
//! - `models`: typed records used across layers
//! - `util`: tracing, address normalisation, MIME helpers
//! - `error`: error types

pub mod app;
pub mod db;
pub mod error;
pub mod models;
pub mod parse;
pub mod project;
pub mod staging;
pub mod util;
