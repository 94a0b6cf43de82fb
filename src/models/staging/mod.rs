pub mod raw_document;

pub use raw_document::{RawEmailDocument, StagedEmail};
