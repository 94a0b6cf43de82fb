//! Relational projection of parsed emails.

pub mod batch;
pub mod projector;

pub use batch::{project_all, project_document};
pub use projector::{Projection, project_email, write_email};
