//! Typed records used across layers.

pub mod email;
pub mod report;
pub mod row;
pub mod staging;
