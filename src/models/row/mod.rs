pub mod email_row;
pub mod metadata_row;
pub mod recipient_row;

pub use email_row::EmailRow;
pub use metadata_row::MetadataRow;
pub use recipient_row::RecipientRow;
