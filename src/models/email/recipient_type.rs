//! Recipient header kinds, stored verbatim in `recipients.recipient_type`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum RecipientType {
    To,
    Cc,
    Bcc,
}

impl RecipientType {
    pub const ALL: [RecipientType; 3] = [RecipientType::To, RecipientType::Cc, RecipientType::Bcc];
}
