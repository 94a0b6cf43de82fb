//! Structured form of one raw message, derived on every projection pass.

use super::RecipientType;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Header names pulled out of the metadata map into dedicated `emails` columns.
pub const X_FROM: &str = "X-From";
pub const X_FOLDER: &str = "X-Folder";
pub const X_ORIGIN: &str = "X-Origin";
pub const X_FILE_NAME: &str = "X-FileName";

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEmail {
    /// Identity key for relational dedup.
    pub message_id: String,
    pub date: Option<DateTime<Utc>>,
    /// First address of the `From` header.
    pub sender_email: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: Option<String>,
    /// Every `text/plain` part, concatenated in document order.
    pub content: String,
    /// All headers by exact name; a repeated name keeps its last value.
    pub headers: BTreeMap<String, String>,
    /// Every `Received` value in document order.
    pub received: Vec<String>,
    /// Origin path from the staging document; empty until injected.
    pub file_path: String,
}

impl ParsedEmail {
    /// Attach the origin path carried by the staging document.
    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = file_path.into();
        self
    }

    /// Exact-name header lookup in the metadata map.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn addresses(&self, kind: RecipientType) -> &[String] {
        match kind {
            RecipientType::To => &self.to,
            RecipientType::Cc => &self.cc,
            RecipientType::Bcc => &self.bcc,
        }
    }

    /// Metadata entries as they are written to `email_metadata`.
    ///
    /// `Received` expands to one entry per occurrence, under the first spelling
    /// of the name; other spellings are skipped. Every other name yields its
    /// single last-seen value.
    pub fn metadata_entries(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::with_capacity(self.headers.len() + self.received.len());
        let mut received_done = false;
        for (key, value) in &self.headers {
            if key.eq_ignore_ascii_case("Received") && !self.received.is_empty() {
                if !received_done {
                    out.extend(self.received.iter().map(|v| (key.as_str(), v.as_str())));
                    received_done = true;
                }
            } else {
                out.push((key.as_str(), value.as_str()));
            }
        }
        out
    }
}
