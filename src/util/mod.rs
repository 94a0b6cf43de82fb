//! Utility functions: tracing, address normalisation, mail parsing.

use mailparse::ParsedMail;
use std::collections::BTreeMap;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize pretty CLI logging.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  // A second init (tests, embedding) keeps the first subscriber.
  let _ = fmt()
    .with_env_filter(filter)
    .with_target(false)
    .pretty()
    .try_init();
}

/// Split a comma-separated address header into unique trimmed addresses.
///
/// Absent or blank input yields an empty list. Duplicates collapse to their
/// first occurrence, so the first element is the first address written in the
/// header. No syntax validation happens here.
pub fn split_addresses(value: Option<&str>) -> Vec<String> {
  let Some(value) = value else {
    return Vec::new();
  };
  let mut out: Vec<String> = Vec::new();
  for piece in value.split(',') {
    let addr = piece.trim();
    if addr.is_empty() || out.iter().any(|a| a == addr) {
      continue;
    }
    out.push(addr.to_string());
  }
  out
}

/// Collect headers keyed by their exact name; a repeated name keeps the last value.
pub fn collect_headers(parsed: &ParsedMail<'_>) -> BTreeMap<String, String> {
  let mut map = BTreeMap::new();
  for h in &parsed.headers {
    map.insert(h.get_key(), h.get_value());
  }
  map
}

/// Every value of a header name, in document order.
pub fn collect_all(parsed: &ParsedMail<'_>, name: &str) -> Vec<String> {
  parsed
    .headers
    .iter()
    .filter(|h| h.get_key_ref().eq_ignore_ascii_case(name))
    .map(|h| h.get_value())
    .collect()
}

/// Concatenate every `text/plain` part of a MIME tree, in traversal order.
///
/// Parts are joined without a separator. HTML and attachment parts are skipped,
/// so a message without plain text yields an empty string.
pub fn extract_plain_text(parsed: &ParsedMail<'_>) -> String {
  let mut out = String::new();
  walk_plain_text(parsed, true, &mut out);
  out
}

fn walk_plain_text(part: &ParsedMail<'_>, is_root: bool, out: &mut String) {
  if part.subparts.is_empty() {
    if part.ctype.mimetype != "text/plain" {
      return;
    }
    let body = part.get_body().unwrap_or_default();
    if is_root {
      out.push_str(&body);
    } else {
      // The line break before a boundary delimiter belongs to the delimiter.
      out.push_str(strip_delimiter_newline(&body));
    }
  } else {
    for sub in &part.subparts {
      walk_plain_text(sub, false, out);
    }
  }
}

fn strip_delimiter_newline(body: &str) -> &str {
  body
    .strip_suffix("\r\n")
    .or_else(|| body.strip_suffix('\n'))
    .unwrap_or(body)
}
