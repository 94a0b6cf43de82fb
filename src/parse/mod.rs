//! Raw message text to `ParsedEmail`.

use crate::{
    error::ParseError,
    models::email::ParsedEmail,
    util::{collect_all, collect_headers, extract_plain_text, split_addresses},
};
use chrono::{DateTime, Datelike, Utc};
use mailparse::{MailHeaderMap, parse_mail};

/// Parse one raw email.
///
/// `file_path` is left empty; the caller injects it from the staging document
/// with [`ParsedEmail::with_file_path`].
pub fn parse_email(raw: &str) -> Result<ParsedEmail, ParseError> {
    let parsed = parse_mail(raw.as_bytes())?;

    let content = extract_plain_text(&parsed);
    let headers = collect_headers(&parsed);
    let received = collect_all(&parsed, "Received");

    let from = split_addresses(parsed.headers.get_first_value("From").as_deref());
    let sender_email = from
        .into_iter()
        .next()
        .ok_or(ParseError::MissingSender)?;

    let message_id = parsed
        .headers
        .get_first_value("Message-ID")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ParseError::MissingMessageId)?;

    let date = parse_date(parsed.headers.get_first_value("Date"))?;

    Ok(ParsedEmail {
        message_id,
        date,
        sender_email,
        to: split_addresses(parsed.headers.get_first_value("To").as_deref()),
        cc: split_addresses(parsed.headers.get_first_value("Cc").as_deref()),
        bcc: split_addresses(parsed.headers.get_first_value("Bcc").as_deref()),
        subject: parsed.headers.get_first_value("Subject"),
        content,
        headers,
        received,
        file_path: String::new(),
    })
}

fn parse_date(value: Option<String>) -> Result<Option<DateTime<Utc>>, ParseError> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    match parse_rfc2822(&value) {
        Some(ts) => Ok(Some(ts)),
        None => Err(ParseError::InvalidDate(value)),
    }
}

/// Strict RFC 2822 first, then `mailparse`'s lenient parser.
///
/// `dateparse` yields `Ok(0)` for most garbage, so its answer only counts when
/// the resulting year is written as a four-digit token in the input.
fn parse_rfc2822(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = strip_zone_comment(value);
    if let Ok(ts) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(ts.with_timezone(&Utc));
    }
    let secs = mailparse::dateparse(trimmed).ok()?;
    let ts = DateTime::from_timestamp(secs, 0)?;
    let year = ts.year().to_string();
    let has_year = trimmed
        .split(|c: char| !c.is_ascii_digit())
        .any(|tok| tok.len() == 4 && tok == year);
    has_year.then_some(ts)
}

/// Drop a trailing `(PDT)`-style comment.
fn strip_zone_comment(value: &str) -> &str {
    let value = value.trim();
    match value.rfind('(') {
        Some(pos) if value.ends_with(')') => value[..pos].trim_end(),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ENRON: &str = concat!(
        "Message-ID: <18782981.1075855378110.JavaMail.evans@thyme>\r\n",
        "Date: Mon, 14 May 2001 16:39:00 -0700 (PDT)\r\n",
        "From: phillip.allen@enron.com\r\n",
        "To: tim.belden@enron.com\r\n",
        "Subject: \r\n",
        "Mime-Version: 1.0\r\n",
        "Content-Type: text/plain; charset=us-ascii\r\n",
        "Content-Transfer-Encoding: 7bit\r\n",
        "X-From: Phillip K Allen\r\n",
        "X-To: Tim Belden <Tim Belden/Enron@EnronXGate>\r\n",
        "X-Folder: \\Phillip_Allen_Jan2002_1\\Allen, Phillip K.\\'Sent Mail\r\n",
        "X-Origin: Allen-P\r\n",
        "X-FileName: pallen (Non-Privileged).pst\r\n",
        "\r\n",
        "Here is our forecast\r\n",
    );

    #[test]
    fn parses_enron_style_message() {
        let email = parse_email(ENRON).unwrap();
        assert_eq!(
            email.message_id,
            "<18782981.1075855378110.JavaMail.evans@thyme>"
        );
        assert_eq!(email.sender_email, "phillip.allen@enron.com");
        assert_eq!(email.to, vec!["tim.belden@enron.com".to_string()]);
        assert!(email.cc.is_empty());
        assert!(email.bcc.is_empty());
        assert_eq!(
            email.date,
            Some(Utc.with_ymd_and_hms(2001, 5, 14, 23, 39, 0).unwrap())
        );
        assert_eq!(email.content.trim_end(), "Here is our forecast");
        assert_eq!(email.header("X-Origin"), Some("Allen-P"));
        assert_eq!(email.header("X-FileName"), Some("pallen (Non-Privileged).pst"));
        assert_eq!(email.file_path, "");
    }

    #[test]
    fn repeated_header_keeps_last_value() {
        let raw = concat!(
            "Message-ID: <1@x>\r\n",
            "From: a@x.com\r\n",
            "Subject: first\r\n",
            "Subject: second\r\n",
            "\r\n",
            "body\r\n",
        );
        let email = parse_email(raw).unwrap();
        assert_eq!(email.header("Subject"), Some("second"));
        assert_eq!(
            email.headers.keys().filter(|k| k.as_str() == "Subject").count(),
            1
        );
    }

    #[test]
    fn plain_parts_concatenate_without_separator() {
        let raw = concat!(
            "Message-ID: <2@x>\r\n",
            "From: a@x.com\r\n",
            "Content-Type: multipart/mixed; boundary=BOUND\r\n",
            "\r\n",
            "--BOUND\r\n",
            "Content-Type: text/plain\r\n\r\n",
            "Hello \r\n",
            "--BOUND\r\n",
            "Content-Type: text/html\r\n\r\n",
            "<b>ignored</b>\r\n",
            "--BOUND\r\n",
            "Content-Type: text/plain\r\n\r\n",
            "World\r\n",
            "--BOUND--\r\n",
        );
        let email = parse_email(raw).unwrap();
        assert_eq!(email.content, "Hello World");
    }

    #[test]
    fn missing_from_is_missing_sender() {
        let raw = "Message-ID: <3@x>\r\nTo: b@y.com\r\n\r\nbody";
        assert!(matches!(parse_email(raw), Err(ParseError::MissingSender)));
    }

    #[test]
    fn blank_from_is_missing_sender() {
        let raw = "Message-ID: <3@x>\r\nFrom:  , \r\n\r\nbody";
        assert!(matches!(parse_email(raw), Err(ParseError::MissingSender)));
    }

    #[test]
    fn missing_message_id_is_rejected() {
        let raw = "From: a@x.com\r\n\r\nbody";
        assert!(matches!(
            parse_email(raw),
            Err(ParseError::MissingMessageId)
        ));
    }

    #[test]
    fn absent_date_and_subject_are_none() {
        let raw = "Message-ID: <4@x>\r\nFrom: a@x.com\r\n\r\nbody";
        let email = parse_email(raw).unwrap();
        assert_eq!(email.date, None);
        assert_eq!(email.subject, None);
    }

    #[test]
    fn date_forms_parse_to_utc() {
        let want = Some(Utc.with_ymd_and_hms(2001, 5, 14, 23, 39, 0).unwrap());
        assert_eq!(parse_rfc2822("Mon, 14 May 2001 16:39:00 -0700 (PDT)"), want);
        assert_eq!(parse_rfc2822("Mon, 14 May 2001 16:39:00 -0700"), want);
    }

    #[test]
    fn garbage_dates_never_become_the_epoch() {
        for bad in ["yesterday", "sometime soon", "banana", "(PDT)", "0"] {
            assert_eq!(parse_rfc2822(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn garbage_date_is_reported() {
        let raw = "Message-ID: <5@x>\r\nFrom: a@x.com\r\nDate: yesterday\r\n\r\nbody";
        match parse_email(raw) {
            Err(ParseError::InvalidDate(v)) => assert_eq!(v, "yesterday"),
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn sender_is_first_from_address() {
        let raw = "Message-ID: <6@x>\r\nFrom: z@x.com, a@x.com\r\nCc: c@x.com, c@x.com\r\n\r\n";
        let email = parse_email(raw).unwrap();
        assert_eq!(email.sender_email, "z@x.com");
        assert_eq!(email.cc, vec!["c@x.com".to_string()]);
    }

    #[test]
    fn received_lines_are_all_kept() {
        let raw = concat!(
            "Received: from relay1\r\n",
            "Received: from relay2\r\n",
            "Message-ID: <7@x>\r\n",
            "From: a@x.com\r\n",
            "\r\n",
        );
        let email = parse_email(raw).unwrap();
        assert_eq!(email.header("Received"), Some("from relay2"));
        assert_eq!(email.received, vec!["from relay1", "from relay2"]);
        let entries = email.metadata_entries();
        assert_eq!(entries.iter().filter(|(k, _)| *k == "Received").count(), 2);
    }

    #[test]
    fn mixed_case_received_expands_once() {
        let raw = concat!(
            "Received: from a\r\n",
            "received: from b\r\n",
            "Message-ID: <8@x>\r\n",
            "From: a@x.com\r\n",
            "\r\n",
        );
        let email = parse_email(raw).unwrap();
        let trace: Vec<(&str, &str)> = email
            .metadata_entries()
            .into_iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("Received"))
            .collect();
        assert_eq!(trace, vec![("Received", "from a"), ("Received", "from b")]);
    }
}
