//! Time and timestamp helpers.
//!
//! The hub reports `last_change` as text, usually in the `/Date(<millis>)/`
//! form with an optional `±hhmm` suffix. The raw text is kept on the record;
//! these helpers convert it on demand.

use chrono::{DateTime, Utc};

/// UTC timestamp.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse a hub `last_change` string.
///
/// Accepts `/Date(1590000000000)/`, `/Date(1590000000000-0400)/` and
/// RFC 3339. The millisecond count is UTC; the offset suffix only describes
/// the hub's local zone and is ignored.
#[must_use]
pub fn parse_last_change(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if let Some(inner) = text
        .strip_prefix("/Date(")
        .and_then(|rest| rest.strip_suffix(")/"))
    {
        let (sign, digits) = match inner.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, inner),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        let millis: i64 = digits[..end].parse().ok()?;
        return DateTime::from_timestamp_millis(sign * millis);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Format a timestamp the way the hub reports `last_change`.
#[must_use]
pub fn format_last_change(ts: Timestamp) -> String {
    format!("/Date({})/", ts.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_parse_dotnet_date_without_offset() {
        let ts = parse_last_change("/Date(1590000000000)/").unwrap();
        assert_eq!(ts.timestamp_millis(), 1_590_000_000_000);
    }

    #[test]
    fn should_ignore_offset_suffix() {
        let ts = parse_last_change("/Date(1590000000123-0400)/").unwrap();
        assert_eq!(ts.timestamp_millis(), 1_590_000_000_123);
    }

    #[test]
    fn should_parse_rfc3339() {
        let ts = parse_last_change("2020-05-20T18:40:00Z").unwrap();
        assert_eq!(ts.timestamp(), 1_590_000_000);
    }

    #[test]
    fn should_return_none_for_free_text() {
        assert!(parse_last_change("yesterday").is_none());
        assert!(parse_last_change("/Date(abc)/").is_none());
    }

    #[test]
    fn should_roundtrip_through_hub_format() {
        let ts = parse_last_change("/Date(1590000000000)/").unwrap();
        assert_eq!(format_last_change(ts), "/Date(1590000000000)/");
    }
}
