//! Metadata view returned alongside a payload, and the canonical timestamp
//! format used to serialize not-before instants.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Priority;

/// `2026-10-18 09:30:00 +0000`, or `2026-10-18 09:30:00.250 +0000` when the
/// instant has a fractional second (3, 6 or 9 digits). Lossless in both
/// directions through [`parse_timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse the canonical format, falling back to RFC 3339.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|at| at.with_timezone(&Utc))
}

/// Attributes explicitly set when the entry was added. Nothing else.
///
/// Serialized keys are `priority` and `not_before`. `not_before` is also the
/// key [`AddOptions`](super::AddOptions) reads, so a view can be fed back as
/// options; `dequeue-timestamp` is an input-only alias there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    not_before: Option<String>,
}

impl Metadata {
    pub fn new(priority: Option<Priority>, not_before: Option<DateTime<Utc>>) -> Self {
        Self {
            priority,
            not_before: not_before.map(format_timestamp),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.priority.is_none() && self.not_before.is_none()
    }

    pub fn priority(&self) -> Option<u8> {
        self.priority.map(Priority::get)
    }

    /// Not-before instant in [`TIMESTAMP_FORMAT`].
    pub fn not_before(&self) -> Option<&str> {
        self.not_before.as_deref()
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Priority::new(priority);
        self
    }

    pub fn with_not_before(mut self, at: DateTime<Utc>) -> Self {
        self.not_before = Some(format_timestamp(at));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_metadata_serializes_to_empty_object() {
        let json = serde_json::to_value(Metadata::empty()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn only_set_attributes_are_present() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();

        let json = serde_json::to_value(Metadata::empty().with_priority(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "priority": 3 }));

        let json = serde_json::to_value(Metadata::empty().with_not_before(at)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "not_before": "2026-10-18 09:30:00 +0000" })
        );
    }

    #[test]
    fn canonical_timestamp_round_trips() {
        let at = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 1).unwrap();
        let text = format_timestamp(at);
        assert_eq!(text, "2024-02-29 23:59:01 +0000");
        assert_eq!(parse_timestamp(&text).unwrap(), at);
    }

    #[test]
    fn fractional_seconds_are_kept() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        let text = format_timestamp(at);
        assert_eq!(text, "2026-10-18 09:30:00.250 +0000");
        assert_eq!(parse_timestamp(&text).unwrap(), at);

        let at = at + chrono::Duration::nanoseconds(7);
        assert_eq!(parse_timestamp(&format_timestamp(at)).unwrap(), at);
    }

    #[test]
    fn parse_accepts_rfc3339_and_offsets() {
        let at = parse_timestamp("2026-10-18T12:00:00+02:00").unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap());

        let at = parse_timestamp("2026-10-18 12:00:00 +0530").unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2026, 10, 18, 6, 30, 0).unwrap());

        assert!(parse_timestamp("yesterday").is_err());
    }
}
