//! Lenient timestamp handling for upstream payloads.
//!
//! The REST API is loose about date formats: some records carry full
//! RFC 3339 stamps, others a bare `YYYY-MM-DD`. All reporting in this
//! system is done in local wall-clock terms, so everything normalizes to
//! `NaiveDateTime` and zone offsets are read as the wall-clock time they
//! describe.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses a timestamp string in any of the formats the API emits.
///
/// Accepted, in order of preference: RFC 3339 (offset kept as wall-clock),
/// `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS[.fff]`, and a bare
/// `YYYY-MM-DD` (midnight). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Serde adapter for optional, loosely-formatted timestamp fields.
///
/// Deserializes via [`parse_timestamp`]; values that fail to parse become
/// `None` rather than failing the whole record, matching the defensive
/// posture the dashboard takes toward upstream data quality.
pub mod flexible_timestamp {
    use super::parse_timestamp;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_bare_dates_as_midnight() {
        let dt = parse_timestamp("2025-01-10").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 1, 10));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
    }

    #[test]
    fn parses_rfc3339_as_wall_clock() {
        let dt = parse_timestamp("2025-02-01T14:30:00+05:30").unwrap();
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn parses_datetime_without_zone() {
        let dt = parse_timestamp("2025-03-05T09:15:00").unwrap();
        assert_eq!((dt.month(), dt.day(), dt.hour()), (3, 5, 9));
        assert!(parse_timestamp("2025-03-05 09:15:00.250").is_some());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2025-13-40"), None);
    }
}
