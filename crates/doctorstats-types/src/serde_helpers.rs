//! Serde helpers for loosely typed backend fields

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parse a timestamp that may be RFC 3339 or a naive ISO-8601 string (assumed UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Optional timestamp field. Unparseable values become `None` instead of failing the record.
pub fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// String field that the backend sometimes sends as a number.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        UInt(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::UInt(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_naive_isoformat() {
        let ts = parse_timestamp("2024-03-05T10:20:30.123456").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-03-05T10:20:30+02:00").unwrap();
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
