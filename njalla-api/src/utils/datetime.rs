//! Serde helpers for Njalla expiry timestamps
//!
//! The API has returned expiry dates as RFC 3339 strings, as
//! `YYYY-MM-DD HH:MM:SS`, as bare dates and as Unix timestamps depending on
//! the object. All of them deserialize to `Option<DateTime<Utc>>`; empty
//! strings and `null` become `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Serializes as an RFC 3339 string.
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawExpiry {
        Text(String),
        Seconds(i64),
    }

    match Option::<RawExpiry>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawExpiry::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawExpiry::Text(s)) => parse_expiry(&s)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("Unrecognised expiry timestamp: {s}"))),
        Some(RawExpiry::Seconds(ts)) => DateTime::from_timestamp(ts, 0)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
    }
}

fn parse_expiry(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
