//! Upstream timestamp handling.
//!
//! Timestamps arrive as `yyyy-MM-dd'T'HH:mm:ss` with no offset and are local
//! to the agency. They are resolved in `America/New_York`, so daylight saving
//! is applied. A fixed EST offset would put every summer timestamp an hour off.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub const ZONE: Tz = chrono_tz::America::New_York;

pub type Timestamp = DateTime<Tz>;

/// Parses an upstream timestamp.
///
/// In the repeated fall-back hour the earlier instant is chosen. Local times
/// skipped by the spring-forward gap do not exist and are rejected.
pub fn parse(raw: &str) -> Result<Timestamp, String> {
    let naive = NaiveDateTime::parse_from_str(raw, FORMAT)
        .map_err(|e| format!("invalid timestamp '{raw}': {e}"))?;

    match ZONE.from_local_datetime(&naive) {
        LocalResult::Single(ts) => Ok(ts),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(format!("timestamp '{raw}' does not exist in {ZONE}")),
    }
}

pub fn format(ts: &Timestamp) -> String {
    ts.with_timezone(&ZONE).format(FORMAT).to_string()
}

pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(D::Error::custom)
}

/// Same format for `Option<Timestamp>`; `null` and `""` are absent.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        ts: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => super::serialize(ts, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        let raw: Option<String> =
            crate::sentinel::deserialize(deserializer, &crate::sentinel::EMPTY)?;
        raw.map(|raw| parse(&raw).map_err(D::Error::custom))
            .transpose()
    }
}
