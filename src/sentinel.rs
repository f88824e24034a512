//! Field-scoped "no value" literals.
//!
//! The upstream API encodes absence as ad hoc literals (`"--"`, `"No"`, `""`)
//! rather than `null`, and which literals apply differs per field. Each such
//! field names its own [`SentinelSet`] and decodes through [`decode_optional`].

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;

/// Immutable set of raw literals meaning "absent" for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelSet {
    name: &'static str,
    literals: &'static [&'static str],
}

impl SentinelSet {
    pub const fn new(name: &'static str, literals: &'static [&'static str]) -> Self {
        Self { name, literals }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Exact, byte-for-byte membership. No trimming, no case folding.
    pub fn contains(&self, raw: &str) -> bool {
        self.literals.iter().any(|lit| *lit == raw)
    }
}

/// Next-train `Line`: `"--"` and `"No"` for non-passenger trains.
pub const TRAIN_LINE: SentinelSet = SentinelSet::new("train line", &["--", "No", ""]);

/// Next-train `Car`: `"-"` when the consist length is not yet known.
pub const TRAIN_CARS: SentinelSet = SentinelSet::new("train cars", &["-", ""]);

/// Next-train `Min`: blank or dashes when no estimate is available.
pub const TRAIN_MINUTES: SentinelSet = SentinelSet::new("train minutes", &["", "---"]);

/// Free-text or code fields that use the empty string for absence.
pub const EMPTY: SentinelSet = SentinelSet::new("empty", &[""]);

/// Train position `TrainNumber`: blank, or all zeroes for equipment moves.
pub const TRAIN_NUMBER: SentinelSet = SentinelSet::new("train number", &["", "000", "0"]);

pub fn is_sentinel(raw: &str, set: &SentinelSet) -> bool {
    set.contains(raw)
}

/// Decodes an optional field, mapping sentinel literals and `null` to `None`.
///
/// Sentinel membership is checked before `inner` runs, so a literal in `set`
/// is absent even when `inner` could have parsed it. Strings are matched as-is
/// and numbers by their JSON text (`0` matches `"0"`).
pub fn decode_optional<T, E>(
    raw: Value,
    set: &SentinelSet,
    inner: impl FnOnce(Value) -> Result<T, E>,
) -> Result<Option<T>, E> {
    if raw.is_null() {
        return Ok(None);
    }

    if let Some(literal) = raw_literal(&raw) {
        if set.contains(&literal) {
            return Ok(None);
        }
    }

    inner(raw).map(Some)
}

/// Serde entry point for `#[serde(deserialize_with = ...)]` field helpers.
pub fn deserialize<'de, D, T>(deserializer: D, set: &SentinelSet) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    decode_optional(raw, set, |value| {
        serde_json::from_value(value).map_err(D::Error::custom)
    })
}

/// Like [`deserialize`], for values the upstream sends as text (`"8"`).
///
/// The raw string, or a number's JSON text, is parsed with `FromStr`.
pub fn deserialize_parsed<'de, D, T>(
    deserializer: D,
    set: &SentinelSet,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Value::deserialize(deserializer)?;
    decode_optional(raw, set, |value| match raw_literal(&value) {
        Some(literal) => literal.parse().map_err(D::Error::custom),
        None => Err(D::Error::custom(format!(
            "expected a string or number, found {value}"
        ))),
    })
}

fn raw_literal(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}
