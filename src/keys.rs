//! Upstream-to-domain field name translation.
//!
//! Most upstream keys differ from the domain names only by the casing of the
//! first character (`"Name"` -> `"name"`). [`FIELD_KEY_MAP`] overrides the
//! irregular abbreviations; everything else goes through the fallback rule.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Upstream key -> domain key, for keys the fallback rule gets wrong.
///
/// Keyed by upstream key, so each upstream key has exactly one translation.
pub static FIELD_KEY_MAP: &[(&str, &str)] = &[
    ("Car", "cars"),
    ("CarCount", "cars"),
    ("CircuitId", "circuit"),
    ("DateOutOfServ", "dateOutOfService"),
    ("DateTime", "timestamp"),
    ("DateUpdated", "updated"),
    ("DestinationStationCode", "destinationStation"),
    ("DirectionNum", "directionNumber"),
    ("IncidentID", "incident"),
    ("Lat", "latitude"),
    ("LineCode", "line"),
    ("LineCode1", "line1"),
    ("LineCode2", "line2"),
    ("LineCode3", "line3"),
    ("LineCode4", "line4"),
    ("Lon", "longitude"),
    ("Min", "minutes"),
    ("RouteID", "route"),
    ("StationCode", "station"),
    ("TrainId", "train"),
    ("TripID", "trip"),
    ("UnitName", "unit"),
    ("VehicleID", "vehicle"),
];

/// Translates one upstream key into its domain key. Total: never fails.
///
/// Keys that are array positions (all ASCII digits) are returned unchanged.
pub fn translate(upstream_key: &str) -> Cow<'_, str> {
    if let Some((_, domain)) = FIELD_KEY_MAP.iter().find(|(k, _)| *k == upstream_key) {
        return Cow::Borrowed(domain);
    }

    if is_index(upstream_key) {
        return Cow::Borrowed(upstream_key);
    }

    lower_first(upstream_key)
}

/// Rewrites every object key in `value`, recursing into arrays and objects.
pub fn translate_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (translate(&k).into_owned(), translate_value(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(translate_value).collect()),
        other => other,
    }
}

fn is_index(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

fn lower_first(key: &str) -> Cow<'_, str> {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let mut out = String::with_capacity(key.len());
            out.extend(first.to_lowercase());
            out.push_str(chars.as_str());
            Cow::Owned(out)
        }
        _ => Cow::Borrowed(key),
    }
}
