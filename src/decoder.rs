//! Bytes -> typed response.
//!
//! JSON bodies go through three steps: a path-tracked parse into a
//! [`serde_json::Value`], key translation ([`crate::keys`]), then a path-tracked
//! decode into the declared type. Field helpers handle sentinels and dates.
//! Binary feeds are handed straight to prost.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use serde_path_to_error::{Path, Segment};
use tracing::debug;

use crate::error::{DecodedResponse, Error};
use crate::keys;

/// How a response body is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Json,
    BinaryFeed,
}

/// A type an endpoint can declare as its response.
pub trait Response: Sized + Send + 'static {
    const PAYLOAD: PayloadKind;

    /// Decodes a non-empty body. Call [`decode`] instead, which also rejects
    /// empty bodies.
    fn from_body(bytes: &[u8]) -> DecodedResponse<Self>;
}

/// Implements [`Response`] for JSON payload types.
#[macro_export]
macro_rules! json_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::decoder::Response for $ty {
                const PAYLOAD: $crate::decoder::PayloadKind = $crate::decoder::PayloadKind::Json;

                fn from_body(bytes: &[u8]) -> $crate::error::DecodedResponse<Self> {
                    $crate::decoder::decode_json(bytes)
                }
            }
        )+
    };
}

/// Decodes `bytes` into `T` according to `T`'s payload kind.
///
/// Deterministic and side-effect free. An empty body is always a failure.
pub fn decode<T: Response>(bytes: &[u8]) -> DecodedResponse<T> {
    if bytes.is_empty() {
        return Err(Error::decode(Vec::new(), "empty response body"));
    }
    T::from_body(bytes)
}

/// Decodes a JSON body, falling back to the upstream error envelope.
///
/// If neither the declared type nor the envelope matches, the original decode
/// error is returned.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> DecodedResponse<T> {
    let raw = parse_value(bytes)?;
    let translated = keys::translate_value(raw);

    match serde_path_to_error::deserialize::<_, T>(&translated) {
        Ok(value) => Ok(value),
        Err(primary) => {
            let primary = Error::decode(segments(primary.path()), primary.inner());

            match ErrorEnvelope::deserialize(&translated) {
                Ok(envelope) => {
                    debug!(status_code = envelope.status_code, "Decoded upstream error envelope");
                    Err(Error::Api {
                        status_code: envelope.status_code,
                        message: envelope.message,
                    })
                }
                Err(_) => Err(primary),
            }
        }
    }
}

/// Upstream error body. `StatusCode`/`statusCode` and `Message`/`message`
/// spellings both arrive here as camelCase after key translation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    #[serde(default)]
    status_code: u16,
    message: String,
}

fn parse_value(bytes: &[u8]) -> DecodedResponse<Value> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    // Syntax errors are reported against raw upstream keys; translate them
    // so every decode path uses domain names.
    let value: Value = serde_path_to_error::deserialize(&mut de).map_err(|e| {
        let path = segments(e.path())
            .iter()
            .map(|segment| keys::translate(segment).into_owned())
            .collect();
        Error::decode(path, e.inner())
    })?;
    de.end().map_err(|e| Error::decode(Vec::new(), e))?;
    Ok(value)
}

fn segments(path: &Path) -> Vec<String> {
    path.iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(index.to_string()),
            Segment::Map { key } => Some(key.clone()),
            Segment::Enum { variant } => Some(variant.clone()),
            Segment::Unknown => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde::Serialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        foo: u32,
        direction_number: u8,
        #[serde(default)]
        latitude: Option<f64>,
    }

    json_response!(Sample);

    #[test]
    fn test_decode_translates_keys() {
        let sample: Sample = decode(br#"{"Foo": 3, "DirectionNum": 1, "Lat": 38.5}"#).unwrap();
        assert_eq!(
            sample,
            Sample {
                foo: 3,
                direction_number: 1,
                latitude: Some(38.5)
            }
        );
    }

    #[test]
    fn test_truncated_json_is_decode_failure_at_field() {
        let err = decode::<Sample>(br#"{"foo": }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
        assert_eq!(err.path().unwrap(), ["foo"]);
    }

    #[test]
    fn test_syntax_error_reports_domain_path() {
        let err = decode::<Sample>(br#"{"Foo": 3, "DirectionNum": }"#).unwrap_err();
        assert_eq!(err.path().unwrap(), ["directionNumber"]);

        let err = decode::<Sample>(br#"{"Foo": 3, "DirectionNum": "x"}"#).unwrap_err();
        assert_eq!(err.path().unwrap(), ["directionNumber"]);
    }

    #[test]
    fn test_type_mismatch_reports_domain_path() {
        let err = decode::<Sample>(br#"{"Foo": "three", "DirectionNum": 1}"#).unwrap_err();
        assert_eq!(err.path().unwrap(), ["foo"]);
    }

    #[test]
    fn test_empty_body_is_failure() {
        let err = decode::<Sample>(b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let err = decode::<Sample>(br#"{"Foo": 1, "DirectionNum": 1} x"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_error_envelope_camel_case() {
        let err = decode::<Sample>(br#"{"statusCode": 401, "message": "Access denied"}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Api { status_code: 401, ref message } if message == "Access denied"
        ));
    }

    #[test]
    fn test_error_envelope_pascal_case() {
        let err = decode::<Sample>(br#"{"Message": "Authorization has been denied"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Api { status_code: 0, .. }));
    }

    #[test]
    fn test_unrecognised_body_keeps_primary_error() {
        let err = decode::<Sample>(br#"{"Unexpected": true}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_round_trip_through_domain_keys() {
        let sample = Sample {
            foo: 9,
            direction_number: 2,
            latitude: None,
        };
        let encoded = serde_json::to_vec(&sample).unwrap();
        assert_eq!(decode::<Sample>(&encoded).unwrap(), sample);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let bytes = br#"{"Foo": 1, "DirectionNum": 2}"#;
        assert_eq!(decode::<Sample>(bytes).unwrap(), decode::<Sample>(bytes).unwrap());
    }
}
