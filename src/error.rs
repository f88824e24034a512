//! Typed failures surfaced by every transport.

use std::path::PathBuf;

/// Errors that can occur while building, sending or decoding a request.
///
/// Every executor converts its lower-level failures into exactly one of these
/// before delivery. Nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network-level failure reported by the HTTP layer.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The transfer finished without bytes and without an underlying error.
    #[error("response contained no data")]
    NoData,

    /// The body could not be decoded into the declared response type.
    #[error("failed to decode response at `{}`: {reason}", display_path(.path))]
    Decode { path: Vec<String>, reason: String },

    /// The upstream answered with its error envelope instead of a payload.
    #[error("API error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    /// The background session was invalidated before the task completed.
    #[error("background session became invalid")]
    BackgroundSessionInvalid,

    /// The background transfer finished but its artifact could not be read.
    #[error("failed to load downloaded file '{}': {source}", .path.display())]
    BackgroundFileLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The endpoint could not produce a valid request.
    #[error("unable to build request: {0}")]
    UnableToBuildRequest(String),
}

/// Flat classification of [`Error`] for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TransportFailure,
    /// Covers both a body that matched neither the declared type nor the
    /// error envelope, and a malformed body.
    DecodeFailure,
    /// The upstream error envelope decoded; see [`Error::Api`].
    ApiError,
    BackgroundSessionInvalid,
    BackgroundFileLoadFailure,
    UnableToBuildRequest,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) | Error::NoData => ErrorKind::TransportFailure,
            Error::Decode { .. } => ErrorKind::DecodeFailure,
            Error::Api { .. } => ErrorKind::ApiError,
            Error::BackgroundSessionInvalid => ErrorKind::BackgroundSessionInvalid,
            Error::BackgroundFileLoad { .. } => ErrorKind::BackgroundFileLoadFailure,
            Error::UnableToBuildRequest(_) => ErrorKind::UnableToBuildRequest,
        }
    }

    /// Field path of a decode failure, outermost segment first.
    pub fn path(&self) -> Option<&[String]> {
        match self {
            Error::Decode { path, .. } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn decode(path: Vec<String>, reason: impl ToString) -> Self {
        Error::Decode {
            path,
            reason: reason.to_string(),
        }
    }
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        ".".to_string()
    } else {
        path.join(".")
    }
}

/// Terminal result of one request: the typed value or exactly one [`Error`].
pub type DecodedResponse<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display_joins_path() {
        let err = Error::decode(vec!["trains".into(), "0".into(), "line".into()], "bad code");
        assert_eq!(
            err.to_string(),
            "failed to decode response at `trains.0.line`: bad code"
        );
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_decode_error_display_root_path() {
        let err = Error::decode(vec![], "EOF while parsing a value");
        assert!(err.to_string().contains("at `.`"));
        assert_eq!(err.path(), Some(&[][..]));
    }

    #[test]
    fn test_no_data_is_transport_failure() {
        assert_eq!(Error::NoData.kind(), ErrorKind::TransportFailure);
        assert!(Error::NoData.path().is_none());
    }

    #[test]
    fn test_decoded_envelope_is_api_error() {
        let err = Error::Api {
            status_code: 401,
            message: "Access denied".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert_eq!(err.to_string(), "API error: 401 - Access denied");
    }
}
