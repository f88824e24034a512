//! Execution styles built over [`Client::call`](crate::Client::call).
//!
//! - awaited: [`Client::request`](crate::Client::request)
//! - callback: [`Client::request_with_callback`](crate::Client::request_with_callback)
//! - single-shot stream: [`Client::request_stream`](crate::Client::request_stream)
//! - background: [`BackgroundSession`]
//!
//! Every style delivers exactly one [`DecodedResponse`] per request.

pub mod background;
mod callback;
mod stream;

pub use background::{BackgroundSession, Delivery, TaskId, TaskState};

use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::decoder::{self, Response};
use crate::endpoint::Endpoint;
use crate::error::{DecodedResponse, Error};
use crate::fetch::{HttpClient, fetch_bytes};

#[tracing::instrument(skip_all, fields(endpoint = std::any::type_name::<E>()))]
pub(crate) async fn execute<C, E>(
    http: &C,
    base_url: &Url,
    endpoint: &E,
) -> DecodedResponse<E::Response>
where
    C: HttpClient + ?Sized,
    E: Endpoint,
{
    let request = endpoint.request(base_url)?;
    debug!(url = %request.url(), payload = ?endpoint.payload_kind(), "Sending request");

    let result = match fetch_bytes(http, request).await {
        Ok((status, bytes)) => finish(status, &bytes),
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        warn!(error = %e, kind = ?e.kind(), "Request failed");
    }
    result
}

/// Decodes a received body. Shared by the in-process and background paths.
pub(crate) fn finish<T: Response>(status: StatusCode, bytes: &[u8]) -> DecodedResponse<T> {
    if status == StatusCode::NO_CONTENT {
        return Err(Error::NoData);
    }

    decoder::decode::<T>(bytes).map_err(|e| match e {
        // Envelopes without a status code take the HTTP one.
        Error::Api {
            status_code: 0,
            message,
        } => Error::Api {
            status_code: status.as_u16(),
            message,
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::LinesResponse;

    #[test]
    fn test_no_content_is_transport_failure() {
        let err = finish::<LinesResponse>(StatusCode::NO_CONTENT, b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }

    #[test]
    fn test_envelope_takes_http_status_when_missing() {
        let err = finish::<LinesResponse>(
            StatusCode::UNAUTHORIZED,
            br#"{"Message": "Access denied due to invalid subscription key."}"#,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Api { status_code: 401, .. }));
    }

    #[test]
    fn test_envelope_keeps_its_own_status() {
        let err = finish::<LinesResponse>(
            StatusCode::OK,
            br#"{"statusCode": 429, "message": "Rate limit is exceeded."}"#,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Api { status_code: 429, .. }));
    }

    #[test]
    fn test_malformed_body_is_never_transport_failure() {
        let err = finish::<LinesResponse>(StatusCode::OK, b"<html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);

        let err = finish::<LinesResponse>(StatusCode::OK, b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }
}
