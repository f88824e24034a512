mod auth;
mod basic;
mod client;

pub use auth::ApiKey;
pub use basic::BasicClient;
pub use client::HttpClient;

use bytes::Bytes;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::Error;

/// Executes `req` and reads the whole body.
///
/// The status is returned alongside the bytes; a non-2xx status is not an
/// error here, since the body may carry the upstream error envelope.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(
    client: &C,
    req: reqwest::Request,
) -> Result<(StatusCode, Bytes), Error> {
    let resp = client.execute(req).await?;
    let status = resp.status();
    let bytes = resp.bytes().await?;
    debug!(%status, bytes = bytes.len(), "Response body received");
    Ok((status, bytes))
}
