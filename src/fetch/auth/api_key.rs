use crate::error::Error;
use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects the API key as an HTTP header on
/// every request.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    key: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Header the upstream reads the subscription key from.
    pub const HEADER: &'static str = "api_key";

    /// Wraps `inner`, sending `key` in the [`ApiKey::HEADER`] header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnableToBuildRequest`] if `key` is not a valid header value.
    pub fn new(inner: C, key: &str) -> Result<Self, Error> {
        Self::with_header(inner, Self::HEADER, key)
    }

    pub fn with_header(inner: C, header_name: &str, key: &str) -> Result<Self, Error> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())
            .map_err(|e| Error::UnableToBuildRequest(format!("invalid header name: {e}")))?;
        let mut key = HeaderValue::from_str(key)
            .map_err(|e| Error::UnableToBuildRequest(format!("invalid API key: {e}")))?;
        key.set_sensitive(true);

        Ok(Self {
            inner,
            header_name,
            key,
        })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.key.clone());
        self.inner.execute(req).await
    }
}
