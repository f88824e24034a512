//! The request entry point shared by every executor.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Url;
use tokio::runtime::Handle;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{DecodedResponse, Error};
use crate::fetch::{ApiKey, BasicClient, HttpClient};
use crate::transport;

/// API client.
///
/// Cheap to clone; clones share the underlying connection pool. The
/// structured-concurrency executor is [`Client::request`]. The callback,
/// stream and background executors live in [`crate::transport`].
pub struct Client<C = ApiKey<BasicClient>> {
    http: Arc<C>,
    base_url: Url,
    runtime: Option<Handle>,
    download_dir: Option<PathBuf>,
}

impl<C> Clone for Client<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            base_url: self.base_url.clone(),
            runtime: self.runtime.clone(),
            download_dir: self.download_dir.clone(),
        }
    }
}

impl Client {
    /// Builds a client that sends the configured API key on every request.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed or the API key is not a
    /// valid header value.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let basic = BasicClient::with_timeouts(config.timeout, config.connect_timeout)?;
        let http = ApiKey::new(basic, &config.api_key)?;

        let client = Self::with_http_client(http, config.base_url);
        Ok(match config.download_dir {
            Some(dir) => client.with_download_dir(dir),
            None => client,
        })
    }
}

impl<C: HttpClient + 'static> Client<C> {
    /// Wraps an arbitrary [`HttpClient`]. The current Tokio runtime, if any, is
    /// remembered for executors that spawn work.
    pub fn with_http_client(http: C, base_url: Url) -> Self {
        Self {
            http: Arc::new(http),
            base_url,
            runtime: Handle::try_current().ok(),
            download_dir: None,
        }
    }

    /// Directory where [`crate::BackgroundSession`]s stage downloads.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The single request pipeline: build, send, read, decode.
    ///
    /// Nothing happens until the returned future is polled, and dropping it
    /// aborts the in-flight HTTP call. It does not borrow `self`.
    pub fn call<E: Endpoint>(
        &self,
        endpoint: E,
    ) -> impl Future<Output = DecodedResponse<E::Response>> + Send + use<C, E> {
        let http = Arc::clone(&self.http);
        let base_url = self.base_url.clone();

        async move { transport::execute(&*http, &base_url, &endpoint).await }
    }

    /// Suspends until the request completes.
    ///
    /// Cancelling the enclosing task (or dropping this future) cancels the
    /// network call and nothing is delivered.
    pub async fn request<E: Endpoint>(&self, endpoint: E) -> DecodedResponse<E::Response> {
        self.call(endpoint).await
    }

    pub(crate) fn http(&self) -> &Arc<C> {
        &self.http
    }

    pub(crate) fn runtime(&self) -> Option<Handle> {
        Handle::try_current().ok().or_else(|| self.runtime.clone())
    }

    pub(crate) fn download_dir(&self) -> Option<&Path> {
        self.download_dir.as_deref()
    }
}
