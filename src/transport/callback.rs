use std::marker::PhantomData;

use tracing::warn;

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::{DecodedResponse, Error};
use crate::fetch::HttpClient;

/// Holds the callback until a result is available. A guard dropped unused
/// (task cancelled by runtime shutdown) still invokes it, with an error.
struct DeliverOnce<T, F: FnOnce(DecodedResponse<T>)> {
    callback: Option<F>,
    _result: PhantomData<fn(T)>,
}

impl<T, F: FnOnce(DecodedResponse<T>)> DeliverOnce<T, F> {
    fn new(callback: F) -> Self {
        Self {
            callback: Some(callback),
            _result: PhantomData,
        }
    }

    fn deliver(mut self, result: DecodedResponse<T>) {
        if let Some(callback) = self.callback.take() {
            callback(result);
        }
    }
}

impl<T, F: FnOnce(DecodedResponse<T>)> Drop for DeliverOnce<T, F> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            warn!("Callback request dropped before completion");
            callback(Err(Error::UnableToBuildRequest(
                "runtime shut down before the request completed".to_string(),
            )));
        }
    }
}

impl<C: HttpClient + 'static> Client<C> {
    /// Runs the request on the Tokio pool and hands the result to `callback`.
    ///
    /// `callback` runs exactly once, usually on a runtime worker thread. There
    /// is no way to cancel the request once issued. Without a reachable
    /// runtime, or if the runtime shuts down first, the callback is invoked
    /// with [`Error::UnableToBuildRequest`].
    pub fn request_with_callback<E, F>(&self, endpoint: E, callback: F)
    where
        E: Endpoint,
        F: FnOnce(DecodedResponse<E::Response>) + Send + 'static,
    {
        let Some(runtime) = self.runtime() else {
            warn!("No Tokio runtime available for callback request");
            callback(Err(Error::UnableToBuildRequest(
                "no Tokio runtime available".to_string(),
            )));
            return;
        };

        let guard = DeliverOnce::new(callback);
        let call = self.call(endpoint);
        runtime.spawn(async move { guard.deliver(call.await) });
    }
}
