use futures_util::Stream;
use futures_util::stream;

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::DecodedResponse;
use crate::fetch::HttpClient;

impl<C: HttpClient + 'static> Client<C> {
    /// Single-shot stream: yields one result, then ends.
    ///
    /// The request is sent when the stream is first polled, not when it is
    /// created.
    pub fn request_stream<E: Endpoint>(
        &self,
        endpoint: E,
    ) -> impl Stream<Item = DecodedResponse<E::Response>> + Send + use<C, E> {
        stream::once(self.call(endpoint))
    }
}
