//! Protobuf parser for the GTFS-realtime feeds.

use prost::Message;

use crate::decoder::{PayloadKind, Response};
use crate::error::{DecodedResponse, Error};
use crate::gtfs_rt::FeedMessage;

/// Decodes a protobuf-encoded GTFS-RT [`FeedMessage`] from raw bytes.
///
/// No key translation or sentinel handling applies to this path.
///
/// # Errors
///
/// Returns [`Error::Decode`] carrying the prost error if the bytes are not a
/// valid `FeedMessage`.
pub fn parse_feed(bytes: &[u8]) -> DecodedResponse<FeedMessage> {
    FeedMessage::decode(bytes).map_err(|e| Error::decode(Vec::new(), e))
}

impl Response for FeedMessage {
    const PAYLOAD: PayloadKind = PayloadKind::BinaryFeed;

    fn from_body(bytes: &[u8]) -> DecodedResponse<Self> {
        parse_feed(bytes)
    }
}
