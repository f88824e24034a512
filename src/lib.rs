//! Client for the WMATA rail, bus and GTFS-realtime APIs.
//!
//! Every request goes through one pipeline (build, send, read, decode) and is
//! delivered through one of four executors: awaited, callback, single-shot
//! stream, or a [`BackgroundSession`].

pub mod client;
pub mod config;
pub mod date;
pub mod decoder;
pub mod endpoint;
pub mod endpoints;
pub mod error;
pub mod fetch;
pub mod keys;
pub mod output;
pub mod parser;
pub mod sentinel;
pub mod summary;
pub mod transport;
pub mod types;

pub mod gtfs_rt {
    include!(concat!(env!("OUT_DIR"), "/transit_realtime.rs"));
}

pub use client::Client;
pub use config::{ClientConfig, ConfigError};
pub use decoder::{PayloadKind, Response};
pub use endpoint::{Endpoint, QueryItem};
pub use error::{DecodedResponse, Error, ErrorKind};
pub use transport::{BackgroundSession, Delivery, TaskId, TaskState};
