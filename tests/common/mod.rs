//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::Path;

use prost::Message;
use reqwest::Url;
use wiremock::MockServer;
use wmata::gtfs_rt::{FeedEntity, FeedHeader, FeedMessage, Position, VehiclePosition};
use wmata::{Client, ClientConfig};

pub const API_KEY: &str = "test-key";

pub const NEXT_TRAINS: &str = r#"{"Trains": [
    {"Car": "8", "Destination": "Glenmont", "DestinationCode": "B11",
     "DestinationName": "Glenmont", "Group": "2", "Line": "RD",
     "LocationCode": "A01", "LocationName": "Metro Center", "Min": "BRD"},
    {"Car": "-", "Destination": "No Passenger", "DestinationCode": null,
     "DestinationName": "No Passenger", "Group": "1", "Line": "--",
     "LocationCode": "A01", "LocationName": "Metro Center", "Min": ""}
]}"#;

pub const INCIDENTS: &str = r#"{"Incidents": [{
    "IncidentID": "3754F8B2-A0A6-494E-A4B5-82C9E72DFA74",
    "Description": "Red Line: Expect residual delays to Glenmont.",
    "IncidentType": "Delay", "LinesAffected": "RD;",
    "DateUpdated": "2024-01-15T08:12:45"
}]}"#;

fn config(server: &MockServer) -> ClientConfig {
    let base_url = Url::parse(&server.uri()).unwrap();
    ClientConfig::new(API_KEY).with_base_url(base_url)
}

/// Client pointed at `server`, sending [`API_KEY`].
pub fn client(server: &MockServer) -> Client {
    Client::new(config(server)).unwrap()
}

/// Like [`client`], staging background downloads under `dir`.
pub fn client_with_download_dir(server: &MockServer, dir: &Path) -> Client {
    Client::new(config(server).with_download_dir(dir)).unwrap()
}

/// Encoded vehicle-positions feed with `count` vehicles.
pub fn vehicle_feed(count: usize) -> Vec<u8> {
    let feed = FeedMessage {
        header: FeedHeader {
            gtfs_realtime_version: "2.0".to_string(),
            timestamp: Some(1_705_324_365),
            ..Default::default()
        },
        entity: (0..count)
            .map(|i| FeedEntity {
                id: format!("{}", 3000 + i),
                vehicle: Some(VehiclePosition {
                    position: Some(Position {
                        latitude: 38.9,
                        longitude: -77.03,
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .collect(),
    };
    feed.encode_to_vec()
}
