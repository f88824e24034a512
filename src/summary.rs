use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::gtfs_rt::FeedMessage;

/// Per-fetch counts for one GTFS-realtime feed.
#[derive(Debug, Default, Serialize)]
pub struct FeedSummary {
    pub fetched_at: DateTime<Utc>,
    pub feed: Option<String>,
    pub header_timestamp: Option<u64>,
    pub total_entities: usize,
    pub deleted: usize,

    // entity types
    pub vehicles: usize,
    pub trip_updates: usize,
    pub alerts: usize,

    // vehicle fields
    pub with_trip: usize,
    pub with_position: usize,
    pub with_timestamp: usize,
    pub with_occupancy: usize,

    // trip updates
    pub stop_time_updates: usize,

    pub error_kind: Option<String>,
    pub error_message: Option<String>,
}

impl FeedSummary {
    pub fn from_feed(feed: &FeedMessage) -> Self {
        let mut s = FeedSummary {
            fetched_at: Utc::now(),
            header_timestamp: feed.header.timestamp,
            total_entities: feed.entity.len(),
            ..Default::default()
        };

        for e in &feed.entity {
            if e.is_deleted() {
                s.deleted += 1;
            }

            if let Some(v) = &e.vehicle {
                s.vehicles += 1;

                if v.trip.is_some() {
                    s.with_trip += 1;
                }
                if v.position.is_some() {
                    s.with_position += 1;
                }
                if v.timestamp.is_some() {
                    s.with_timestamp += 1;
                }
                if v.occupancy_status.is_some() {
                    s.with_occupancy += 1;
                }
            }

            if let Some(tu) = &e.trip_update {
                s.trip_updates += 1;
                s.stop_time_updates += tu.stop_time_update.len();
            }

            if e.alert.is_some() {
                s.alerts += 1;
            }
        }

        s
    }

    /// Record for a fetch that produced no feed.
    pub fn from_error(error: &crate::Error) -> Self {
        FeedSummary {
            fetched_at: Utc::now(),
            error_kind: Some(format!("{:?}", error.kind())),
            error_message: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn with_feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = Some(feed.into());
        self
    }
}
