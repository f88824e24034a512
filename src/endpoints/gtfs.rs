use crate::endpoint::Endpoint;
use crate::gtfs_rt::FeedMessage;

/// The GTFS-realtime protobuf feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GtfsFeed {
    RailTripUpdates,
    RailVehiclePositions,
    RailAlerts,
    BusTripUpdates,
    BusVehiclePositions,
    BusAlerts,
}

impl GtfsFeed {
    pub fn file_name(&self) -> &'static str {
        match self {
            GtfsFeed::RailTripUpdates => "rail-gtfsrt-tripupdates.pb",
            GtfsFeed::RailVehiclePositions => "rail-gtfsrt-vehiclepositions.pb",
            GtfsFeed::RailAlerts => "rail-gtfsrt-alerts.pb",
            GtfsFeed::BusTripUpdates => "bus-gtfsrt-tripupdates.pb",
            GtfsFeed::BusVehiclePositions => "bus-gtfsrt-vehiclepositions.pb",
            GtfsFeed::BusAlerts => "bus-gtfsrt-alerts.pb",
        }
    }
}

impl Endpoint for GtfsFeed {
    type Response = FeedMessage;

    fn path(&self) -> String {
        format!("/gtfs/{}", self.file_name())
    }
}
