//! The API endpoints this crate declares.

mod bus;
mod gtfs;
mod rail;

pub use bus::{BusIncidents, BusPositions, BusRoutes, Radius};
pub use gtfs::GtfsFeed;
pub use rail::{ElevatorIncidents, Lines, NextTrains, RailIncidents, StationInformation, Stations, TrainPositions};
