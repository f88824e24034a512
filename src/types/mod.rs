//! Domain values decoded from the JSON endpoints.

mod bus;
mod codes;
mod rail;

pub use bus::{BusIncident, BusIncidentsResponse, BusPosition, BusPositionsResponse, Route, RoutesResponse};
pub use codes::{InvalidCode, LineCode, StationCode};
pub use rail::{
    Address, Arrival, ElevatorIncident, ElevatorIncidentsResponse, Incident, IncidentsResponse,
    Line, LinesResponse, NextTrainsResponse, Prediction, ServiceType, Station, StationsResponse,
    TrainPosition, TrainPositionsResponse,
};
