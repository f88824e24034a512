use crate::endpoint::{Endpoint, QueryItem};
use crate::types::{
    ElevatorIncidentsResponse, IncidentsResponse, LineCode, LinesResponse, NextTrainsResponse,
    Station, StationCode, StationsResponse, TrainPositionsResponse,
};

/// All Metrorail lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lines;

impl Endpoint for Lines {
    type Response = LinesResponse;

    fn path(&self) -> String {
        "/Rail.svc/json/jLines".to_string()
    }
}

/// Station list, optionally restricted to one line.
#[derive(Debug, Clone, Default)]
pub struct Stations {
    pub line: Option<LineCode>,
}

impl Endpoint for Stations {
    type Response = StationsResponse;

    fn path(&self) -> String {
        "/Rail.svc/json/jStations".to_string()
    }

    fn query(&self) -> Vec<QueryItem> {
        vec![QueryItem::optional("LineCode", self.line)]
    }
}

#[derive(Debug, Clone)]
pub struct StationInformation {
    pub station: StationCode,
}

impl Endpoint for StationInformation {
    type Response = Station;

    fn path(&self) -> String {
        "/Rail.svc/json/jStationInfo".to_string()
    }

    fn query(&self) -> Vec<QueryItem> {
        vec![QueryItem::required("StationCode", Some(&self.station))]
    }
}

/// Arrival predictions. An empty station list asks for every station.
#[derive(Debug, Clone, Default)]
pub struct NextTrains {
    pub stations: Vec<StationCode>,
}

impl Endpoint for NextTrains {
    type Response = NextTrainsResponse;

    fn path(&self) -> String {
        let codes = if self.stations.is_empty() {
            "All".to_string()
        } else {
            self.stations
                .iter()
                .map(StationCode::as_str)
                .collect::<Vec<_>>()
                .join(",")
        };
        format!("/StationPrediction.svc/json/GetPrediction/{codes}")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RailIncidents;

impl Endpoint for RailIncidents {
    type Response = IncidentsResponse;

    fn path(&self) -> String {
        "/Incidents.svc/json/Incidents".to_string()
    }
}

/// Elevator and escalator outages.
#[derive(Debug, Clone, Default)]
pub struct ElevatorIncidents {
    pub station: Option<StationCode>,
}

impl Endpoint for ElevatorIncidents {
    type Response = ElevatorIncidentsResponse;

    fn path(&self) -> String {
        "/Incidents.svc/json/ElevatorIncidents".to_string()
    }

    fn query(&self) -> Vec<QueryItem> {
        vec![QueryItem::optional("StationCode", self.station.as_ref())]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrainPositions;

impl Endpoint for TrainPositions {
    type Response = TrainPositionsResponse;

    fn path(&self) -> String {
        "/TrainPositions/TrainPositions".to_string()
    }

    fn query(&self) -> Vec<QueryItem> {
        vec![QueryItem::new("contentType", "json")]
    }
}
