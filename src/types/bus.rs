use serde::{Deserialize, Serialize};

use crate::date::{self, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesResponse {
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Route variant id, e.g. `"D80"` or `"10A"`.
    pub route: String,
    pub name: String,
    pub line_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusPositionsResponse {
    pub bus_positions: Vec<BusPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusPosition {
    pub vehicle: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Minutes behind schedule; negative when early.
    pub deviation: f64,
    #[serde(with = "date")]
    pub timestamp: Timestamp,
    pub trip: String,
    pub route: String,
    pub direction_number: u8,
    pub direction_text: String,
    pub trip_headsign: String,
    #[serde(with = "date")]
    pub trip_start_time: Timestamp,
    #[serde(with = "date")]
    pub trip_end_time: Timestamp,
    pub block_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusIncidentsResponse {
    pub bus_incidents: Vec<BusIncident>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusIncident {
    pub incident: String,
    pub incident_type: String,
    pub routes_affected: Vec<String>,
    pub description: String,
    #[serde(with = "date")]
    pub updated: Timestamp,
}

crate::json_response!(RoutesResponse, BusPositionsResponse, BusIncidentsResponse);
