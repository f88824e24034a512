use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::codes::{InvalidCode, LineCode, StationCode};
use crate::date::{self, Timestamp};
use crate::sentinel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinesResponse {
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub line: LineCode,
    pub display_name: String,
    pub start_station_code: StationCode,
    pub end_station_code: StationCode,
    #[serde(default, deserialize_with = "optional_station")]
    pub internal_destination1: Option<StationCode>,
    #[serde(default, deserialize_with = "optional_station")]
    pub internal_destination2: Option<StationCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationsResponse {
    pub stations: Vec<Station>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub code: StationCode,
    pub name: String,
    /// Other platform of a transfer station (e.g. `F01` for `B01`).
    #[serde(default, deserialize_with = "optional_station")]
    pub station_together1: Option<StationCode>,
    #[serde(default, deserialize_with = "optional_station")]
    pub station_together2: Option<StationCode>,
    pub line1: LineCode,
    #[serde(default, deserialize_with = "optional_line")]
    pub line2: Option<LineCode>,
    #[serde(default, deserialize_with = "optional_line")]
    pub line3: Option<LineCode>,
    #[serde(default, deserialize_with = "optional_line")]
    pub line4: Option<LineCode>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Address,
}

impl Station {
    /// Lines serving this platform, in upstream order.
    pub fn lines(&self) -> Vec<LineCode> {
        std::iter::once(self.line1)
            .chain(self.line2)
            .chain(self.line3)
            .chain(self.line4)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTrainsResponse {
    pub trains: Vec<Prediction>,
}

/// One row of a station's arrival board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default, deserialize_with = "train_cars")]
    pub cars: Option<u8>,
    /// Abbreviated destination as shown on the platform sign.
    pub destination: String,
    #[serde(default, deserialize_with = "optional_station")]
    pub destination_code: Option<StationCode>,
    pub destination_name: String,
    /// Track group, `"1"` or `"2"`.
    pub group: String,
    #[serde(default, deserialize_with = "train_line")]
    pub line: Option<LineCode>,
    pub location_code: StationCode,
    pub location_name: String,
    #[serde(default, deserialize_with = "train_minutes")]
    pub minutes: Option<Arrival>,
}

/// Value of the `Min` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    Arriving,
    Boarding,
    Minutes(u16),
}

impl FromStr for Arrival {
    type Err = InvalidCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ARR" => Ok(Arrival::Arriving),
            "BRD" => Ok(Arrival::Boarding),
            other => other
                .parse()
                .map(Arrival::Minutes)
                .map_err(|_| InvalidCode::new("arrival", other)),
        }
    }
}

impl fmt::Display for Arrival {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arrival::Arriving => f.write_str("ARR"),
            Arrival::Boarding => f.write_str("BRD"),
            Arrival::Minutes(m) => write!(f, "{m}"),
        }
    }
}

impl Serialize for Arrival {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentsResponse {
    pub incidents: Vec<Incident>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub incident: String,
    pub description: String,
    pub incident_type: String,
    #[serde(with = "lines_affected")]
    pub lines_affected: Vec<LineCode>,
    #[serde(with = "date")]
    pub updated: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevatorIncidentsResponse {
    pub elevator_incidents: Vec<ElevatorIncident>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevatorIncident {
    pub unit: String,
    pub unit_type: String,
    pub station: StationCode,
    pub station_name: String,
    pub location_description: String,
    pub symptom_description: String,
    #[serde(with = "date")]
    pub date_out_of_service: Timestamp,
    #[serde(with = "date")]
    pub updated: Timestamp,
    #[serde(default, with = "date::option")]
    pub estimated_return_to_service: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainPositionsResponse {
    pub train_positions: Vec<TrainPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainPosition {
    pub train: String,
    #[serde(default, deserialize_with = "train_number")]
    pub train_number: Option<String>,
    pub cars: u8,
    #[serde(default)]
    pub direction_number: Option<u8>,
    pub circuit: u32,
    #[serde(default, deserialize_with = "optional_station")]
    pub destination_station: Option<StationCode>,
    #[serde(default, deserialize_with = "optional_line")]
    pub line: Option<LineCode>,
    pub seconds_at_location: u32,
    pub service_type: ServiceType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    NoPassengers,
    Normal,
    Special,
    Unknown,
}

fn optional_station<'de, D: Deserializer<'de>>(d: D) -> Result<Option<StationCode>, D::Error> {
    sentinel::deserialize(d, &sentinel::EMPTY)
}

fn optional_line<'de, D: Deserializer<'de>>(d: D) -> Result<Option<LineCode>, D::Error> {
    sentinel::deserialize(d, &sentinel::EMPTY)
}

fn train_line<'de, D: Deserializer<'de>>(d: D) -> Result<Option<LineCode>, D::Error> {
    sentinel::deserialize(d, &sentinel::TRAIN_LINE)
}

fn train_cars<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
    sentinel::deserialize_parsed(d, &sentinel::TRAIN_CARS)
}

fn train_minutes<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Arrival>, D::Error> {
    sentinel::deserialize_parsed(d, &sentinel::TRAIN_MINUTES)
}

fn train_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    sentinel::deserialize(d, &sentinel::TRAIN_NUMBER)
}

/// `LinesAffected` arrives as `"RD; BL;"`.
mod lines_affected {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::LineCode;

    pub fn serialize<S: Serializer>(lines: &[LineCode], serializer: S) -> Result<S::Ok, S::Error> {
        let joined: String = lines.iter().map(|line| format!("{line};")).collect::<Vec<_>>().join(" ");
        serializer.serialize_str(&joined)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<LineCode>, D::Error> {
        let raw = String::deserialize(d)?;
        raw.split(';')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| code.parse().map_err(D::Error::custom))
            .collect()
    }
}

crate::json_response!(
    LinesResponse,
    StationsResponse,
    Station,
    NextTrainsResponse,
    IncidentsResponse,
    ElevatorIncidentsResponse,
    TrainPositionsResponse,
);
