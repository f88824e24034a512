use crate::endpoint::{Endpoint, QueryItem};
use crate::types::{BusIncidentsResponse, BusPositionsResponse, RoutesResponse};

#[derive(Debug, Clone, Copy, Default)]
pub struct BusRoutes;

impl Endpoint for BusRoutes {
    type Response = RoutesResponse;

    fn path(&self) -> String {
        "/Bus.svc/json/jRoutes".to_string()
    }
}

/// Search circle around a point, radius in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radius {
    pub latitude: f64,
    pub longitude: f64,
    pub meters: f64,
}

/// Live bus positions, optionally filtered by route and/or area.
#[derive(Debug, Clone, Default)]
pub struct BusPositions {
    pub route: Option<String>,
    pub radius: Option<Radius>,
}

impl Endpoint for BusPositions {
    type Response = BusPositionsResponse;

    fn path(&self) -> String {
        "/Bus.svc/json/jBusPositions".to_string()
    }

    fn query(&self) -> Vec<QueryItem> {
        vec![
            QueryItem::optional("RouteID", self.route.as_deref()),
            QueryItem::optional("Lat", self.radius.map(|r| r.latitude)),
            QueryItem::optional("Lon", self.radius.map(|r| r.longitude)),
            QueryItem::optional("Radius", self.radius.map(|r| r.meters)),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct BusIncidents {
    pub route: Option<String>,
}

impl Endpoint for BusIncidents {
    type Response = BusIncidentsResponse;

    fn path(&self) -> String {
        "/Incidents.svc/json/BusIncidents".to_string()
    }

    fn query(&self) -> Vec<QueryItem> {
        vec![QueryItem::optional("Route", self.route.as_deref())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;

    fn base() -> Url {
        Url::parse("https://api.wmata.com").unwrap()
    }

    #[test]
    fn test_bus_positions_without_filters_has_no_query() {
        let url = BusPositions::default().url(&base()).unwrap();
        assert_eq!(url.as_str(), "https://api.wmata.com/Bus.svc/json/jBusPositions");
    }

    #[test]
    fn test_bus_positions_radius_sends_all_three() {
        let url = BusPositions {
            route: Some("D80".to_string()),
            radius: Some(Radius {
                latitude: 38.8978,
                longitude: -77.0063,
                meters: 500.0,
            }),
        }
        .url(&base())
        .unwrap();

        assert_eq!(
            url.query(),
            Some("RouteID=D80&Lat=38.8978&Lon=-77.0063&Radius=500")
        );
    }
}
