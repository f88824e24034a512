//! Endpoint descriptors and request assembly.
//!
//! An endpoint is an immutable value: a path relative to the API base URL,
//! a set of query items, and a declared [`Response`] type that fixes how the
//! body is decoded. All executors build requests through [`Endpoint::request`].

use reqwest::{Method, Request, Url};

use crate::decoder::{PayloadKind, Response};
use crate::error::Error;

/// One query parameter. A `None` value is omitted from the URL entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryItem {
    pub name: &'static str,
    pub value: Option<String>,
    pub required: bool,
}

impl QueryItem {
    pub fn new(name: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            value: Some(value.to_string()),
            required: false,
        }
    }

    pub fn optional<T: ToString>(name: &'static str, value: Option<T>) -> Self {
        Self {
            name,
            value: value.map(|v| v.to_string()),
            required: false,
        }
    }

    /// A parameter the upstream rejects requests without.
    pub fn required<T: ToString>(name: &'static str, value: Option<T>) -> Self {
        Self {
            required: true,
            ..Self::optional(name, value)
        }
    }
}

/// Description of one API call.
pub trait Endpoint: Send + Sync + 'static {
    type Response: Response;

    /// Path relative to the API base URL, e.g. `/Rail.svc/json/jLines`.
    fn path(&self) -> String;

    fn query(&self) -> Vec<QueryItem> {
        Vec::new()
    }

    fn payload_kind(&self) -> PayloadKind {
        <Self::Response as Response>::PAYLOAD
    }

    /// Assembles the full URL against `base`. The endpoint path is appended
    /// below any path `base` already has.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnableToBuildRequest`] if the path does not join onto
    /// `base` or a required query item has no value.
    fn url(&self, base: &Url) -> Result<Url, Error> {
        let mut root = base.clone();
        if !root.path().ends_with('/') {
            let dir = format!("{}/", root.path());
            root.set_path(&dir);
        }

        let path = self.path();
        let mut url = root
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::UnableToBuildRequest(format!("invalid path: {e}")))?;

        let mut present = Vec::new();
        for item in self.query() {
            match item.value {
                Some(value) => present.push((item.name, value)),
                None if item.required => {
                    return Err(Error::UnableToBuildRequest(format!(
                        "missing required parameter {}",
                        item.name
                    )));
                }
                None => {}
            }
        }

        if !present.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &present {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    /// Builds the GET request. The credential header is added by the
    /// [`crate::fetch::ApiKey`] layer when the request is executed.
    fn request(&self, base: &Url) -> Result<Request, Error> {
        Ok(Request::new(Method::GET, self.url(base)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LinesResponse;

    struct Filtered {
        route: Option<&'static str>,
        station: Option<&'static str>,
    }

    impl Endpoint for Filtered {
        type Response = LinesResponse;

        fn path(&self) -> String {
            "/Bus.svc/json/jBusPositions".to_string()
        }

        fn query(&self) -> Vec<QueryItem> {
            vec![
                QueryItem::optional("RouteID", self.route),
                QueryItem::required("StationCode", self.station),
                QueryItem::new("contentType", "json"),
            ]
        }
    }

    fn base() -> Url {
        Url::parse("https://api.wmata.com").unwrap()
    }

    #[test]
    fn test_absent_values_are_omitted() {
        let url = Filtered {
            route: None,
            station: Some("A01"),
        }
        .url(&base())
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.wmata.com/Bus.svc/json/jBusPositions?StationCode=A01&contentType=json"
        );
    }

    #[test]
    fn test_present_values_are_encoded() {
        let url = Filtered {
            route: Some("10A B"),
            station: Some("A01"),
        }
        .url(&base())
        .unwrap();

        assert_eq!(url.query(), Some("RouteID=10A+B&StationCode=A01&contentType=json"));
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let filtered = Filtered {
            route: None,
            station: Some("A01"),
        };

        for base in ["https://proxy.example/wmata", "https://proxy.example/wmata/"] {
            let url = filtered.url(&Url::parse(base).unwrap()).unwrap();
            assert_eq!(url.path(), "/wmata/Bus.svc/json/jBusPositions");
        }
    }

    #[test]
    fn test_missing_required_parameter_fails() {
        let err = Filtered {
            route: None,
            station: None,
        }
        .request(&base())
        .unwrap_err();

        assert!(matches!(err, Error::UnableToBuildRequest(ref msg) if msg.contains("StationCode")));
    }

    #[test]
    fn test_request_is_get_without_credential() {
        let request = Filtered {
            route: None,
            station: Some("A01"),
        }
        .request(&base())
        .unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_payload_kind_follows_declared_type() {
        let filtered = Filtered {
            route: None,
            station: None,
        };
        assert_eq!(filtered.payload_kind(), PayloadKind::Json);
    }
}
