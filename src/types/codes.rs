use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} code: '{value}'")]
pub struct InvalidCode {
    kind: &'static str,
    value: String,
}

impl InvalidCode {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Metrorail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineCode {
    #[serde(rename = "RD")]
    Red,
    #[serde(rename = "BL")]
    Blue,
    #[serde(rename = "YL")]
    Yellow,
    #[serde(rename = "OR")]
    Orange,
    #[serde(rename = "GR")]
    Green,
    #[serde(rename = "SV")]
    Silver,
}

impl LineCode {
    pub const ALL: [LineCode; 6] = [
        LineCode::Red,
        LineCode::Blue,
        LineCode::Yellow,
        LineCode::Orange,
        LineCode::Green,
        LineCode::Silver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LineCode::Red => "RD",
            LineCode::Blue => "BL",
            LineCode::Yellow => "YL",
            LineCode::Orange => "OR",
            LineCode::Green => "GR",
            LineCode::Silver => "SV",
        }
    }
}

impl fmt::Display for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineCode {
    type Err = InvalidCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LineCode::ALL
            .into_iter()
            .find(|line| line.as_str() == s)
            .ok_or_else(|| InvalidCode::new("line", s))
    }
}

/// Metrorail station code: one letter and two digits, e.g. `A01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationCode(String);

impl StationCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StationCode {
    type Err = InvalidCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let valid = bytes.len() == 3
            && bytes[0].is_ascii_uppercase()
            && bytes[1..].iter().all(u8::is_ascii_digit);

        if valid {
            Ok(StationCode(s.to_string()))
        } else {
            Err(InvalidCode::new("station", s))
        }
    }
}

impl TryFrom<String> for StationCode {
    type Error = InvalidCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StationCode> for String {
    fn from(code: StationCode) -> Self {
        code.0
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
