use serde::Serialize;
use serde_json::{Map, Value};

use crate::services::field_resolver::{lookup, Chain, FromJson};

/// A map position. Both components are always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Builds a pair only when both components are finite.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        (lat.is_finite() && lng.is_finite()).then_some(Self { lat, lng })
    }
}

const LATITUDE: Chain = Chain {
    field: "lat",
    paths: &["lat", "latitude"],
};

const LONGITUDE: Chain = Chain {
    field: "lng",
    paths: &["lng", "lon", "longitude"],
};

impl FromJson for Coordinates {
    /// Accepts `{lat, lng}`, `{latitude, longitude}` or a `[lat, lng]` pair.
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Array(pair) if pair.len() == 2 => {
                Self::new(f64::from_json(&pair[0])?, f64::from_json(&pair[1])?)
            }
            Value::Object(_) => Self::new(LATITUDE.first(value)?, LONGITUDE.first(value)?),
            _ => None,
        }
    }
}

/// A region referenced by the route plan, keyed by its region key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub name: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Region {
    /// Regions arrive either as `{name, ...}` objects or as bare display names.
    pub fn from_entry(key: &str, value: &Value) -> Self {
        match value {
            Value::Object(fields) => {
                let name = lookup(value, "name")
                    .and_then(String::from_json)
                    .unwrap_or_else(|| key.to_string());
                let details = fields
                    .iter()
                    .filter(|(field, _)| field.as_str() != "name")
                    .map(|(field, v)| (field.clone(), v.clone()))
                    .collect();
                Self { name, details }
            }
            other => Self {
                name: String::from_json(other).unwrap_or_else(|| key.to_string()),
                details: Map::new(),
            },
        }
    }
}
