use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::location::Coordinates;

/// A hotel, either recommended for the trip or attached to a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub name: String,
    pub star_classification: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub image: Option<String>,
    pub room_type: Option<String>,
    pub check_in: String,
    pub check_out: String,
    pub nights: u32,
    /// Day numbers whose itinerary entry names this hotel.
    pub occupied_days: BTreeSet<u32>,
}

impl Hotel {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::new(self.latitude?, self.longitude?)
    }
}

/// Hotels are matched by lowercase, trimmed name.
pub fn hotel_key(name: &str) -> String {
    name.trim().to_lowercase()
}
