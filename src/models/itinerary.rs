use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::models::activity::{Activity, ActivityRecord};
use crate::models::hotel::Hotel;
use crate::models::location::Region;
use crate::models::verification::{QualityVerification, Verification};
use crate::services::field_resolver::FromJson;

pub const DEFAULT_MATCH_RATE: &str = "100%";
const UNCONFIRMED_DATES: &str = "Dates to be confirmed";

/// The normalized, UI-ready trip plan.
///
/// Built fresh by [`crate::services::normalization_service::normalize`] for
/// every response; consumers only read it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalItinerary {
    pub trip_title: String,
    pub start_date: String,
    pub end_date: String,
    pub total_days: u32,
    pub total_activities: u32,
    pub adults: u32,
    pub children: u32,
    pub days: Vec<Day>,
    pub products: Vec<ActivityRecord>,
    pub hotels: Vec<Hotel>,
    pub tips: Vec<String>,
    pub regions: BTreeMap<String, Region>,
    /// Region keys in visiting order. Only meaningful when `days` is empty.
    pub route_plan: Vec<String>,
    pub verification: Verification,
    pub quality_verification: QualityVerification,
    pub matching_summary: MatchingSummary,
    pub travel_times: Vec<TravelTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub day_number: u32,
    pub theme: String,
    pub region: Option<String>,
    pub date: String,
    pub hotel: Option<Hotel>,
    pub activities: Vec<Activity>,
    pub meals: Option<Meals>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meals {
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingSummary {
    /// Always a percentage string such as `"87%"`.
    pub match_rate: String,
}

impl Default for MatchingSummary {
    fn default() -> Self {
        Self {
            match_rate: DEFAULT_MATCH_RATE.to_string(),
        }
    }
}

/// A rate rendered as a percentage string. Numbers gain a `%` suffix,
/// strings pass through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Percentage(pub String);

impl FromJson for Percentage {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| Percentage(format!("{}%", f))),
            Value::String(_) => String::from_json(value).map(Percentage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelTime {
    pub from: String,
    pub to: String,
    pub duration: String,
}

/// Headline figures shown above the day tabs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub title: String,
    pub date_range: String,
    pub total_days: u32,
    pub total_activities: u32,
    pub match_rate: String,
}

impl CanonicalItinerary {
    pub fn summary(&self) -> TripSummary {
        let date_range = if !self.start_date.is_empty() && !self.end_date.is_empty() {
            format!("{} → {}", self.start_date, self.end_date)
        } else {
            UNCONFIRMED_DATES.to_string()
        };

        TripSummary {
            title: self.trip_title.clone(),
            date_range,
            total_days: self.total_days,
            total_activities: self.total_activities,
            match_rate: self.matching_summary.match_rate.clone(),
        }
    }

    /// Unique route-plan regions in first-visited order.
    pub fn regions_covered(&self) -> Vec<&str> {
        let mut covered: Vec<&str> = Vec::new();
        for region in &self.route_plan {
            if !covered.contains(&region.as_str()) {
                covered.push(region);
            }
        }
        covered
    }

    /// Finds a day by its number, falling back to its position.
    pub fn day(&self, day_number: u32) -> Option<&Day> {
        self.days
            .iter()
            .find(|day| day.day_number == day_number)
            .or_else(|| {
                let index = usize::try_from(day_number).ok()?.checked_sub(1)?;
                self.days.get(index)
            })
    }
}

/// Response body for the itinerary endpoints.
#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    #[serde(flatten)]
    pub itinerary: CanonicalItinerary,
    pub summary: TripSummary,
}

impl From<CanonicalItinerary> for ItineraryResponse {
    fn from(itinerary: CanonicalItinerary) -> Self {
        let summary = itinerary.summary();
        Self { itinerary, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_percentage_from_number_and_string() {
        assert_eq!(Percentage::from_json(&json!(87)), Some(Percentage("87%".into())));
        assert_eq!(Percentage::from_json(&json!(87.5)), Some(Percentage("87.5%".into())));
        assert_eq!(Percentage::from_json(&json!("87%")), Some(Percentage("87%".into())));
        assert_eq!(Percentage::from_json(&json!(true)), None);
    }
}
