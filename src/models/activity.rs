use std::fmt;

use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::models::location::Coordinates;
use crate::services::field_resolver::FromJson;

// Clock formats seen from the webhook, tried in order
const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];

static MEAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)breakfast|lunch|dinner|buffet").expect("valid meal pattern"));
static LODGING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)hotel|check.?in|check.?out").expect("valid lodging pattern"));

/// Scheduled start of an activity. Serialized as `"HH:MM"` or `"TBD"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ActivityTime {
    At(NaiveTime),
    #[default]
    Tbd,
}

impl ActivityTime {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
            .map(ActivityTime::At)
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, ActivityTime::At(_))
    }
}

impl fmt::Display for ActivityTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityTime::At(time) => write!(f, "{}", time.format("%H:%M")),
            ActivityTime::Tbd => write!(f, "TBD"),
        }
    }
}

impl Serialize for ActivityTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl FromJson for ActivityTime {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().and_then(ActivityTime::parse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Meal,
    Lodging,
    Sightseeing,
}

impl ActivityKind {
    /// Classify by the activity name when upstream gives no explicit kind.
    pub fn classify(name: &str) -> Self {
        if MEAL_PATTERN.is_match(name) {
            ActivityKind::Meal
        } else if LODGING_PATTERN.is_match(name) {
            ActivityKind::Lodging
        } else {
            ActivityKind::Sightseeing
        }
    }
}

impl FromJson for ActivityKind {
    fn from_json(value: &Value) -> Option<Self> {
        match value.as_str()?.trim().to_ascii_lowercase().as_str() {
            "meal" => Some(ActivityKind::Meal),
            "lodging" => Some(ActivityKind::Lodging),
            "sightseeing" => Some(ActivityKind::Sightseeing),
            _ => None,
        }
    }
}

/// One entry of a day's schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,
    pub time: ActivityTime,
    pub duration_hours: Option<f64>,
    pub coordinates: Option<Coordinates>,
    pub score: Option<f64>,
    pub theme_match_percent: Option<f64>,
    pub location_label: Option<String>,
    pub image: Option<String>,
    pub kind: ActivityKind,
}

/// Flat, day-tagged activity record used for map pins and coordinate lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub day: Option<u32>,
    pub time: ActivityTime,
    pub coordinates: Option<Coordinates>,
    pub matched_coordinates: Option<Coordinates>,
    pub matched_product_name: String,
    pub matched_city: Option<String>,
    pub lifestyle_id: Option<String>,
    pub image: Option<String>,
    pub score: Option<f64>,
    pub rank: u32,
    pub region: Option<String>,
    pub duration_hours: Option<f64>,
}

impl ActivityRecord {
    /// Matched coordinates take precedence over the raw ones.
    pub fn position(&self) -> Option<Coordinates> {
        self.matched_coordinates.or(self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_time_parsing_normalizes_to_clock_format() {
        assert_eq!(ActivityTime::parse("9:05").map(|t| t.to_string()), Some("09:05".into()));
        assert_eq!(ActivityTime::parse("14:30:00").map(|t| t.to_string()), Some("14:30".into()));
        assert_eq!(ActivityTime::parse("2:15 PM").map(|t| t.to_string()), Some("14:15".into()));
        assert_eq!(ActivityTime::parse("Morning"), None);
    }

    #[test]
    fn test_time_serializes_as_string() {
        assert_eq!(serde_json::to_value(ActivityTime::Tbd).unwrap(), json!("TBD"));
        let at = ActivityTime::parse("08:00").unwrap();
        assert_eq!(serde_json::to_value(at).unwrap(), json!("08:00"));
    }

    #[test]
    fn test_scheduled_times_sort_before_tbd() {
        let mut times = vec![
            ActivityTime::Tbd,
            ActivityTime::parse("15:00").unwrap(),
            ActivityTime::parse("08:30").unwrap(),
        ];
        times.sort();
        assert_eq!(times[0].to_string(), "08:30");
        assert_eq!(times[2], ActivityTime::Tbd);
    }

    #[test]
    fn test_classify_by_name() {
        assert_eq!(ActivityKind::classify("Lunch at Ministry of Crab"), ActivityKind::Meal);
        assert_eq!(ActivityKind::classify("Hotel check-in"), ActivityKind::Lodging);
        assert_eq!(ActivityKind::classify("Temple of the Tooth"), ActivityKind::Sightseeing);
    }

    #[test]
    fn test_position_prefers_matched_coordinates() {
        let record = ActivityRecord {
            day: Some(1),
            time: ActivityTime::Tbd,
            coordinates: Coordinates::new(1.0, 1.0),
            matched_coordinates: Coordinates::new(2.0, 2.0),
            matched_product_name: "Safari".into(),
            matched_city: None,
            lifestyle_id: None,
            image: None,
            score: None,
            rank: 1,
            region: None,
            duration_hours: None,
        };
        assert_eq!(record.position(), Coordinates::new(2.0, 2.0));
    }
}
