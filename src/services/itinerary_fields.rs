//! Fallback tables for every canonical itinerary field.
//!
//! Each entry lists the upstream paths in priority order. The canonical
//! (camelCase) name always comes first so an already-normalized document
//! resolves to itself. Supporting a new upstream alias means adding one path
//! to the relevant chain.

use serde_json::Value;

use crate::models::activity::ActivityTime;
use crate::services::field_resolver::{Chain, FieldRule, FromJson, SELF};

pub const DEFAULT_TRIP_TITLE: &str = "Sri Lanka Adventure";
pub const DEFAULT_ACTIVITY_NAME: &str = "Activity";
pub const DEFAULT_DAY_THEME: &str = "Exploration";
pub const DEFAULT_HOTEL_NAME: &str = "Hotel";
pub const DEFAULT_ADULTS: u32 = 2;

/// Traveler count given as a number or as a list of travelers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Headcount(pub u32);

impl FromJson for Headcount {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Array(travelers) => u32::try_from(travelers.len()).ok().map(Headcount),
            other => u32::from_json(other).map(Headcount),
        }
    }
}

fn default_trip_title() -> String {
    DEFAULT_TRIP_TITLE.to_string()
}

fn default_activity_name() -> String {
    DEFAULT_ACTIVITY_NAME.to_string()
}

fn default_day_theme() -> String {
    DEFAULT_DAY_THEME.to_string()
}

fn default_hotel_name() -> String {
    DEFAULT_HOTEL_NAME.to_string()
}

fn default_adults() -> Headcount {
    Headcount(DEFAULT_ADULTS)
}

fn no_children() -> Headcount {
    Headcount(0)
}

fn to_be_decided() -> ActivityTime {
    ActivityTime::Tbd
}

// ---------------------------------------------------------------------------
// Document level
// ---------------------------------------------------------------------------

pub const DAY_LIST: Chain = Chain {
    field: "days",
    paths: &[
        "days",
        "detailed_itinerary",
        "itinerary",
        "generatedItinerary.itinerary",
        "daily_itinerary",
    ],
};

pub const PRODUCT_LIST: Chain = Chain {
    field: "products",
    paths: &["products", "all_activities_with_ids", "matched_products"],
};

pub const HOTEL_LIST: Chain = Chain {
    field: "hotels",
    paths: &["hotels", "hotel_recommendations", "dbHotels"],
};

pub const TRIP_TITLE: FieldRule<String> = FieldRule {
    chain: Chain {
        field: "tripTitle",
        paths: &[
            "tripTitle",
            "itinerary_summary.destination",
            "travel_details.destination.city",
            "destination",
            "trip_destination",
            "destination_info.country",
        ],
    },
    default: default_trip_title,
};

pub const START_DATE: FieldRule<String> = FieldRule {
    chain: Chain {
        field: "startDate",
        paths: &[
            "startDate",
            "travel_details.travel_dates.start_date",
            "travel_details.start_date",
            "dates.start",
            "start_date",
        ],
    },
    default: String::new,
};

pub const END_DATE: FieldRule<String> = FieldRule {
    chain: Chain {
        field: "endDate",
        paths: &[
            "endDate",
            "travel_details.travel_dates.end_date",
            "travel_details.end_date",
            "dates.end",
            "end_date",
        ],
    },
    default: String::new,
};

/// Declared trip length, consulted only when no day list exists.
pub const DECLARED_TOTAL_DAYS: Chain = Chain {
    field: "totalDays",
    paths: &[
        "totalDays",
        "travel_details.duration.total_days",
        "travel_details.total_days",
        "itinerary_summary.total_days",
    ],
};

pub const DECLARED_TOTAL_ACTIVITIES: Chain = Chain {
    field: "totalActivities",
    paths: &["totalActivities", "itinerary_summary.total_activities"],
};

pub const ADULTS: FieldRule<Headcount> = FieldRule {
    chain: Chain {
        field: "adults",
        paths: &[
            "travel_details.travelers.adults",
            "travel_details.travellers.adults",
            "adults",
        ],
    },
    default: default_adults,
};

pub const CHILDREN: FieldRule<Headcount> = FieldRule {
    chain: Chain {
        field: "children",
        paths: &[
            "travel_details.travelers.children",
            "travel_details.travellers.children",
            "children",
        ],
    },
    default: no_children,
};

pub const MATCH_RATE: Chain = Chain {
    field: "matchRate",
    paths: &["matchingSummary.matchRate", "matching_summary.match_rate"],
};

pub const TIPS: Chain = Chain {
    field: "tips",
    paths: &["tips", "travel_tips"],
};

pub const REGIONS: Chain = Chain {
    field: "regions",
    paths: &["regions"],
};

pub const ROUTE_PLAN: Chain = Chain {
    field: "routePlan",
    paths: &["routePlan", "route_plan"],
};

pub const TRAVEL_TIMES: Chain = Chain {
    field: "travelTimes",
    paths: &["travelTimes", "travel_times"],
};

pub const TRAVEL_FROM: Chain = Chain {
    field: "from",
    paths: &["from", "origin", "from_region"],
};

pub const TRAVEL_TO: Chain = Chain {
    field: "to",
    paths: &["to", "destination", "to_region"],
};

pub const TRAVEL_DURATION: Chain = Chain {
    field: "duration",
    paths: &["duration", "travel_time", "duration_minutes"],
};

// ---------------------------------------------------------------------------
// Day entries
// ---------------------------------------------------------------------------

pub const DAY_NUMBER: Chain = Chain {
    field: "dayNumber",
    paths: &["dayNumber", "day", "day_number"],
};

pub const DAY_THEME: FieldRule<String> = FieldRule {
    chain: Chain {
        field: "theme",
        paths: &["theme", "region", "title"],
    },
    default: default_day_theme,
};

pub const DAY_REGION: Chain = Chain {
    field: "region",
    paths: &["region"],
};

pub const DAY_DATE: FieldRule<String> = FieldRule {
    chain: Chain {
        field: "date",
        paths: &["date"],
    },
    default: String::new,
};

pub const DAY_HOTEL: Chain = Chain {
    field: "hotel",
    paths: &["hotel", "overnight_stay"],
};

pub const DAY_ACTIVITIES: Chain = Chain {
    field: "activities",
    paths: &["activities"],
};

pub const DAY_MEALS: Chain = Chain {
    field: "meals",
    paths: &["meals"],
};

pub const BREAKFAST: Chain = Chain {
    field: "breakfast",
    paths: &["breakfast", "breakfast.name", "breakfast.restaurant"],
};

pub const LUNCH: Chain = Chain {
    field: "lunch",
    paths: &["lunch", "lunch.name", "lunch.restaurant"],
};

pub const DINNER: Chain = Chain {
    field: "dinner",
    paths: &["dinner", "dinner.name", "dinner.restaurant"],
};

// ---------------------------------------------------------------------------
// Activities within a day
// ---------------------------------------------------------------------------

pub const ACTIVITY_NAME: FieldRule<String> = FieldRule {
    chain: Chain {
        field: "name",
        paths: &["name", "matched_product_name", "product_name", "activity_name"],
    },
    default: default_activity_name,
};

pub const ACTIVITY_TIME: FieldRule<ActivityTime> = FieldRule {
    chain: Chain {
        field: "time",
        paths: &["time_slot", "time"],
    },
    default: to_be_decided,
};

pub const ACTIVITY_DURATION: Chain = Chain {
    field: "durationHours",
    paths: &["durationHours", "duration_hours"],
};

pub const ACTIVITY_COORDINATES: Chain = Chain {
    field: "coordinates",
    paths: &[SELF, "matched_coordinates", "coordinates"],
};

pub const ACTIVITY_SCORE: Chain = Chain {
    field: "score",
    paths: &["score", "similarity_score", "match_score"],
};

pub const ACTIVITY_THEME_MATCH: Chain = Chain {
    field: "themeMatchPercent",
    paths: &["themeMatchPercent", "theme_match_percent", "theme_match"],
};

pub const ACTIVITY_LOCATION: Chain = Chain {
    field: "locationLabel",
    paths: &["locationLabel", "city", "location"],
};

pub const ACTIVITY_IMAGE: Chain = Chain {
    field: "image",
    paths: &["image", "images", "image_url"],
};

pub const ACTIVITY_KIND: Chain = Chain {
    field: "kind",
    paths: &["kind"],
};

pub const ACTIVITY_IS_MEAL: Chain = Chain {
    field: "is_meal",
    paths: &["is_meal", "isMeal"],
};

// ---------------------------------------------------------------------------
// Flat activity records
// ---------------------------------------------------------------------------

pub const RECORD_DAY: Chain = Chain {
    field: "day",
    paths: &["day_assigned", "day"],
};

pub const RECORD_MATCHED_COORDINATES: Chain = Chain {
    field: "matchedCoordinates",
    paths: &["matchedCoordinates", "matched_coordinates", SELF],
};

pub const RECORD_COORDINATES: Chain = Chain {
    field: "coordinates",
    paths: &["coordinates", SELF],
};

pub const RECORD_NAME: FieldRule<String> = FieldRule {
    chain: Chain {
        field: "matchedProductName",
        paths: &["matchedProductName", "name", "matched_product_name", "product_name"],
    },
    default: default_activity_name,
};

pub const RECORD_CITY: Chain = Chain {
    field: "matchedCity",
    paths: &["matchedCity", "city", "matched_city", "location"],
};

pub const RECORD_LIFESTYLE_ID: Chain = Chain {
    field: "lifestyleId",
    paths: &[
        "lifestyleId",
        "activity_id",
        "lifestyle_id",
        "matched_lifestyle_id",
        "id",
    ],
};

pub const RECORD_RANK: Chain = Chain {
    field: "rank",
    paths: &["rank", "priority"],
};

pub const RECORD_REGION: Chain = Chain {
    field: "region",
    paths: &["region", "matched_region"],
};

// ---------------------------------------------------------------------------
// Hotels
// ---------------------------------------------------------------------------

pub const HOTEL_NAME: FieldRule<String> = FieldRule {
    chain: Chain {
        field: "name",
        paths: &["name", "hotel_name"],
    },
    default: default_hotel_name,
};

pub const HOTEL_STARS: Chain = Chain {
    field: "starClassification",
    paths: &["starClassification", "stars", "star_classification"],
};

pub const HOTEL_LATITUDE: Chain = Chain {
    field: "latitude",
    paths: &["lat", "latitude"],
};

pub const HOTEL_LONGITUDE: Chain = Chain {
    field: "longitude",
    paths: &["lng", "longitude"],
};

pub const HOTEL_CITY: Chain = Chain {
    field: "city",
    paths: &["city", "hotel_city"],
};

pub const HOTEL_IMAGE: Chain = Chain {
    field: "image",
    paths: &["hotel_image", "image", "images"],
};

pub const HOTEL_ROOM_TYPE: Chain = Chain {
    field: "roomType",
    paths: &["roomType", "room_type"],
};

pub const HOTEL_CHECK_IN: Chain = Chain {
    field: "checkIn",
    paths: &["checkIn", "check_in", "check_in_time"],
};

pub const HOTEL_CHECK_OUT: Chain = Chain {
    field: "checkOut",
    paths: &["checkOut", "check_out", "check_out_time"],
};

pub const HOTEL_NIGHTS: Chain = Chain {
    field: "nights",
    paths: &["nights", "total_nights"],
};
