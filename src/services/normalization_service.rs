//! Itinerary Normalization Service
//!
//! Turns one raw webhook response into a [`CanonicalItinerary`]. The upstream
//! generator changes field names and nesting between releases; this module
//! absorbs those differences so the rest of the application reads a single
//! shape.
//!
//! ## Pipeline
//! 1. Envelope unwrap: a top-level array contributes its first element.
//! 2. Field reconciliation through the tables in `itinerary_fields`.
//! 3. Shape coercion: match rate, verification variant, hotel stays, images.
//! 4. Assembly into an owned snapshot.
//!
//! Normalization is pure and deterministic. The only failure is a payload
//! that is not a JSON object; every other irregularity degrades to a default.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::{debug, warn};
use serde_json::Value;

use crate::models::activity::{Activity, ActivityKind, ActivityRecord, ActivityTime};
use crate::models::hotel::{hotel_key, Hotel};
use crate::models::itinerary::{
    CanonicalItinerary, Day, MatchingSummary, Meals, Percentage, TravelTime,
};
use crate::models::location::{Coordinates, Region};
use crate::services::field_resolver::{string_list, FromJson};
use crate::services::hotel_stay_service::HotelStays;
use crate::services::image_service::first_image_url;
use crate::services::itinerary_fields as fields;
use crate::services::verification_service;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("itinerary response is not a JSON document (found {found})")]
    NotADocument { found: &'static str },
}

/// Normalize a raw webhook response into the canonical itinerary.
pub fn normalize(raw: &Value) -> Result<CanonicalItinerary, NormalizeError> {
    let doc = unwrap_envelope(raw)?;

    let products = normalize_products(doc);
    let days = normalize_days(doc, &products);
    let stays = HotelStays::from_days(&days);
    let hotels: Vec<Hotel> = fields::HOTEL_LIST
        .array(doc)
        .unwrap_or_default()
        .iter()
        .filter(|entry| entry.is_object())
        .map(|entry| normalize_hotel(entry, &stays))
        .collect();

    let matching_summary = fields::MATCH_RATE
        .first::<Percentage>(doc)
        .map(|rate| MatchingSummary { match_rate: rate.0 })
        .unwrap_or_default();
    let (verification, quality_verification) =
        verification_service::reconcile(doc, &matching_summary);

    let total_days = if days.is_empty() {
        fields::DECLARED_TOTAL_DAYS.first(doc).unwrap_or(0)
    } else {
        count(days.len())
    };
    let total_activities = fields::DECLARED_TOTAL_ACTIVITIES
        .first(doc)
        .unwrap_or_else(|| {
            if products.is_empty() {
                count(days.iter().map(|day| day.activities.len()).sum())
            } else {
                count(products.len())
            }
        });

    debug!(
        "Normalized itinerary: {} days, {} products, {} hotels",
        days.len(),
        products.len(),
        hotels.len()
    );

    Ok(CanonicalItinerary {
        trip_title: fields::TRIP_TITLE.resolve(doc),
        start_date: fields::START_DATE.resolve(doc),
        end_date: fields::END_DATE.resolve(doc),
        total_days,
        total_activities,
        adults: fields::ADULTS.resolve(doc).0,
        children: fields::CHILDREN.resolve(doc).0,
        days,
        products,
        hotels,
        tips: string_list(fields::TIPS.value(doc)),
        regions: normalize_regions(doc),
        route_plan: normalize_route_plan(doc),
        verification,
        quality_verification,
        matching_summary,
        travel_times: normalize_travel_times(doc),
    })
}

fn unwrap_envelope(raw: &Value) -> Result<&Value, NormalizeError> {
    let doc = match raw {
        Value::Array(items) => items.first(),
        other => Some(other),
    };

    match doc {
        Some(doc) if doc.is_object() => Ok(doc),
        Some(other) => Err(NormalizeError::NotADocument {
            found: json_kind(other),
        }),
        None => Err(NormalizeError::NotADocument {
            found: "empty array",
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn normalize_products(doc: &Value) -> Vec<ActivityRecord> {
    fields::PRODUCT_LIST
        .array(doc)
        .unwrap_or_default()
        .iter()
        .filter(|entry| entry.is_object())
        .enumerate()
        .map(|(index, entry)| ActivityRecord {
            day: fields::RECORD_DAY.first(entry),
            time: fields::ACTIVITY_TIME.resolve(entry),
            coordinates: fields::RECORD_COORDINATES.first(entry),
            matched_coordinates: fields::RECORD_MATCHED_COORDINATES.first(entry),
            matched_product_name: fields::RECORD_NAME.resolve(entry),
            matched_city: fields::RECORD_CITY.first(entry),
            lifestyle_id: fields::RECORD_LIFESTYLE_ID.first(entry),
            image: fields::ACTIVITY_IMAGE.find_map(entry, first_image_url),
            score: fields::ACTIVITY_SCORE.first(entry),
            rank: fields::RECORD_RANK
                .first(entry)
                .unwrap_or_else(|| count(index + 1)),
            region: fields::RECORD_REGION.first(entry),
            duration_hours: fields::ACTIVITY_DURATION.first(entry),
        })
        .collect()
}

fn normalize_days(doc: &Value, products: &[ActivityRecord]) -> Vec<Day> {
    let entries: Vec<(usize, Option<u32>, &Value)> = fields::DAY_LIST
        .array(doc)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.is_object())
        .map(|(index, entry)| {
            let number = fields::DAY_NUMBER
                .first::<u32>(entry)
                .filter(|number| *number > 0);
            (index, number, entry)
        })
        .collect();

    // Explicit numbers are claimed first so an unnumbered entry never displaces one
    let mut claimed = HashSet::new();
    let mut numbered: Vec<(u32, &Value)> = Vec::with_capacity(entries.len());
    for (_, number, entry) in &entries {
        if let Some(number) = *number {
            if claimed.insert(number) {
                numbered.push((number, *entry));
            } else {
                warn!("Dropping duplicate itinerary entry for day {}", number);
            }
        }
    }

    for (index, number, entry) in &entries {
        if number.is_none() {
            let assigned = (count(index + 1)..=u32::MAX)
                .find(|candidate| !claimed.contains(candidate))
                .unwrap_or(u32::MAX);
            claimed.insert(assigned);
            numbered.push((assigned, *entry));
        }
    }

    numbered.sort_by_key(|(number, _)| *number);
    numbered
        .into_iter()
        .map(|(number, entry)| normalize_day(entry, number, products))
        .collect()
}

fn normalize_day(entry: &Value, day_number: u32, products: &[ActivityRecord]) -> Day {
    let activities = fields::DAY_ACTIVITIES
        .array(entry)
        .unwrap_or_default()
        .iter()
        .filter(|activity| activity.is_object())
        .map(|activity| normalize_activity(activity, day_number, products))
        .collect();

    let hotel = fields::DAY_HOTEL
        .value(entry)
        .filter(|hotel| hotel.is_object())
        .and_then(|hotel| day_hotel(hotel, day_number));

    let meals = fields::DAY_MEALS
        .value(entry)
        .filter(|meals| meals.is_object())
        .map(|meals| Meals {
            breakfast: fields::BREAKFAST.first(meals),
            lunch: fields::LUNCH.first(meals),
            dinner: fields::DINNER.first(meals),
        });

    Day {
        day_number,
        theme: fields::DAY_THEME.resolve(entry),
        region: fields::DAY_REGION.first(entry),
        date: fields::DAY_DATE.resolve(entry),
        hotel,
        activities,
        meals,
    }
}

fn normalize_activity(entry: &Value, day_number: u32, products: &[ActivityRecord]) -> Activity {
    let upstream_name: Option<String> = fields::ACTIVITY_NAME.chain.first(entry);
    let time = fields::ACTIVITY_TIME.resolve(entry);

    let coordinates = fields::ACTIVITY_COORDINATES
        .first::<Coordinates>(entry)
        .or_else(|| match_product_coordinates(products, day_number, upstream_name.as_deref(), time));

    let name = upstream_name.unwrap_or_else(fields::ACTIVITY_NAME.default);
    let kind = fields::ACTIVITY_KIND.first(entry).unwrap_or_else(|| {
        if fields::ACTIVITY_IS_MEAL.first::<bool>(entry).unwrap_or(false) {
            ActivityKind::Meal
        } else {
            ActivityKind::classify(&name)
        }
    });

    Activity {
        time,
        duration_hours: fields::ACTIVITY_DURATION.first(entry),
        coordinates,
        score: fields::ACTIVITY_SCORE.first(entry),
        theme_match_percent: fields::ACTIVITY_THEME_MATCH.first(entry),
        location_label: fields::ACTIVITY_LOCATION.first(entry),
        image: fields::ACTIVITY_IMAGE.find_map(entry, first_image_url),
        kind,
        name,
    }
}

/// Borrow coordinates from the flat activity list for an activity that has
/// none of its own: a same-day record with the same name, else one at the
/// same scheduled time.
fn match_product_coordinates(
    products: &[ActivityRecord],
    day_number: u32,
    name: Option<&str>,
    time: ActivityTime,
) -> Option<Coordinates> {
    let candidates = || {
        products
            .iter()
            .filter(move |record| record.day == Some(day_number) && record.position().is_some())
    };

    // The placeholder name carries no identity on either side
    let by_name = name
        .filter(|name| !is_placeholder(name, fields::DEFAULT_ACTIVITY_NAME))
        .map(hotel_key)
        .and_then(|wanted| {
            candidates().find(|record| {
                !is_placeholder(&record.matched_product_name, fields::DEFAULT_ACTIVITY_NAME)
                    && hotel_key(&record.matched_product_name) == wanted
            })
        });
    let by_time = || {
        time.is_scheduled()
            .then(|| candidates().find(|record| record.time == time))
            .flatten()
    };

    by_name.or_else(by_time).and_then(ActivityRecord::position)
}

/// True for names equal to the default a missing name resolves to.
fn is_placeholder(name: &str, default: &str) -> bool {
    hotel_key(name) == hotel_key(default)
}

fn day_hotel(entry: &Value, day_number: u32) -> Option<Hotel> {
    let name: String = fields::HOTEL_NAME.chain.first(entry)?;

    Some(Hotel {
        name,
        star_classification: fields::HOTEL_STARS.first(entry),
        latitude: fields::HOTEL_LATITUDE.first(entry),
        longitude: fields::HOTEL_LONGITUDE.first(entry),
        city: fields::HOTEL_CITY.first(entry),
        image: fields::HOTEL_IMAGE.find_map(entry, first_image_url),
        room_type: fields::HOTEL_ROOM_TYPE.first(entry),
        check_in: fields::HOTEL_CHECK_IN.first(entry).unwrap_or_default(),
        check_out: fields::HOTEL_CHECK_OUT.first(entry).unwrap_or_default(),
        nights: fields::HOTEL_NIGHTS.first(entry).unwrap_or(1),
        occupied_days: BTreeSet::from([day_number]),
    })
}

fn normalize_hotel(entry: &Value, stays: &HotelStays) -> Hotel {
    let name = fields::HOTEL_NAME.resolve(entry);
    let stay = fields::HOTEL_NAME
        .chain
        .first::<String>(entry)
        .filter(|upstream_name| !is_placeholder(upstream_name, fields::DEFAULT_HOTEL_NAME))
        .and_then(|upstream_name| stays.stay_for(&upstream_name));

    Hotel {
        star_classification: fields::HOTEL_STARS.first(entry),
        latitude: fields::HOTEL_LATITUDE.first(entry),
        longitude: fields::HOTEL_LONGITUDE.first(entry),
        city: fields::HOTEL_CITY.first(entry),
        image: fields::HOTEL_IMAGE.find_map(entry, first_image_url),
        room_type: fields::HOTEL_ROOM_TYPE.first(entry),
        check_in: fields::HOTEL_CHECK_IN
            .first(entry)
            .or_else(|| stay.map(|s| s.check_in.clone()))
            .unwrap_or_default(),
        check_out: fields::HOTEL_CHECK_OUT
            .first(entry)
            .or_else(|| stay.map(|s| s.check_out.clone()))
            .unwrap_or_default(),
        nights: fields::HOTEL_NIGHTS
            .first::<u32>(entry)
            .filter(|nights| *nights > 0)
            .or_else(|| stay.map(|s| s.nights))
            .unwrap_or(1),
        occupied_days: stay.map(|s| s.days.clone()).unwrap_or_default(),
        name,
    }
}

fn normalize_regions(doc: &Value) -> BTreeMap<String, Region> {
    fields::REGIONS
        .object(doc)
        .map(|regions| {
            regions
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key.clone(), Region::from_entry(key, value)))
                .collect()
        })
        .unwrap_or_default()
}

fn normalize_route_plan(doc: &Value) -> Vec<String> {
    fields::ROUTE_PLAN
        .array(doc)
        .unwrap_or_default()
        .iter()
        .filter_map(String::from_json)
        .collect()
}

fn normalize_travel_times(doc: &Value) -> Vec<TravelTime> {
    fields::TRAVEL_TIMES
        .array(doc)
        .unwrap_or_default()
        .iter()
        .filter_map(|leg| {
            Some(TravelTime {
                from: fields::TRAVEL_FROM.first(leg)?,
                to: fields::TRAVEL_TO.first(leg)?,
                duration: fields::TRAVEL_DURATION.first(leg).unwrap_or_default(),
            })
        })
        .collect()
}
