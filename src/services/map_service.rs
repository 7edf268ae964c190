//! Map Service
//!
//! Builds everything the trip map needs from a canonical itinerary: activity
//! pins colored by day, hotel pins, one route polyline per day, and the
//! bounding box to frame them.
//!
//! ## Features
//! - Stable day colors from a 7-color palette that wraps around
//! - Routes ordered by day and then by scheduled time, unscheduled stops last
//! - Falls back to day activities when the flat activity list is empty
//! - Default center over Sri Lanka when nothing has coordinates

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::activity::{ActivityRecord, ActivityTime};
use crate::models::hotel::Hotel;
use crate::models::itinerary::CanonicalItinerary;
use crate::models::location::Coordinates;

pub const DAY_COLORS: [&str; 7] = [
    "#6366f1", "#06b6d4", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899",
];

/// Pin color for records with no day assignment.
pub const UNASSIGNED_COLOR: &str = "#64748b";
pub const SELECTED_HOTEL_COLOR: &str = "#10b981";
pub const HOTEL_COLOR: &str = "#8b5cf6";

pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 7.8731,
    lng: 80.7718,
};

/// Color token for a day. Day 1 takes the first palette entry and day 8
/// wraps back to it.
pub fn day_color(day_number: u32) -> &'static str {
    let index = (i64::from(day_number) - 1).rem_euclid(DAY_COLORS.len() as i64);
    DAY_COLORS[index as usize]
}

/// Formats a 0..1 similarity score as a percentage with one decimal.
pub fn format_match_score(score: Option<f64>) -> String {
    match score.filter(|s| s.is_finite()) {
        Some(score) => format!("{:.1}%", score * 100.0),
        None => "N/A".to_string(),
    }
}

/// Coordinates of the `index`-th activity of a day.
pub fn locate_activity(
    itinerary: &CanonicalItinerary,
    day_number: u32,
    index: usize,
) -> Option<Coordinates> {
    itinerary
        .day(day_number)?
        .activities
        .get(index)?
        .coordinates
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub day: Option<u32>,
    pub time: ActivityTime,
    pub name: String,
    pub position: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRoute {
    pub day: u32,
    pub color: &'static str,
    pub path: Vec<Coordinates>,
}

/// Every located stop of the trip in visiting order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MapRoute {
    pub stops: Vec<RouteStop>,
}

impl MapRoute {
    pub fn from_products(products: &[ActivityRecord]) -> Self {
        let stops = products
            .iter()
            .filter_map(|record| {
                Some(RouteStop {
                    day: record.day,
                    time: record.time,
                    name: record.matched_product_name.clone(),
                    position: record.position()?,
                })
            })
            .collect();
        Self::ordered(stops)
    }

    /// Stops taken from each day's own activities.
    pub fn from_days(itinerary: &CanonicalItinerary) -> Self {
        let stops = itinerary
            .days
            .iter()
            .flat_map(|day| {
                day.activities.iter().filter_map(move |activity| {
                    Some(RouteStop {
                        day: Some(day.day_number),
                        time: activity.time,
                        name: activity.name.clone(),
                        position: activity.coordinates?,
                    })
                })
            })
            .collect();
        Self::ordered(stops)
    }

    /// Flat activity list when there is one, else the day activities.
    pub fn for_itinerary(itinerary: &CanonicalItinerary) -> Self {
        if itinerary.products.is_empty() {
            Self::from_days(itinerary)
        } else {
            Self::from_products(&itinerary.products)
        }
    }

    fn ordered(mut stops: Vec<RouteStop>) -> Self {
        stops.sort_by_key(|stop| (stop.day.unwrap_or(u32::MAX), stop.time));
        Self { stops }
    }

    /// One polyline per assigned day, in day order.
    pub fn day_routes(&self) -> Vec<DayRoute> {
        let mut by_day: BTreeMap<u32, Vec<Coordinates>> = BTreeMap::new();
        for stop in &self.stops {
            if let Some(day) = stop.day {
                by_day.entry(day).or_default().push(stop.position);
            }
        }

        by_day
            .into_iter()
            .map(|(day, path)| DayRoute {
                day,
                color: day_color(day),
                path,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
    pub center: Coordinates,
}

impl MapBounds {
    fn around(point: Coordinates) -> Self {
        Self {
            south_west: point,
            north_east: point,
            center: point,
        }
    }
}

/// Box around every route stop and hotel position, or the default center.
/// Route stops come from the flat activity list, else from the day activities.
pub fn map_bounds(itinerary: &CanonicalItinerary) -> MapBounds {
    bounds_of(&MapRoute::for_itinerary(itinerary), &itinerary.hotels)
}

fn bounds_of(route: &MapRoute, hotels: &[Hotel]) -> MapBounds {
    let points = route
        .stops
        .iter()
        .map(|stop| stop.position)
        .chain(hotels.iter().filter_map(Hotel::coordinates));

    let mut bounds: Option<(Coordinates, Coordinates)> = None;
    for point in points {
        bounds = Some(match bounds {
            None => (point, point),
            Some((sw, ne)) => (
                Coordinates {
                    lat: sw.lat.min(point.lat),
                    lng: sw.lng.min(point.lng),
                },
                Coordinates {
                    lat: ne.lat.max(point.lat),
                    lng: ne.lng.max(point.lng),
                },
            ),
        });
    }

    match bounds {
        Some((south_west, north_east)) => MapBounds {
            south_west,
            north_east,
            center: Coordinates {
                lat: (south_west.lat + north_east.lat) / 2.0,
                lng: (south_west.lng + north_east.lng) / 2.0,
            },
        },
        None => MapBounds::around(DEFAULT_CENTER),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPin {
    pub day: Option<u32>,
    pub label: String,
    pub position: Coordinates,
    pub color: &'static str,
    pub match_score: String,
    pub city: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelPin {
    pub name: String,
    pub position: Coordinates,
    pub color: &'static str,
    pub selected: bool,
    pub nights: u32,
    pub star_classification: Option<String>,
}

/// Everything the map view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub bounds: MapBounds,
    pub activities: Vec<ActivityPin>,
    pub hotels: Vec<HotelPin>,
    pub routes: Vec<DayRoute>,
}

impl MapView {
    pub fn build(itinerary: &CanonicalItinerary) -> Self {
        let activities = itinerary
            .products
            .iter()
            .filter_map(|record| {
                Some(ActivityPin {
                    day: record.day,
                    label: record.matched_product_name.clone(),
                    position: record.position()?,
                    color: record.day.map_or(UNASSIGNED_COLOR, day_color),
                    match_score: format_match_score(record.score),
                    city: record.matched_city.clone(),
                    image: record.image.clone(),
                })
            })
            .collect();

        let hotels = itinerary
            .hotels
            .iter()
            .filter_map(|hotel| {
                let selected = !hotel.occupied_days.is_empty();
                Some(HotelPin {
                    name: hotel.name.clone(),
                    position: hotel.coordinates()?,
                    color: if selected {
                        SELECTED_HOTEL_COLOR
                    } else {
                        HOTEL_COLOR
                    },
                    selected,
                    nights: hotel.nights,
                    star_classification: hotel.star_classification.clone(),
                })
            })
            .collect();

        let route = MapRoute::for_itinerary(itinerary);
        Self {
            bounds: bounds_of(&route, &itinerary.hotels),
            activities,
            hotels,
            routes: route.day_routes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::normalization_service::normalize;
    use serde_json::json;

    fn itinerary(raw: serde_json::Value) -> CanonicalItinerary {
        normalize(&raw).expect("normalizes")
    }

    #[test]
    fn test_day_colors_cycle() {
        assert_eq!(day_color(1), day_color(8));
        assert_eq!(day_color(1), "#6366f1");
        assert_eq!(day_color(7), "#ec4899");
        assert_eq!(day_color(3), day_color(3));
        assert_eq!(day_color(0), "#ec4899");
    }

    #[test]
    fn test_format_match_score() {
        assert_eq!(format_match_score(Some(0.875)), "87.5%");
        assert_eq!(format_match_score(Some(1.0)), "100.0%");
        assert_eq!(format_match_score(None), "N/A");
    }

    #[test]
    fn test_bounds_cover_products_and_hotels() {
        let trip = itinerary(json!({
            "products": [
                {"day": 1, "name": "A", "lat": 7.0, "lng": 80.0},
                {"day": 2, "name": "B", "lat": "N/A", "lng": 81.5}
            ],
            "hotels": [{"name": "H", "lat": 8.0, "lng": 81.0}]
        }));

        let bounds = map_bounds(&trip);
        assert_eq!(bounds.south_west, Coordinates { lat: 7.0, lng: 80.0 });
        assert_eq!(bounds.north_east, Coordinates { lat: 8.0, lng: 81.0 });
        assert_eq!(bounds.center, Coordinates { lat: 7.5, lng: 80.5 });
    }

    #[test]
    fn test_bounds_default_to_center() {
        let bounds = map_bounds(&itinerary(json!({})));
        assert_eq!(bounds.center, DEFAULT_CENTER);
        assert_eq!(bounds.south_west, DEFAULT_CENTER);
    }

    #[test]
    fn test_bounds_cover_day_activities_without_products() {
        let trip = itinerary(json!({
            "days": [
                {"day": 1, "activities": [{"name": "Galle Fort", "lat": 6.03, "lng": 80.21}]},
                {"day": 2, "activities": [{"name": "Sigiriya", "lat": 7.95, "lng": 80.76}]}
            ]
        }));

        let bounds = map_bounds(&trip);
        assert_eq!(bounds.south_west, Coordinates { lat: 6.03, lng: 80.21 });
        assert_eq!(bounds.north_east, Coordinates { lat: 7.95, lng: 80.76 });
        assert_eq!(MapView::build(&trip).bounds, bounds);
    }

    #[test]
    fn test_routes_are_ordered_by_day_then_time() {
        let trip = itinerary(json!({
            "products": [
                {"day": 2, "name": "Late", "time": "15:00", "lat": 2.0, "lng": 2.0},
                {"day": 1, "name": "Unscheduled", "lat": 1.5, "lng": 1.5},
                {"day": 2, "name": "Early", "time": "08:00", "lat": 3.0, "lng": 3.0},
                {"day": 1, "name": "Morning", "time": "09:00", "lat": 1.0, "lng": 1.0},
                {"name": "Floating", "lat": 9.0, "lng": 9.0},
                {"day": 1, "name": "Nowhere", "time": "07:00"}
            ]
        }));

        let route = MapRoute::from_products(&trip.products);
        let names: Vec<&str> = route.stops.iter().map(|stop| stop.name.as_str()).collect();
        assert_eq!(names, vec!["Morning", "Unscheduled", "Early", "Late", "Floating"]);

        let days = route.day_routes();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[0].color, "#6366f1");
        assert_eq!(days[1].path[0], Coordinates { lat: 3.0, lng: 3.0 });
    }

    #[test]
    fn test_routes_fall_back_to_day_activities() {
        let trip = itinerary(json!({
            "days": [{"day": 1, "activities": [
                {"name": "B", "time": "11:00", "lat": 2.0, "lng": 2.0},
                {"name": "A", "time": "09:00", "lat": 1.0, "lng": 1.0}
            ]}]
        }));

        let routes = MapRoute::for_itinerary(&trip).day_routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path[0], Coordinates { lat: 1.0, lng: 1.0 });
    }

    #[test]
    fn test_locate_activity_by_number_then_position() {
        let trip = itinerary(json!({
            "days": [{"day": 3, "activities": [{"name": "A", "lat": 6.0, "lng": 80.0}]}]
        }));

        assert_eq!(locate_activity(&trip, 3, 0), Coordinates::new(6.0, 80.0));
        assert_eq!(locate_activity(&trip, 1, 0), Coordinates::new(6.0, 80.0));
        assert_eq!(locate_activity(&trip, 3, 5), None);
        assert_eq!(locate_activity(&trip, 9, 0), None);
    }

    #[test]
    fn test_map_view_pins() {
        let trip = itinerary(json!({
            "days": [{"day": 1, "hotel": {"name": "Cinnamon Lodge"}}],
            "products": [
                {"day": 2, "name": "Safari", "lat": 6.3, "lng": 81.5, "match_score": 0.9},
                {"name": "Spare", "lat": 6.0, "lng": 80.0}
            ],
            "hotels": [
                {"name": "Cinnamon Lodge", "lat": 7.9, "lng": 80.6},
                {"name": "Jetwing", "lat": 7.1, "lng": 79.9},
                {"name": "No Coordinates"}
            ]
        }));

        let view = MapView::build(&trip);

        assert_eq!(view.activities.len(), 2);
        assert_eq!(view.activities[0].color, day_color(2));
        assert_eq!(view.activities[0].match_score, "90.0%");
        assert_eq!(view.activities[1].color, UNASSIGNED_COLOR);

        assert_eq!(view.hotels.len(), 2);
        assert!(view.hotels[0].selected);
        assert_eq!(view.hotels[0].color, SELECTED_HOTEL_COLOR);
        assert!(!view.hotels[1].selected);
        assert_eq!(view.hotels[1].color, HOTEL_COLOR);

        assert_eq!(view.routes.len(), 1);
        assert_eq!(view.routes[0].day, 2);
    }
}
