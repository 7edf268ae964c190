use std::collections::{BTreeSet, HashMap};

use crate::models::hotel::hotel_key;
use crate::models::itinerary::Day;

/// What the day list says about one hotel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HotelStay {
    /// Check-in of the first day naming the hotel.
    pub check_in: String,
    /// Check-out of the last day naming the hotel.
    pub check_out: String,
    pub nights: u32,
    pub days: BTreeSet<u32>,
}

/// Stays keyed by lowercase, trimmed hotel name.
#[derive(Debug, Clone, Default)]
pub struct HotelStays {
    stays: HashMap<String, HotelStay>,
}

impl HotelStays {
    /// Aggregate day-level hotel associations. `days` must already be in
    /// ascending day order so that the last check-out wins.
    pub fn from_days(days: &[Day]) -> Self {
        let mut stays: HashMap<String, HotelStay> = HashMap::new();

        for day in days {
            let Some(hotel) = &day.hotel else {
                continue;
            };
            let key = hotel_key(&hotel.name);
            if key.is_empty() {
                continue;
            }

            let stay = stays.entry(key).or_insert_with(|| HotelStay {
                check_in: hotel.check_in.clone(),
                ..HotelStay::default()
            });
            stay.nights += 1;
            stay.days.insert(day.day_number);
            stay.check_out = hotel.check_out.clone();
        }

        Self { stays }
    }

    pub fn stay_for(&self, hotel_name: &str) -> Option<&HotelStay> {
        self.stays.get(&hotel_key(hotel_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hotel::Hotel;

    fn day_with_hotel(day_number: u32, name: &str, check_in: &str, check_out: &str) -> Day {
        Day {
            day_number,
            theme: "Exploration".into(),
            region: None,
            date: String::new(),
            hotel: Some(Hotel {
                name: name.into(),
                star_classification: None,
                latitude: None,
                longitude: None,
                city: None,
                image: None,
                room_type: None,
                check_in: check_in.into(),
                check_out: check_out.into(),
                nights: 1,
                occupied_days: BTreeSet::from([day_number]),
            }),
            activities: Vec::new(),
            meals: None,
        }
    }

    #[test]
    fn test_consecutive_nights_aggregate_with_last_checkout() {
        let days = vec![
            day_with_hotel(1, "X", "14:00", "11:00"),
            day_with_hotel(2, "X", "15:00", "12:00"),
        ];
        let stays = HotelStays::from_days(&days);
        let stay = stays.stay_for("X").expect("stay for X");

        assert_eq!(stay.nights, 2);
        assert_eq!(stay.days, BTreeSet::from([1, 2]));
        assert_eq!(stay.check_in, "14:00");
        assert_eq!(stay.check_out, "12:00");
    }

    #[test]
    fn test_names_match_case_insensitively_after_trimming() {
        let days = vec![
            day_with_hotel(1, "Cinnamon Lodge", "", ""),
            day_with_hotel(2, "  cinnamon lodge ", "", ""),
        ];
        let stays = HotelStays::from_days(&days);

        assert_eq!(stays.stay_for("CINNAMON LODGE").map(|s| s.nights), Some(2));
        assert_eq!(stays.stay_for(" cinnamon lodge").map(|s| s.nights), Some(2));
    }

    #[test]
    fn test_non_contiguous_days_are_still_grouped() {
        let days = vec![
            day_with_hotel(1, "X", "", "10:00"),
            day_with_hotel(2, "Y", "", ""),
            day_with_hotel(3, "X", "", "11:30"),
        ];
        let stays = HotelStays::from_days(&days);
        let stay = stays.stay_for("x").expect("stay for X");

        assert_eq!(stay.days, BTreeSet::from([1, 3]));
        assert_eq!(stay.check_out, "11:30");
    }

    #[test]
    fn test_days_without_hotels_contribute_nothing() {
        let mut day = day_with_hotel(1, "X", "", "");
        day.hotel = None;
        assert_eq!(HotelStays::from_days(&[day]).stay_for("X"), None);
    }
}
