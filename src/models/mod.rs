pub mod activity;
pub mod generation;
pub mod hotel;
pub mod itinerary;
pub mod location;
pub mod verification;
