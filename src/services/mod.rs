pub mod field_resolver;
pub mod hotel_stay_service;
pub mod image_service;
pub mod itinerary_fields;
pub mod itinerary_generation_service;
pub mod map_service;
pub mod normalization_service;
pub mod verification_service;
pub mod webhook_service;
