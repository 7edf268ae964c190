use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde_json::{json, Value};

use crate::models::generation::GenerateRequest;
use crate::models::itinerary::ItineraryResponse;
use crate::services::itinerary_generation_service::{generate_itinerary, GenerationError};
use crate::services::map_service::MapView;
use crate::services::normalization_service::normalize;
use crate::services::webhook_service::WebhookClient;

pub const GENERATION_FAILED: &str = "Failed to generate itinerary. Please try again.";

/*
    /api/itineraries/generate
*/
pub async fn generate(
    client: web::Data<WebhookClient>,
    input: web::Json<GenerateRequest>,
) -> impl Responder {
    match generate_itinerary(&client, &input.prompt).await {
        Ok(itinerary) => HttpResponse::Ok().json(ItineraryResponse::from(itinerary)),
        Err(GenerationError::EmptyPrompt) => {
            HttpResponse::BadRequest().json(json!({ "error": "Prompt is required" }))
        }
        Err(err) => {
            error!("Itinerary generation failed: {}", err);
            HttpResponse::BadGateway().json(json!({ "error": GENERATION_FAILED }))
        }
    }
}

/*
    /api/itineraries/normalize (raw webhook document in, canonical itinerary out)
*/
pub async fn normalize_document(input: web::Json<Value>) -> impl Responder {
    match normalize(&input) {
        Ok(itinerary) => HttpResponse::Ok().json(ItineraryResponse::from(itinerary)),
        Err(err) => {
            error!("Rejected itinerary document: {}", err);
            HttpResponse::UnprocessableEntity().json(json!({ "error": err.to_string() }))
        }
    }
}

/*
    /api/itineraries/map
*/
pub async fn map_view(input: web::Json<Value>) -> impl Responder {
    match normalize(&input) {
        Ok(itinerary) => HttpResponse::Ok().json(MapView::build(&itinerary)),
        Err(err) => {
            error!("Rejected itinerary document for map view: {}", err);
            HttpResponse::UnprocessableEntity().json(json!({ "error": err.to_string() }))
        }
    }
}
