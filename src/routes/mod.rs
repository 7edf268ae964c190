use actix_web::web;

pub mod health;
pub mod itinerary;
pub mod prompts;

/// Request bodies above this size are rejected before normalization.
pub const JSON_LIMIT_BYTES: usize = 4 * 1024 * 1024;

/// Registers every route. Expects `web::Data<AppConfig>` and
/// `web::Data<WebhookClient>` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT_BYTES))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/prompts", web::get().to(prompts::get_prompts))
                .service(
                    web::scope("/itineraries")
                        .route("/generate", web::post().to(itinerary::generate))
                        .route("/normalize", web::post().to(itinerary::normalize_document))
                        .route("/map", web::post().to(itinerary::map_view)),
                ),
        );
}
