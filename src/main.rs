use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use trip_planner_api::config::AppConfig;
use trip_planner_api::routes;
use trip_planner_api::services::webhook_service::WebhookClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|err| {
        error!("Invalid configuration: {}", err);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    })?;

    let client = WebhookClient::new(&config.webhook).map_err(|err| {
        error!("Unable to build webhook client: {}", err);
        std::io::Error::new(std::io::ErrorKind::Other, err)
    })?;
    let client = web::Data::new(client);
    let shared_config = web::Data::new(config.clone());

    info!(
        "Starting server on {}:{} ({}), webhook {}",
        config.host, config.port, config.environment, config.webhook.url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(shared_config.clone())
            .app_data(client.clone())
            .configure(routes::configure)
    })
    .bind(config.bind_address())?
    .run()
    .await
}
