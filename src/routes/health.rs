use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use url::Url;

use crate::config::AppConfig;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(config: web::Data<AppConfig>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // Calling the webhook would start a generation, so only the target is reported
    let webhook = check_webhook(&config.webhook.url);
    if webhook.status != "ok" {
        health.status = "degraded".to_string();
    }
    health.services.insert("webhook".to_string(), webhook);

    HttpResponse::Ok().json(health)
}

fn check_webhook(url: &Url) -> ServiceStatus {
    match url.host_str() {
        Some(host) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Configured for {}", host)),
        },
        None => ServiceStatus {
            status: "error".to_string(),
            details: Some("Webhook URL has no host".to_string()),
        },
    }
}
