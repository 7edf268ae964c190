#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};

use trip_planner_api::config::{AppConfig, WebhookConfig};
use trip_planner_api::routes;
use trip_planner_api::services::webhook_service::WebhookClient;

/// Nothing listens here; routes that never call the webhook use it.
pub const UNREACHABLE_WEBHOOK: &str = "http://127.0.0.1:9/webhook";

pub const TEST_ENVIRONMENT: &str = "test";

pub struct TestApp {
    pub config: AppConfig,
    pub client: WebhookClient,
}

impl TestApp {
    pub fn new(webhook_url: &str) -> Self {
        Self::with_config(webhook_config(webhook_url))
    }

    pub fn offline() -> Self {
        Self::new(UNREACHABLE_WEBHOOK)
    }

    pub fn with_config(config: WebhookConfig) -> Self {
        let client = WebhookClient::new(&config).expect("webhook client builds");
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: TEST_ENVIRONMENT.to_string(),
            webhook: config,
        };
        Self { config, client }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.config.clone()))
            .app_data(web::Data::new(self.client.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    }
}

pub fn webhook_config(url: &str) -> WebhookConfig {
    let mut config = WebhookConfig::new(url).expect("valid webhook url");
    config.timeout = Duration::from_secs(5);
    config
}

/// One scripted reply of the mock webhook.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, Value),
    Raw(u16, &'static str),
    /// Sleeps before answering 200 with an empty document.
    Slow(Duration),
}

struct Script {
    replies: Mutex<VecDeque<Reply>>,
    hits: AtomicUsize,
    last_request: Mutex<Option<Value>>,
}

/// Local stand-in for the generation webhook. Replies are served in order and
/// the last one repeats.
pub struct MockWebhook {
    pub url: String,
    script: Arc<Script>,
}

impl MockWebhook {
    pub fn start(replies: Vec<Reply>) -> Self {
        let script = Arc::new(Script {
            replies: Mutex::new(replies.into()),
            hits: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        });

        let data = web::Data::from(script.clone());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/webhook", web::post().to(respond))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("mock webhook binds");

        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());

        Self {
            url: format!("http://{}/webhook", addr),
            script,
        }
    }

    pub fn hits(&self) -> usize {
        self.script.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.script.last_request.lock().unwrap().clone()
    }
}

async fn respond(script: web::Data<Script>, body: web::Json<Value>) -> HttpResponse {
    script.hits.fetch_add(1, Ordering::SeqCst);
    *script.last_request.lock().unwrap() = Some(body.into_inner());

    let reply = {
        let mut replies = script.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        }
    };

    match reply.unwrap_or(Reply::Json(200, json!({}))) {
        Reply::Json(status, document) => {
            HttpResponse::build(StatusCode::from_u16(status).unwrap()).json(document)
        }
        Reply::Raw(status, text) => HttpResponse::build(StatusCode::from_u16(status).unwrap())
            .content_type("application/json")
            .body(text),
        Reply::Slow(delay) => {
            actix_rt::time::sleep(delay).await;
            HttpResponse::Ok().json(json!({}))
        }
    }
}

/// A nested-verification response with two days sharing one hotel.
pub fn kandy_document() -> Value {
    json!({
        "itinerary_summary": {"destination": "Kandy"},
        "travel_details": {
            "travel_dates": {"start_date": "2025-03-01", "end_date": "2025-03-02"},
            "travelers": {"adults": 2, "children": 1}
        },
        "detailed_itinerary": [
            {
                "day": 1,
                "theme": "Temples",
                "hotel": {"name": "Earl's Regency", "check_in": "14:00", "check_out": "11:00"},
                "activities": [
                    {"name": "Temple of the Tooth", "time": "09:00", "lat": 7.2936, "lng": 80.6413,
                     "image": "[\"tooth.jpg\",\"relic.jpg\"]"},
                    {"name": "Lunch at Empire Cafe", "time": "13:00"}
                ]
            },
            {
                "day": 2,
                "theme": "Gardens",
                "hotel": {"name": "earl's regency", "check_out": "12:00"},
                "activities": [
                    {"name": "Peradeniya Botanical Garden", "time": "10:00"}
                ]
            }
        ],
        "all_activities_with_ids": [
            {"day_assigned": 1, "name": "Temple of the Tooth", "lat": 7.2936, "lng": 80.6413,
             "activity_id": 101, "similarity_score": 0.92},
            {"day_assigned": 2, "name": "Peradeniya Botanical Garden",
             "matched_coordinates": {"lat": 7.2690, "lng": 80.5967}, "activity_id": 102}
        ],
        "hotel_recommendations": [
            {"name": "Earl's Regency", "stars": 5, "lat": 7.2826, "lng": 80.6553}
        ],
        "matching_summary": {"match_rate": 87},
        "verification": {
            "feasibility": {"is_feasible": true, "score": 8, "warnings": ["Busy first day"]},
            "quality": {"passes_quality": true, "quality_score": 9}
        },
        "tips": ["Dress modestly at temples"]
    })
}
