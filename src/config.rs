use std::env;
use std::time::Duration;

use url::Url;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://aahaas-ai.app.n8n.cloud/webhook/travel-itinerary1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid webhook URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("webhook URL '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebhookConfig {
    pub url: Url,
    /// Applies to each attempt separately.
    pub timeout: Duration,
    pub max_retries: u32,
}

impl WebhookConfig {
    pub fn new(url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            url: parse_webhook_url(url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// Reads `HOST`, `PORT`, `RUST_ENV`, `ITINERARY_WEBHOOK_URL`,
    /// `WEBHOOK_TIMEOUT_SECS` and `WEBHOOK_MAX_RETRIES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let environment =
            env::var("RUST_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());

        let url = env::var("ITINERARY_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string());

        let webhook = WebhookConfig {
            url: parse_webhook_url(&url)?,
            timeout: Duration::from_secs(numeric_var("WEBHOOK_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?),
            max_retries: numeric_var("WEBHOOK_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
        };

        Ok(Self {
            host,
            port,
            environment,
            webhook,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_webhook_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(value.to_string())),
    }
}

fn numeric_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(default),
    }
}
