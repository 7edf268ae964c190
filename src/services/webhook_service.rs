use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::WebhookConfig;
use crate::models::generation::WebhookPayload;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook responded with status {status}")]
    Status { status: StatusCode, body: String },
    #[error("webhook response is not valid JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),
}

impl WebhookError {
    /// Transport failures and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            WebhookError::Transport(_) => true,
            WebhookError::Status { status, .. } => status.is_server_error(),
            WebhookError::InvalidBody(_) => false,
        }
    }
}

/// Client for the itinerary-generation webhook.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http_client: Client,
    url: Url,
    max_retries: u32,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig) -> Result<Self, WebhookError> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
            max_retries: config.max_retries,
        })
    }

    /// Sends the prompt and returns the raw, unnormalized response document.
    pub async fn generate(&self, prompt: &str) -> Result<Value, WebhookError> {
        let mut attempt = 0;
        loop {
            match self.send(prompt).await {
                Ok(document) => return Ok(document),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Webhook attempt {} failed ({}), retrying",
                        attempt, err
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send(&self, prompt: &str) -> Result<Value, WebhookError> {
        let response = self
            .http_client
            .post(self.url.clone())
            .json(&WebhookPayload { chat_input: prompt })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Webhook responded with {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(WebhookError::Status { status, body });
        }

        serde_json::from_str(&body).map_err(WebhookError::InvalidBody)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(code: u16) -> WebhookError {
        WebhookError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: String::new(),
        }
    }

    #[test]
    fn test_server_errors_are_retryable() {
        assert!(status_error(500).is_retryable());
        assert!(status_error(503).is_retryable());
    }

    #[test]
    fn test_client_errors_and_bad_bodies_are_final() {
        assert!(!status_error(400).is_retryable());
        assert!(!status_error(404).is_retryable());

        let parse_error = serde_json::from_str::<Value>("<html>").unwrap_err();
        assert!(!WebhookError::InvalidBody(parse_error).is_retryable());
    }
}
