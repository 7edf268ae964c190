use log::{error, info};
use uuid::Uuid;

use crate::models::itinerary::CanonicalItinerary;
use crate::services::normalization_service::{normalize, NormalizeError};
use crate::services::webhook_service::{WebhookClient, WebhookError};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error(transparent)]
    Webhook(#[from] WebhookError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Ask the webhook for an itinerary and normalize whatever comes back.
pub async fn generate_itinerary(
    client: &WebhookClient,
    prompt: &str,
) -> Result<CanonicalItinerary, GenerationError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(GenerationError::EmptyPrompt);
    }

    let request_id = Uuid::new_v4();
    info!("[{}] Generating itinerary for prompt: {}", request_id, prompt);

    let raw = client.generate(prompt).await.map_err(|err| {
        error!("[{}] Webhook call failed: {}", request_id, err);
        err
    })?;

    let itinerary = normalize(&raw).map_err(|err| {
        error!("[{}] Unusable webhook response: {}", request_id, err);
        err
    })?;

    info!(
        "[{}] Generated \"{}\" with {} days",
        request_id,
        itinerary.trip_title,
        itinerary.days.len()
    );
    Ok(itinerary)
}
