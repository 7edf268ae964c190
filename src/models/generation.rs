use serde::{Deserialize, Serialize};

/// Body of `POST /api/itineraries/generate`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Body posted to the itinerary webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    #[serde(rename = "chatInput")]
    pub chat_input: &'a str,
}

/// A canned request offered to users who do not know what to ask for.
#[derive(Debug, Serialize, Clone, Copy)]
pub struct ExamplePrompt {
    pub emoji: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}
