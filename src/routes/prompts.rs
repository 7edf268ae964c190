use actix_web::{HttpResponse, Responder};

use crate::models::generation::ExamplePrompt;

pub const EXAMPLE_PROMPTS: [ExamplePrompt; 5] = [
    ExamplePrompt {
        emoji: "🛕",
        label: "Religious Tour",
        prompt: "3 day Kandy religious temple tour",
    },
    ExamplePrompt {
        emoji: "🦁",
        label: "Wildlife Safari",
        prompt: "5 day cultural triangle with wildlife safari",
    },
    ExamplePrompt {
        emoji: "🏖️",
        label: "Beach Vacation",
        prompt: "4 day beach vacation in Mirissa and Galle",
    },
    ExamplePrompt {
        emoji: "🗺️",
        label: "Round Trip",
        prompt: "7 day Sri Lanka round trip, avoid adventure sports",
    },
    ExamplePrompt {
        emoji: "🚂",
        label: "Tea & Train",
        prompt: "3 day Ella tea estates and scenic train ride",
    },
];

/*
    /api/prompts
*/
pub async fn get_prompts() -> impl Responder {
    HttpResponse::Ok().json(EXAMPLE_PROMPTS)
}
