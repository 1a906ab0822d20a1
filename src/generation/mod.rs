//! Itinerary generation
//!
//! Renders the aggregated context into a prompt, sends it to a chat-style
//! generation service and decomposes the answer into day plans.

pub mod openai;
pub mod parser;

pub use openai::OpenAiChatClient;
pub use parser::structure_itinerary;

use crate::config::GenerationConfig;
use crate::models::{AggregatedContext, Itinerary, StructuredItinerary};
use async_trait::async_trait;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument};

/// System role sent with every generation request
pub const SYSTEM_PROMPT: &str = "You are a professional travel itinerary planner.";

/// Why no itinerary text came back
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Response contained no generated text")]
    EmptyResponse,
}

/// Sends a system message and a user prompt, returns the assistant's text
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError>;
}

/// Turns an aggregated context into an itinerary
pub struct ItineraryGenerator {
    client: Box<dyn ChatClient>,
}

impl ItineraryGenerator {
    pub fn new(config: &GenerationConfig, api_key: String) -> crate::Result<Self> {
        let client = OpenAiChatClient::new(config, api_key)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: impl ChatClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Generate the itinerary; failures are logged and returned
    #[instrument(skip_all, fields(destination = %context.travel_input.destination))]
    pub async fn create_itinerary(
        &self,
        context: &AggregatedContext,
    ) -> Result<Itinerary, GenerationError> {
        let prompt = build_prompt(context);
        let start_time = Instant::now();

        let raw_itinerary = self
            .client
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .inspect_err(|e| error!("LLM API Error: {}", e))?;

        let day_plans = structure_itinerary(&raw_itinerary, context.travel_input.trip_days());
        info!(
            "Generated itinerary with {} day plans in {:.3}s",
            day_plans.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(Itinerary {
            raw_itinerary,
            structured_itinerary: StructuredItinerary { day_plans },
        })
    }
}

/// Render the fixed prompt template
#[must_use]
pub fn build_prompt(context: &AggregatedContext) -> String {
    let request = &context.travel_input;
    format!(
        "Create a comprehensive travel itinerary based on the following details:

Destination: {destination}
Travel Dates: {start_date} to {end_date}
Number of Travelers: {travellers}
Travel Style: {style}
Interests: {interests}

Available Flights: {flights}
Hotel Options: {hotels}
Weather Forecast: {weather}

Please provide a detailed day-by-day itinerary with:
- Suggested daily activities
- Recommended restaurants
- Transportation details
- Estimated costs
- Time allocations
",
        destination = request.destination,
        start_date = request.start_date,
        end_date = request.end_date,
        travellers = request.num_travellers,
        style = request.travel_style,
        interests = request.interest_list().join(", "),
        flights = context.flights,
        hotels = context.hotels,
        weather = context.weather,
    )
}
