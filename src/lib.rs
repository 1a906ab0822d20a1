//! `travel-planner` - aggregated travel itinerary planning
//!
//! This library queries flight, hotel and weather providers for a travel
//! request and turns the combined data into a day-by-day itinerary through a
//! chat-completion service, falling back to the raw provider data when no
//! generation service is configured.

pub mod config;
pub mod error;
pub mod generation;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod planner;
pub mod validation;

// Re-export core types for public API
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use generation::{ChatClient, GenerationError, ItineraryGenerator, OpenAiChatClient};
pub use lookup::{FlightClient, HotelClient, Lookup, LookupError, Provider, WeatherClient};
pub use models::{AggregatedContext, DayPlan, Itinerary, TravelPlan, TravelRequest};
pub use planner::{Generation, TravelPlanner, write_plan};
pub use validation::{REQUIRED_FIELDS, validate_request};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
