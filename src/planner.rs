//! Travel plan orchestration
//!
//! Validates the request, queries flights, hotels and weather one after the
//! other, and either generates an itinerary or returns the raw lookups.

use crate::config::PlannerConfig;
use crate::generation::ItineraryGenerator;
use crate::lookup::{FlightClient, HotelClient, WeatherClient};
use crate::models::{AggregatedContext, TravelPlan, TravelRequest};
use crate::Result;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Whether the planner can produce itineraries
pub enum Generation {
    WithGeneration(ItineraryGenerator),
    WithoutGeneration,
}

/// Runs one planning call per request
pub struct TravelPlanner {
    flights: FlightClient,
    hotels: HotelClient,
    weather: WeatherClient,
    generation: Generation,
}

impl TravelPlanner {
    /// Build a planner; generation is enabled when a generation key is configured
    pub fn new(config: &PlannerConfig) -> Result<Self> {
        let generation = match &config.generation.api_key {
            Some(api_key) => Generation::WithGeneration(ItineraryGenerator::new(
                &config.generation,
                api_key.clone(),
            )?),
            None => Generation::WithoutGeneration,
        };
        Self::with_generation(config, generation)
    }

    /// Build a planner with an explicit generation capability
    pub fn with_generation(config: &PlannerConfig, generation: Generation) -> Result<Self> {
        Ok(Self {
            flights: FlightClient::new(&config.flights)?,
            hotels: HotelClient::new(&config.hotels)?,
            weather: WeatherClient::new(&config.weather)?,
            generation,
        })
    }

    #[must_use]
    pub fn generates_itineraries(&self) -> bool {
        matches!(self.generation, Generation::WithGeneration(_))
    }

    /// Validate a raw request document, then plan. Nothing is fetched for an invalid request.
    pub async fn plan_from_json(&self, document: &Value) -> Result<TravelPlan> {
        let request = TravelRequest::from_json(document)?;
        Ok(self.plan(request).await)
    }

    /// Plan a trip. Provider and generation failures degrade, they never fail the call.
    #[instrument(skip_all, fields(destination = %request.destination))]
    pub async fn plan(&self, request: TravelRequest) -> TravelPlan {
        let context = self.gather(request).await;

        if context.failed_lookups() > 0 {
            warn!(
                "{} of 3 lookups failed, continuing with empty data",
                context.failed_lookups()
            );
        }

        match &self.generation {
            Generation::WithGeneration(generator) => {
                let generated = generator.create_itinerary(&context).await;
                match generated {
                    Ok(itinerary) => TravelPlan::Itinerary(itinerary),
                    Err(_) => {
                        warn!("Itinerary generation failed, returning an empty plan");
                        TravelPlan::Empty {}
                    }
                }
            }
            Generation::WithoutGeneration => {
                info!("LLM API Key not set. Cannot generate detailed itinerary.");
                TravelPlan::RawData(context.into_raw())
            }
        }
    }

    /// Query the three providers in order and assemble the context
    pub async fn gather(&self, request: TravelRequest) -> AggregatedContext {
        let flights = self
            .flights
            .search_flights(
                &request.destination,
                &request.start_date,
                &request.end_date,
                &request.num_travellers,
            )
            .await;

        let hotels = self
            .hotels
            .search_hotels(
                &request.destination,
                &request.start_date,
                &request.end_date,
                &request.accommodation_preference,
            )
            .await;

        let weather = self
            .weather
            .get_forecast(&request.destination, &request.start_date, &request.end_date)
            .await;

        AggregatedContext {
            travel_input: request,
            flights,
            hotels,
            weather,
        }
    }
}

/// Write the plan as JSON indented with four spaces
pub fn write_plan(plan: &TravelPlan, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    plan.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Travel plan written to {}", path.display());
    Ok(())
}
