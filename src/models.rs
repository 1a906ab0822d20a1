//! Data models for travel requests, aggregated lookups and itineraries

use crate::lookup::Lookup;
use crate::validation::validate_request;
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Longest trip for which a per-day skeleton is produced
pub const MAX_SKELETON_DAYS: u32 = 60;

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

/// A caller's travel request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRequest {
    pub destination: String,
    /// Start date, format defined by the caller
    pub start_date: String,
    pub end_date: String,
    pub num_travellers: String,
    pub travel_style: String,
    #[serde(rename = "accomodation_preference")]
    pub accommodation_preference: String,
    /// Named interest choices (`choice1`, `choice2`, ...) in the order given
    pub interests: Map<String, Value>,
}

impl TravelRequest {
    /// Validate a JSON document and build a request from it
    ///
    /// Scalars of any JSON type are accepted and rendered as text. A
    /// non-object `interests` value is spread over `choice1..choiceN`.
    pub fn from_json(document: &Value) -> Result<Self> {
        let fields = validate_request(document)?;
        let text = |key: &str| fields.get(key).map(render_scalar).unwrap_or_default();

        Ok(Self {
            destination: text("destination"),
            start_date: text("start_date"),
            end_date: text("end_date"),
            num_travellers: text("num_travellers"),
            travel_style: text("travel_style"),
            accommodation_preference: text("accomodation_preference"),
            interests: fields
                .get("interests")
                .map(render_interests)
                .unwrap_or_default(),
        })
    }

    /// Parse and validate a JSON request document
    pub fn parse(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_json(&document)
    }

    /// The Paris example request
    #[must_use]
    pub fn sample() -> Self {
        Self {
            destination: "Paris".to_string(),
            start_date: "15/07/2024".to_string(),
            end_date: "25/07/2024".to_string(),
            num_travellers: "2".to_string(),
            travel_style: "Moderate".to_string(),
            accommodation_preference: "Best view & Experience".to_string(),
            interests: ["history and culture", "food", "adventure"]
                .iter()
                .enumerate()
                .map(|(i, choice)| (format!("choice{}", i + 1), Value::from(*choice)))
                .collect(),
        }
    }

    /// Interest texts in choice order
    #[must_use]
    pub fn interest_list(&self) -> Vec<&str> {
        self.interests.values().filter_map(Value::as_str).collect()
    }

    /// Inclusive trip length in days, when both dates parse and the range is sane
    #[must_use]
    pub fn trip_days(&self) -> Option<u32> {
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        let days = (end - start).num_days() + 1;
        u32::try_from(days)
            .ok()
            .filter(|days| (1..=MAX_SKELETON_DAYS).contains(days))
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text.trim(), format).ok())
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn render_interests(value: &Value) -> Map<String, Value> {
    let text = |choice: &Value| Value::String(render_scalar(choice));
    match value {
        Value::Object(choices) => choices
            .iter()
            .map(|(name, choice)| (name.clone(), text(choice)))
            .collect(),
        Value::Array(choices) => choices
            .iter()
            .enumerate()
            .map(|(i, choice)| (format!("choice{}", i + 1), text(choice)))
            .collect(),
        Value::Null => Map::new(),
        scalar => Map::from_iter([("choice1".to_string(), text(scalar))]),
    }
}

/// The request plus the three lookups, as handed to the generator
#[derive(Debug, Serialize)]
pub struct AggregatedContext {
    pub travel_input: TravelRequest,
    pub flights: Lookup,
    pub hotels: Lookup,
    pub weather: Lookup,
}

impl AggregatedContext {
    /// Drop the request, keeping only what the providers returned
    #[must_use]
    pub fn into_raw(self) -> RawLookups {
        RawLookups {
            flights: self.flights,
            hotels: self.hotels,
            weather: self.weather,
        }
    }

    /// Number of lookups that failed outright
    #[must_use]
    pub fn failed_lookups(&self) -> usize {
        [&self.flights, &self.hotels, &self.weather]
            .iter()
            .filter(|lookup| lookup.is_failed())
            .count()
    }
}

/// Raw provider data, returned when no itinerary is generated
#[derive(Debug, Serialize)]
pub struct RawLookups {
    pub flights: Lookup,
    pub hotels: Lookup,
    pub weather: Lookup,
}

/// Plan for a single day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based day number
    pub day: u32,
    pub morning_activities: Vec<String>,
    pub afternoon_activities: Vec<String>,
    pub evening_activities: Vec<String>,
    /// Meal label (`breakfast`, `lunch`, ...) to recommendation
    pub meals: BTreeMap<String, String>,
    pub transportation: BTreeMap<String, String>,
}

impl DayPlan {
    #[must_use]
    pub fn empty(day: u32) -> Self {
        Self {
            day,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.morning_activities.is_empty()
            && self.afternoon_activities.is_empty()
            && self.evening_activities.is_empty()
            && self.meals.is_empty()
            && self.transportation.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredItinerary {
    pub day_plans: Vec<DayPlan>,
}

/// Generated itinerary text with its day-by-day decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub raw_itinerary: String,
    pub structured_itinerary: StructuredItinerary,
}

/// The output document of one planning call
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TravelPlan {
    Itinerary(Itinerary),
    RawData(RawLookups),
    /// Generation was attempted and failed; written as `{}`
    Empty {},
}

impl TravelPlan {
    #[must_use]
    pub fn itinerary(&self) -> Option<&Itinerary> {
        match self {
            TravelPlan::Itinerary(itinerary) => Some(itinerary),
            TravelPlan::RawData(_) | TravelPlan::Empty {} => None,
        }
    }
}
