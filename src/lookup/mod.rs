//! Lookup providers
//!
//! Each provider wraps one external HTTP search endpoint. A lookup never
//! fails outward: transport and status failures are logged and recorded in
//! the returned [`Lookup`], which serializes to the provider's empty value.

pub mod flights;
pub mod hotels;
pub mod weather;

pub use flights::FlightClient;
pub use hotels::HotelClient;
pub use weather::WeatherClient;

use crate::config::ProviderConfig;
use reqwest::{Client, Url, header};
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// User agent sent with every outbound request
pub const USER_AGENT: &str = concat!("travel-planner/", env!("CARGO_PKG_VERSION"));

/// The three external data sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Flights,
    Hotels,
    Weather,
}

impl Provider {
    /// Key under which the provider's data appears in output documents
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Provider::Flights => "flights",
            Provider::Hotels => "hotels",
            Provider::Weather => "weather",
        }
    }

    /// Value standing in for the payload when nothing was fetched
    #[must_use]
    pub fn empty_payload(self) -> Value {
        match self {
            Provider::Flights => json!([]),
            Provider::Hotels | Provider::Weather => json!({}),
        }
    }

    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::Flights => "https://api.flights.com/v1",
            Provider::Hotels => "https://api.hotels.com/v1",
            Provider::Weather => "https://api.openweathermap.org/data/2.5",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Flights => "Flight",
            Provider::Hotels => "Hotel",
            Provider::Weather => "Weather",
        };
        write!(f, "{name} API")
    }
}

/// Why a lookup produced no data
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Outcome of one provider call
#[derive(Debug)]
pub struct Lookup {
    provider: Provider,
    outcome: Result<Value, LookupError>,
}

impl Lookup {
    pub fn fetched(provider: Provider, payload: Value) -> Self {
        Self {
            provider,
            outcome: Ok(payload),
        }
    }

    pub fn failed(provider: Provider, error: LookupError) -> Self {
        Self {
            provider,
            outcome: Err(error),
        }
    }

    #[must_use]
    pub fn provider(&self) -> Provider {
        self.provider
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.outcome.is_err()
    }

    #[must_use]
    pub fn error(&self) -> Option<&LookupError> {
        self.outcome.as_ref().err()
    }

    /// True when the provider answered with something other than an empty
    /// list, object, string or `null`
    #[must_use]
    pub fn has_matches(&self) -> bool {
        match &self.outcome {
            Ok(Value::Null) => false,
            Ok(Value::Array(items)) => !items.is_empty(),
            Ok(Value::Object(fields)) => !fields.is_empty(),
            Ok(Value::String(text)) => !text.is_empty(),
            Ok(_) => true,
            Err(_) => false,
        }
    }

    /// The fetched payload, or the provider's empty value after a failure
    #[must_use]
    pub fn payload(&self) -> Value {
        match &self.outcome {
            Ok(payload) => payload.clone(),
            Err(_) => self.provider.empty_payload(),
        }
    }
}

impl Serialize for Lookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.outcome {
            Ok(payload) => payload.serialize(serializer),
            Err(_) => self.provider.empty_payload().serialize(serializer),
        }
    }
}

impl fmt::Display for Lookup {
    /// Compact JSON, as embedded in prompts
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload())
    }
}

/// One authenticated GET search endpoint
#[derive(Debug, Clone)]
pub struct SearchEndpoint {
    provider: Provider,
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl SearchEndpoint {
    pub fn new(provider: Provider, config: &ProviderConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                crate::PlannerError::config(format!("Failed to create HTTP client: {e}"))
            })?;

        let base_url = if config.base_url.is_empty() {
            provider.default_base_url().to_string()
        } else {
            config.base_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            provider,
            client,
            api_key: config.api_key.clone(),
            base_url,
        })
    }

    /// Issue the search and fold any failure into the returned [`Lookup`]
    pub async fn search(&self, path: &str, params: &[(&str, &str)]) -> Lookup {
        let start_time = Instant::now();
        match self.fetch(path, params).await {
            Ok(payload) => {
                info!(
                    provider = self.provider.key(),
                    "{} answered in {:.3}s",
                    self.provider,
                    start_time.elapsed().as_secs_f64()
                );
                Lookup::fetched(self.provider, payload)
            }
            Err(e) => {
                warn!(provider = self.provider.key(), "{} Error: {}", self.provider, e);
                Lookup::failed(self.provider, e)
            }
        }
    }

    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, LookupError> {
        let url = Url::parse_with_params(&format!("{}{}", self.base_url, path), params)
            .map_err(|e| LookupError::InvalidUrl(e.to_string()))?;

        debug!("{} request URL: {}", self.provider, url);

        let response = self
            .client
            .get(url)
            .bearer_auth(self.api_key.as_deref().unwrap_or_default())
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))
    }
}
