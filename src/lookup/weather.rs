//! Weather forecast client

use super::{Lookup, Provider, SearchEndpoint};
use crate::config::ProviderConfig;
use tracing::instrument;

/// Client for the weather forecast provider
#[derive(Debug, Clone)]
pub struct WeatherClient {
    endpoint: SearchEndpoint,
}

impl WeatherClient {
    pub fn new(config: &ProviderConfig) -> crate::Result<Self> {
        Ok(Self {
            endpoint: SearchEndpoint::new(Provider::Weather, config)?,
        })
    }

    /// Retrieve the forecast for the destination, temperatures in Celsius
    #[instrument(skip(self))]
    pub async fn get_forecast(&self, destination: &str, start_date: &str, end_date: &str) -> Lookup {
        self.endpoint
            .search(
                "/forecast",
                &[
                    ("q", destination),
                    ("start_date", start_date),
                    ("end_date", end_date),
                    ("units", "metric"),
                ],
            )
            .await
    }
}
