//! Flight search client

use super::{Lookup, Provider, SearchEndpoint};
use crate::config::ProviderConfig;
use tracing::instrument;

/// Client for the flight search provider
#[derive(Debug, Clone)]
pub struct FlightClient {
    endpoint: SearchEndpoint,
}

impl FlightClient {
    pub fn new(config: &ProviderConfig) -> crate::Result<Self> {
        Ok(Self {
            endpoint: SearchEndpoint::new(Provider::Flights, config)?,
        })
    }

    /// Search for available flights; failures come back as an empty list
    #[instrument(skip(self))]
    pub async fn search_flights(
        &self,
        destination: &str,
        start_date: &str,
        end_date: &str,
        num_travelers: &str,
    ) -> Lookup {
        self.endpoint
            .search(
                "/search",
                &[
                    ("destination", destination),
                    ("start_date", start_date),
                    ("end_date", end_date),
                    ("num_travelers", num_travelers),
                ],
            )
            .await
    }
}
