//! Hotel search client

use super::{Lookup, Provider, SearchEndpoint};
use crate::config::ProviderConfig;
use tracing::instrument;

/// Client for the hotel search provider
#[derive(Debug, Clone)]
pub struct HotelClient {
    endpoint: SearchEndpoint,
}

impl HotelClient {
    pub fn new(config: &ProviderConfig) -> crate::Result<Self> {
        Ok(Self {
            endpoint: SearchEndpoint::new(Provider::Hotels, config)?,
        })
    }

    /// Search for hotels matching the accommodation preference
    #[instrument(skip(self))]
    pub async fn search_hotels(
        &self,
        destination: &str,
        start_date: &str,
        end_date: &str,
        accommodation_preference: &str,
    ) -> Lookup {
        self.endpoint
            .search(
                "/search",
                &[
                    ("destination", destination),
                    ("start_date", start_date),
                    ("end_date", end_date),
                    ("preference", accommodation_preference),
                ],
            )
            .await
    }
}
