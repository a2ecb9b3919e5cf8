//! Nominatim (OpenStreetMap) geocoding client
//!
//! Free, keyless geocoding. Usage policy requires an identifying User-Agent
//! and at most 1 request/second; the rate limit is enforced by the
//! [`GeocodeResolver`](super::geocoder::GeocodeResolver) in front of this
//! client, not here.

use super::geocoder::{GeocodeError, GeocodeLookup, GeocodePlace};
use async_trait::async_trait;
use groupie_common::config::GeocoderConfig;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Nominatim search client
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    /// Create a client with the given identification header and timeout
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Lookup(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        Self::new(config.base_url.clone(), &config.user_agent, config.timeout())
    }
}

#[async_trait]
impl GeocodeLookup for NominatimClient {
    async fn lookup(&self, address: &str) -> Result<Vec<GeocodePlace>, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        debug!(address = %address, "Querying Nominatim");

        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("q", address), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Lookup(format!("request for '{}' failed: {}", address, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Lookup(format!(
                "Nominatim returned {} for '{}'",
                status, address
            )));
        }

        response
            .json::<Vec<GeocodePlace>>()
            .await
            .map_err(|e| GeocodeError::Lookup(format!("invalid Nominatim response: {}", e)))
    }
}
