//! Artist catalog API client
//!
//! Fetches the artist list, the global location index and per-artist
//! relations from the upstream catalog. All three are plain JSON GETs with a
//! bounded timeout.

use async_trait::async_trait;
use groupie_common::config::TomlConfig;
use groupie_common::{Artist, LocationIndex, Relation};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Catalog fetch errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Catalog API returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Parse error for {url}: {reason}")]
    Parse { url: String, reason: String },
}

/// Source of catalog data
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn fetch_artists(&self) -> Result<Vec<Artist>, CatalogError>;

    async fn fetch_relation(&self, artist_id: u32) -> Result<Relation, CatalogError>;

    async fn fetch_location_index(&self) -> Result<LocationIndex, CatalogError>;
}

/// HTTP client for the catalog API
pub struct CatalogClient {
    http_client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network {
                url: base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self, CatalogError> {
        Self::new(config.catalog_base_url.clone(), config.catalog_timeout())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);

        debug!(url = %url, "Fetching catalog resource");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| CatalogError::Parse {
            url,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn fetch_artists(&self) -> Result<Vec<Artist>, CatalogError> {
        let artists: Vec<Artist> = self.fetch_json("/artists").await?;
        info!(count = artists.len(), "Fetched artists from catalog");
        Ok(artists)
    }

    async fn fetch_relation(&self, artist_id: u32) -> Result<Relation, CatalogError> {
        self.fetch_json(&format!("/relation/{}", artist_id)).await
    }

    async fn fetch_location_index(&self) -> Result<LocationIndex, CatalogError> {
        let index: LocationIndex = self.fetch_json("/locations").await?;
        info!(entries = index.index.len(), "Fetched location index from catalog");
        Ok(index)
    }
}
