//! groupie-tracker library
//!
//! Location resolution, filtering and search over the touring-artist catalog,
//! served over HTTP.

pub mod api;
pub mod error;
pub mod favorites;
pub mod filters;
pub mod search;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use groupie_common::{Artist, LocationIndex};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::favorites::Favorites;
use crate::services::{Catalog, CatalogError, GeocodeResolver};

/// Application state shared across handlers
///
/// The artist list and location index are fetched once per session and
/// never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub artists: Arc<Vec<Artist>>,
    pub locations: Arc<LocationIndex>,
    /// Catalog used for per-artist relation fetches
    pub catalog: Arc<dyn Catalog>,
    /// Shared geocoder; owns the cache and the outbound rate limiter
    pub resolver: Arc<GeocodeResolver>,
    pub favorites: Arc<Favorites>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        artists: Vec<Artist>,
        locations: LocationIndex,
        catalog: Arc<dyn Catalog>,
        resolver: Arc<GeocodeResolver>,
    ) -> Self {
        Self {
            artists: Arc::new(artists),
            locations: Arc::new(locations),
            catalog,
            resolver,
            favorites: Arc::new(Favorites::new()),
            startup_time: Utc::now(),
        }
    }

    /// Fetch the session snapshot from the catalog
    ///
    /// The artist list is required. A failed location-index fetch only
    /// degrades location filtering and suggestions (empty index).
    pub async fn load(
        catalog: Arc<dyn Catalog>,
        resolver: Arc<GeocodeResolver>,
    ) -> Result<Self, CatalogError> {
        let artists = catalog.fetch_artists().await?;

        let locations = match catalog.fetch_location_index().await {
            Ok(index) => index,
            Err(e) => {
                warn!("Location index unavailable, continuing without it: {}", e);
                LocationIndex::default()
            }
        };

        info!(
            artists = artists.len(),
            location_entries = locations.index.len(),
            "Session catalog loaded"
        );

        Ok(Self::new(artists, locations, catalog, resolver))
    }

    pub fn artist(&self, id: u32) -> Option<&Artist> {
        self.artists.iter().find(|a| a.id == id)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/artists", get(api::list_artists))
        .route("/api/artists/:id", get(api::get_artist))
        .route("/api/artists/:id/concerts", get(api::get_concerts))
        .route("/api/suggestions", get(api::get_suggestions))
        .route("/api/countries", get(api::get_countries))
        .route("/api/favorites", get(api::list_favorites))
        .route("/api/favorites/:id", post(api::toggle_favorite))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
