//! Artist grid, detail and concert map endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use groupie_common::{Artist, Error};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filters::{self, FilterState};
use crate::services::ConcertMap;
use crate::{ApiError, ApiResult, AppState};

/// Query parameters for the artist grid
///
/// `members` and `countries` are comma-separated lists.
#[derive(Debug, Default, Deserialize)]
pub struct ArtistQuery {
    pub creation_min: Option<i32>,
    pub creation_max: Option<i32>,
    pub album_min: Option<i32>,
    pub album_max: Option<i32>,
    pub members: Option<String>,
    pub countries: Option<String>,
    /// Free-text search applied after the filters
    pub q: Option<String>,
}

impl ArtistQuery {
    /// Build a filter state through the setters so ranges never invert
    pub fn to_filter_state(&self) -> Result<FilterState, Error> {
        let mut state = FilterState::default();

        if let Some(v) = self.creation_min {
            state.set_creation_min(v);
        }
        if let Some(v) = self.creation_max {
            state.set_creation_max(v);
        }
        if let Some(v) = self.album_min {
            state.set_album_min(v);
        }
        if let Some(v) = self.album_max {
            state.set_album_max(v);
        }

        for item in split_list(self.members.as_deref()) {
            let count: usize = item
                .parse()
                .map_err(|_| Error::InvalidInput(format!("invalid member count '{}'", item)))?;
            if !state.member_counts().contains(&count) {
                state.toggle_member_count(count);
            }
        }

        for country in split_list(self.countries.as_deref()) {
            if !state.locations().contains(country) {
                state.toggle_location(country);
            }
        }

        Ok(state)
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize)]
pub struct ArtistListResponse {
    pub total: usize,
    pub filters: FilterState,
    pub artists: Vec<Artist>,
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailResponse {
    pub artist: Artist,
    pub favorite: bool,
}

/// GET /api/artists
pub async fn list_artists(
    State(state): State<AppState>,
    Query(query): Query<ArtistQuery>,
) -> ApiResult<Json<ArtistListResponse>> {
    let filter_state = query.to_filter_state()?;
    let text = query.q.as_deref().unwrap_or_default();

    let artists: Vec<Artist> = filters::apply(&state.artists, &filter_state, &state.locations)
        .into_iter()
        .filter(|artist| filters::matches_text(artist, text))
        .cloned()
        .collect();

    debug!(matched = artists.len(), "Filtered artist grid");

    Ok(Json(ArtistListResponse {
        total: artists.len(),
        filters: filter_state,
        artists,
    }))
}

/// GET /api/artists/:id
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<ArtistDetailResponse>> {
    let artist = state
        .artist(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("artist {}", id)))?;
    let favorite = state.favorites.is_favorite(id).await;

    Ok(Json(ArtistDetailResponse { artist, favorite }))
}

/// GET /api/artists/:id/concerts
///
/// Fetches the artist's relation and geocodes each concert location.
/// Locations that cannot be geocoded are listed under `unresolved`.
pub async fn get_concerts(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<ConcertMap>> {
    if state.artist(id).is_none() {
        return Err(ApiError::NotFound(format!("artist {}", id)));
    }

    let relation = state.catalog.fetch_relation(id).await?;
    let map = ConcertMap::build(&relation, &state.resolver).await;

    Ok(Json(map))
}
