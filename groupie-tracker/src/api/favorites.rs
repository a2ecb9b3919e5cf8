//! Favorite artist endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponse {
    pub artist_id: u32,
    pub favorite: bool,
}

/// GET /api/favorites
pub async fn list_favorites(State(state): State<AppState>) -> Json<FavoritesResponse> {
    Json(FavoritesResponse {
        favorites: state.favorites.list().await,
    })
}

/// POST /api/favorites/:id
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<ToggleFavoriteResponse>> {
    if state.artist(id).is_none() {
        return Err(ApiError::NotFound(format!("artist {}", id)));
    }

    let favorite = state.favorites.toggle(id).await;
    Ok(Json(ToggleFavoriteResponse {
        artist_id: id,
        favorite,
    }))
}
