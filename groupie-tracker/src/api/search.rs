//! Search-bar suggestion and country list endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use groupie_common::{location, Suggestion};
use serde::{Deserialize, Serialize};

use crate::search;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<String>,
}

/// GET /api/suggestions?q=
pub async fn get_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Json<SuggestionResponse> {
    let suggestions = search::suggest(&query.q, &state.artists, &state.locations);

    Json(SuggestionResponse {
        query: query.q,
        suggestions,
    })
}

/// GET /api/countries
///
/// Choices for the country filter, taken from the location index.
pub async fn get_countries(State(state): State<AppState>) -> Json<CountriesResponse> {
    Json(CountriesResponse {
        countries: location::countries(&state.locations),
    })
}
