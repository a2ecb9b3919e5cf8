//! HTTP API handlers for groupie-tracker

pub mod artists;
pub mod favorites;
pub mod health;
pub mod search;

pub use artists::{get_artist, get_concerts, list_artists};
pub use favorites::{list_favorites, toggle_favorite};
pub use health::health_routes;
pub use search::{get_countries, get_suggestions};
