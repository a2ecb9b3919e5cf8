//! # Groupie Common Library
//!
//! Shared code for the groupie-tracker workspace:
//! - Catalog domain types (artists, relations, location index)
//! - Location slug normalization
//! - Bootstrap configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod location;
pub mod models;

pub use error::{Error, Result};
pub use models::{
    Artist, Coordinates, LocationIndex, LocationIndexEntry, Relation, Suggestion, SuggestionKind,
};
