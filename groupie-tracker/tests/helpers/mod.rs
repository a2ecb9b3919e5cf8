//! Test Helper Utilities
//!
//! Shared fixtures and fake collaborators for groupie-tracker tests

pub mod catalog;
pub mod fixtures;

pub use catalog::{CountingLookup, FakeCatalog};
pub use fixtures::{artist, index_entry, location_index, sample_artists};
