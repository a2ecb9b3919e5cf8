//! Catalog domain types
//!
//! Shapes follow the upstream catalog API JSON. Everything here is fetched
//! once per session and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An artist or band from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: u32,
    /// Image URL (display only)
    #[serde(default)]
    pub image: String,
    pub name: String,
    /// Member names, in catalog order
    #[serde(default)]
    pub members: Vec<String>,
    pub creation_date: i32,
    /// First album date as `DD-MM-YYYY`
    #[serde(default)]
    pub first_album: String,
    /// URL of the artist's location resource
    #[serde(default)]
    pub locations: String,
    /// URL of the artist's concert dates resource
    #[serde(default)]
    pub concert_dates: String,
    /// URL of the artist's relation resource
    #[serde(default)]
    pub relations: String,
}

impl Artist {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Per-artist concert schedule: location slug -> dates played there
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub id: u32,
    #[serde(default)]
    pub dates_locations: BTreeMap<String, Vec<String>>,
}

/// Raw location slugs for one artist
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocationIndexEntry {
    pub id: u32,
    #[serde(default)]
    pub locations: Vec<String>,
    /// URL of the matching dates resource
    #[serde(default)]
    pub dates: String,
}

/// Response of the catalog `/locations` endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocationIndex {
    #[serde(default)]
    pub index: Vec<LocationIndexEntry>,
}

impl LocationIndex {
    pub fn new(index: Vec<LocationIndexEntry>) -> Self {
        Self { index }
    }

    /// Entry for the given artist id, if the index has one
    pub fn entry(&self, artist_id: u32) -> Option<&LocationIndexEntry> {
        self.index.iter().find(|entry| entry.id == artist_id)
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Resolved latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Which field of the catalog a suggestion matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SuggestionKind {
    #[serde(rename = "artist/band")]
    ArtistBand,
    #[serde(rename = "member")]
    Member,
    #[serde(rename = "location")]
    Location,
    #[serde(rename = "first album date")]
    FirstAlbumDate,
    #[serde(rename = "creation date")]
    CreationDate,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::ArtistBand => "artist/band",
            SuggestionKind::Member => "member",
            SuggestionKind::Location => "location",
            SuggestionKind::FirstAlbumDate => "first album date",
            SuggestionKind::CreationDate => "creation date",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the search-bar suggestion list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Suggestion {
    /// Text shown to the user, e.g. `"Phil Collins → member (Genesis)"`
    pub text: String,
    pub kind: SuggestionKind,
    /// Artist the suggestion navigates to
    pub artist_id: u32,
}
