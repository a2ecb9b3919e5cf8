//! Artist filtering
//!
//! [`apply`] keeps the artists that pass every active clause of a
//! [`FilterState`], preserving input order:
//! - creation year within `[creation_min, creation_max]`
//! - first-album year within `[album_min, album_max]`; a first-album date
//!   whose year cannot be parsed always passes
//! - member count in the accepted set (only when the set is non-empty);
//!   `7` means "7 or more"
//! - any normalized concert location contains any accepted substring,
//!   case-insensitively (only when the set is non-empty); artists without a
//!   location index entry fail this clause

use groupie_common::{location, Artist, LocationIndex};
use serde::Serialize;
use std::collections::BTreeSet;

/// Lower bound of the year sliders
pub const YEAR_RANGE_MIN: i32 = 1950;
/// Upper bound of the year sliders
pub const YEAR_RANGE_MAX: i32 = 2025;
/// Member-count value that stands for "this many or more"
pub const MEMBER_BUCKET_MIN: usize = 7;

/// Current filter selections
///
/// Ranges are never inverted: every constructor and setter keeps
/// `min <= max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    creation_min: i32,
    creation_max: i32,
    album_min: i32,
    album_max: i32,
    member_counts: BTreeSet<usize>,
    locations: BTreeSet<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            creation_min: YEAR_RANGE_MIN,
            creation_max: YEAR_RANGE_MAX,
            album_min: YEAR_RANGE_MIN,
            album_max: YEAR_RANGE_MAX,
            member_counts: BTreeSet::new(),
            locations: BTreeSet::new(),
        }
    }
}

impl FilterState {
    /// State with explicit ranges; bounds given in the wrong order are swapped
    pub fn with_ranges(creation: (i32, i32), album: (i32, i32)) -> Self {
        let (creation_min, creation_max) = ordered(creation);
        let (album_min, album_max) = ordered(album);
        Self {
            creation_min,
            creation_max,
            album_min,
            album_max,
            ..Self::default()
        }
    }

    pub fn creation_range(&self) -> (i32, i32) {
        (self.creation_min, self.creation_max)
    }

    pub fn album_range(&self) -> (i32, i32) {
        (self.album_min, self.album_max)
    }

    pub fn member_counts(&self) -> &BTreeSet<usize> {
        &self.member_counts
    }

    pub fn locations(&self) -> &BTreeSet<String> {
        &self.locations
    }

    /// Raising the min above the max drags the max along
    pub fn set_creation_min(&mut self, value: i32) {
        self.creation_min = value;
        if self.creation_min > self.creation_max {
            self.creation_max = self.creation_min;
        }
    }

    /// Lowering the max below the min drags the min along
    pub fn set_creation_max(&mut self, value: i32) {
        self.creation_max = value;
        if self.creation_max < self.creation_min {
            self.creation_min = self.creation_max;
        }
    }

    pub fn set_album_min(&mut self, value: i32) {
        self.album_min = value;
        if self.album_min > self.album_max {
            self.album_max = self.album_min;
        }
    }

    pub fn set_album_max(&mut self, value: i32) {
        self.album_max = value;
        if self.album_max < self.album_min {
            self.album_min = self.album_max;
        }
    }

    /// Add or remove an accepted member count; returns whether it is now accepted
    pub fn toggle_member_count(&mut self, count: usize) -> bool {
        if self.member_counts.remove(&count) {
            false
        } else {
            self.member_counts.insert(count);
            true
        }
    }

    /// Add or remove an accepted location substring; returns whether it is now accepted
    pub fn toggle_location(&mut self, location: &str) -> bool {
        if self.locations.remove(location) {
            false
        } else {
            self.locations.insert(location.to_string());
            true
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether a single artist passes every active clause
    pub fn matches(&self, artist: &Artist, index: &LocationIndex) -> bool {
        self.matches_creation(artist)
            && self.matches_album(artist)
            && self.matches_members(artist)
            && self.matches_location(artist, index)
    }

    fn matches_creation(&self, artist: &Artist) -> bool {
        (self.creation_min..=self.creation_max).contains(&artist.creation_date)
    }

    fn matches_album(&self, artist: &Artist) -> bool {
        match album_year(&artist.first_album) {
            Some(year) => (self.album_min..=self.album_max).contains(&year),
            None => true,
        }
    }

    fn matches_members(&self, artist: &Artist) -> bool {
        if self.member_counts.is_empty() {
            return true;
        }
        let count = artist.member_count();
        self.member_counts.contains(&count)
            || (self.member_counts.contains(&MEMBER_BUCKET_MIN) && count >= MEMBER_BUCKET_MIN)
    }

    fn matches_location(&self, artist: &Artist, index: &LocationIndex) -> bool {
        if self.locations.is_empty() {
            return true;
        }
        let Some(entry) = index.entry(artist.id) else {
            return false;
        };

        let wanted: Vec<String> = self.locations.iter().map(|l| l.to_lowercase()).collect();
        entry.locations.iter().any(|slug| {
            let place = location::normalize(slug).to_lowercase();
            wanted.iter().any(|w| place.contains(w.as_str()))
        })
    }
}

/// Filter `artists` by `state`, keeping input order
pub fn apply<'a>(
    artists: &'a [Artist],
    state: &FilterState,
    index: &LocationIndex,
) -> Vec<&'a Artist> {
    artists
        .iter()
        .filter(|artist| state.matches(artist, index))
        .collect()
}

/// Year of a `DD-MM-YYYY` first-album date
pub fn album_year(first_album: &str) -> Option<i32> {
    let parts: Vec<&str> = first_album.split('-').collect();
    match parts.as_slice() {
        [_, _, year] => year.parse().ok(),
        _ => None,
    }
}

/// Free-text grid search over name, members, creation year and first album
///
/// An empty (or blank) query matches every artist.
pub fn matches_text(artist: &Artist, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    artist.name.to_lowercase().contains(&query)
        || artist
            .members
            .iter()
            .any(|m| m.to_lowercase().contains(&query))
        || artist.creation_date.to_string().contains(&query)
        || artist.first_album.to_lowercase().contains(&query)
}

fn ordered((a, b): (i32, i32)) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
