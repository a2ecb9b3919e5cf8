//! Search-bar suggestions
//!
//! Case-insensitive substring matching of a query against artist names,
//! member names, first-album dates, creation years and concert locations.
//! Suggestions come out in scan order (artists first, field by field, then
//! the location index) and are cut at [`MAX_SUGGESTIONS`]; there is no
//! relevance ranking.

use groupie_common::{location, Artist, LocationIndex, Suggestion, SuggestionKind};
use std::collections::HashSet;

/// Maximum number of suggestions returned for one query
pub const MAX_SUGGESTIONS: usize = 15;

/// Suggestions for `query`; empty for a blank query
pub fn suggest(query: &str, artists: &[Artist], index: &LocationIndex) -> Vec<Suggestion> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut suggestions = Vec::new();

    for artist in artists {
        if artist.name.to_lowercase().contains(&query) {
            suggestions.push(Suggestion {
                text: format!("{} → artist/band", artist.name),
                kind: SuggestionKind::ArtistBand,
                artist_id: artist.id,
            });
        }

        for member in &artist.members {
            let member = member.trim();
            if member.to_lowercase().contains(&query) {
                suggestions.push(Suggestion {
                    text: format!("{} → member ({})", member, artist.name),
                    kind: SuggestionKind::Member,
                    artist_id: artist.id,
                });
            }
        }

        if artist.first_album.to_lowercase().contains(&query) {
            suggestions.push(Suggestion {
                text: format!("{} → first album date ({})", artist.first_album, artist.name),
                kind: SuggestionKind::FirstAlbumDate,
                artist_id: artist.id,
            });
        }

        if artist.creation_date.to_string().contains(&query) {
            suggestions.push(Suggestion {
                text: format!("{} → creation date ({})", artist.creation_date, artist.name),
                kind: SuggestionKind::CreationDate,
                artist_id: artist.id,
            });
        }

        // Later entries would be dropped anyway
        if suggestions.len() >= MAX_SUGGESTIONS {
            suggestions.truncate(MAX_SUGGESTIONS);
            return suggestions;
        }
    }

    let mut seen: HashSet<(String, u32)> = HashSet::new();
    for entry in &index.index {
        for slug in &entry.locations {
            let place = location::normalize(slug);
            if !place.to_lowercase().contains(&query) {
                continue;
            }
            if !seen.insert((place.clone(), entry.id)) {
                continue;
            }

            let artist_name = artists
                .iter()
                .find(|a| a.id == entry.id)
                .map(|a| a.name.as_str())
                .unwrap_or("?");
            suggestions.push(Suggestion {
                text: format!("{} → location ({})", place, artist_name),
                kind: SuggestionKind::Location,
                artist_id: entry.id,
            });

            if suggestions.len() >= MAX_SUGGESTIONS {
                return suggestions;
            }
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(id: u32, name: &str) -> Artist {
        Artist {
            id,
            image: String::new(),
            name: name.to_string(),
            members: Vec::new(),
            creation_date: 1980,
            first_album: "01-01-1981".to_string(),
            locations: String::new(),
            concert_dates: String::new(),
            relations: String::new(),
        }
    }

    #[test]
    fn test_blank_query_yields_nothing() {
        let artists = vec![artist(1, "Queen")];
        assert!(suggest("", &artists, &LocationIndex::default()).is_empty());
        assert!(suggest("   ", &artists, &LocationIndex::default()).is_empty());
    }

    #[test]
    fn test_member_names_are_trimmed() {
        let mut genesis = artist(2, "Genesis");
        genesis.members = vec!["  Phil Collins ".to_string()];

        let suggestions = suggest("collins", &[genesis], &LocationIndex::default());

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].text, "Phil Collins → member (Genesis)");
    }

    #[test]
    fn test_unknown_artist_location_label() {
        let index = LocationIndex::new(vec![groupie_common::LocationIndexEntry {
            id: 99,
            locations: vec!["lima-peru".to_string()],
            dates: String::new(),
        }]);

        let suggestions = suggest("lima", &[], &index);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].text, "lima, peru → location (?)");
        assert_eq!(suggestions[0].artist_id, 99);
    }
}
