//! Catalog fixtures

#![allow(dead_code)]

use groupie_common::{Artist, LocationIndex, LocationIndexEntry};

/// Artist with the given core fields
pub fn artist(id: u32, name: &str, members: &[&str], creation: i32, first_album: &str) -> Artist {
    Artist {
        id,
        image: String::new(),
        name: name.to_string(),
        members: members.iter().map(|m| m.to_string()).collect(),
        creation_date: creation,
        first_album: first_album.to_string(),
        locations: format!("https://catalog.test/api/locations/{}", id),
        concert_dates: format!("https://catalog.test/api/dates/{}", id),
        relations: format!("https://catalog.test/api/relation/{}", id),
    }
}

pub fn index_entry(id: u32, slugs: &[&str]) -> LocationIndexEntry {
    LocationIndexEntry {
        id,
        locations: slugs.iter().map(|s| s.to_string()).collect(),
        dates: String::new(),
    }
}

pub fn location_index(entries: Vec<LocationIndexEntry>) -> LocationIndex {
    LocationIndex::new(entries)
}

/// Small catalog used across test files
pub fn sample_artists() -> Vec<Artist> {
    vec![
        artist(
            1,
            "Queen",
            &["Freddie Mercury", "Brian May", "Roger Taylor", "John Deacon"],
            1970,
            "14-12-1973",
        ),
        artist(
            2,
            "Genesis",
            &["Phil Collins", "Tony Banks", "Mike Rutherford"],
            1967,
            "31-03-1969",
        ),
        artist(
            3,
            "Arcade Fire",
            &[
                "Win Butler",
                "Régine Chassagne",
                "Richard Reed Parry",
                "Tim Kingsbury",
                "Jeremy Gara",
                "Will Butler",
                "Sarah Neufeld",
                "Owen Pallett",
                "Stuart Bogie",
            ],
            2001,
            "14-09-2004",
        ),
        artist(
            4,
            "Pink Floyd",
            &[
                "Roger Waters",
                "David Gilmour",
                "Nick Mason",
                "Richard Wright",
                "Syd Barrett",
                "Bob Klose",
            ],
            1965,
            "05-08-1967",
        ),
        artist(5, "Kendrick Lamar", &["Kendrick Lamar"], 2003, "unknown"),
    ]
}
