//! Location slug normalization
//!
//! The catalog encodes concert places as slugs such as `north_carolina-usa`:
//! underscores stand for spaces and the last hyphen separates the locality
//! from the country. [`normalize`] turns a slug into the address used both as
//! the geocoding query and as the geocode cache key; [`display_label`] is the
//! title-cased variant used only for labels.

use crate::models::LocationIndex;
use std::collections::BTreeSet;

/// Convert a slug into a human-readable address.
///
/// Only the last hyphen is treated as the locality/country boundary, so
/// `a_b_c-d-e` becomes `a b c-d, e`.
pub fn normalize(slug: &str) -> String {
    let spaced = slug.replace('_', " ");
    match spaced.rfind('-') {
        Some(idx) => format!("{}, {}", &spaced[..idx], &spaced[idx + 1..]),
        None => spaced,
    }
}

/// Normalized address with every whitespace-separated token capitalized.
///
/// Spacing is kept as is. `north_carolina-usa` -> `North Carolina, Usa`
pub fn display_label(slug: &str) -> String {
    let mut label = String::with_capacity(slug.len() + 1);
    let mut at_token_start = true;
    for c in normalize(slug).chars() {
        if at_token_start && !c.is_whitespace() {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        at_token_start = c.is_whitespace();
    }
    label
}

/// Country part of a slug (text after the last hyphen), if any
pub fn country_of(slug: &str) -> Option<String> {
    slug.rsplit_once('-')
        .map(|(_, country)| country.replace('_', " "))
}

/// Sorted, de-duplicated countries across the whole location index
pub fn countries(index: &LocationIndex) -> Vec<String> {
    index
        .index
        .iter()
        .flat_map(|entry| entry.locations.iter())
        .filter_map(|slug| country_of(slug))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
