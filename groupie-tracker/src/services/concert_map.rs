//! Concert list and map enrichment for one artist
//!
//! Takes an artist's relation (location slug -> dates), lists the concerts
//! with readable labels and geocodes each distinct location through the
//! shared [`GeocodeResolver`]. Locations that fail to resolve are left off
//! the map; the rest of the map is still returned.

use super::geocoder::GeocodeResolver;
use chrono::NaiveDate;
use groupie_common::{location, Coordinates, Relation};
use serde::Serialize;
use tracing::info;

const CONCERT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Concerts played at one location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcertStop {
    pub slug: String,
    /// Title-cased place, e.g. `North Carolina, Usa`
    pub label: String,
    /// Dates in chronological order
    pub dates: Vec<String>,
}

/// A geocoded location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub slug: String,
    pub label: String,
    /// Normalized address the coordinates were resolved from
    pub address: String,
    pub coordinates: Coordinates,
}

/// Concert list plus map points for one artist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcertMap {
    pub artist_id: u32,
    pub concerts: Vec<ConcertStop>,
    pub points: Vec<MapPoint>,
    /// Slugs that could not be geocoded in this pass
    pub unresolved: Vec<String>,
}

impl ConcertMap {
    /// Concert list without geocoding
    pub fn concerts_of(relation: &Relation) -> Vec<ConcertStop> {
        relation
            .dates_locations
            .iter()
            .map(|(slug, dates)| ConcertStop {
                slug: slug.clone(),
                label: location::display_label(slug),
                dates: sort_dates(dates),
            })
            .collect()
    }

    /// Build the concert list and geocode every location in it
    pub async fn build(relation: &Relation, resolver: &GeocodeResolver) -> Self {
        let concerts = Self::concerts_of(relation);
        let slugs: Vec<&str> = concerts.iter().map(|stop| stop.slug.as_str()).collect();

        let batch = resolver.resolve_all(&slugs).await;

        let points: Vec<MapPoint> = batch
            .resolved
            .into_iter()
            .map(|(slug, coordinates)| MapPoint {
                label: location::display_label(&slug),
                address: location::normalize(&slug),
                slug,
                coordinates,
            })
            .collect();
        let unresolved: Vec<String> = batch.failed.into_iter().map(|(slug, _)| slug).collect();

        info!(
            artist_id = relation.id,
            located = points.len(),
            unresolved = unresolved.len(),
            "Built concert map"
        );

        Self {
            artist_id: relation.id,
            concerts,
            points,
            unresolved,
        }
    }
}

/// Chronological order; dates that do not parse keep their order at the end
fn sort_dates(dates: &[String]) -> Vec<String> {
    let mut keyed: Vec<(Option<NaiveDate>, &String)> = dates
        .iter()
        .map(|d| {
            let cleaned = d.trim().trim_start_matches('*');
            let parsed = NaiveDate::parse_from_str(cleaned, CONCERT_DATE_FORMAT).ok();
            (parsed, d)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    keyed.into_iter().map(|(_, d)| d.clone()).collect()
}
