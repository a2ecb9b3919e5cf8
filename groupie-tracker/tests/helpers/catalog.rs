//! Fake catalog and geocoding collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use groupie_common::{Artist, LocationIndex, Relation};
use groupie_tracker::services::{Catalog, CatalogError, GeocodeError, GeocodeLookup, GeocodePlace};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory catalog; `None` fields simulate fetch failures
pub struct FakeCatalog {
    pub artists: Option<Vec<Artist>>,
    pub index: Option<LocationIndex>,
    pub relations: HashMap<u32, Relation>,
}

impl FakeCatalog {
    pub fn new(artists: Vec<Artist>, index: LocationIndex) -> Self {
        Self {
            artists: Some(artists),
            index: Some(index),
            relations: HashMap::new(),
        }
    }

    pub fn with_relation(mut self, id: u32, entries: &[(&str, &[&str])]) -> Self {
        let mut relation = Relation {
            id,
            ..Default::default()
        };
        for (slug, dates) in entries {
            relation
                .dates_locations
                .insert(slug.to_string(), dates.iter().map(|d| d.to_string()).collect());
        }
        self.relations.insert(id, relation);
        self
    }

    fn unavailable(path: &str) -> CatalogError {
        CatalogError::Status {
            url: format!("https://catalog.test/api{}", path),
            status: 503,
        }
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn fetch_artists(&self) -> Result<Vec<Artist>, CatalogError> {
        self.artists.clone().ok_or_else(|| Self::unavailable("/artists"))
    }

    async fn fetch_relation(&self, artist_id: u32) -> Result<Relation, CatalogError> {
        self.relations
            .get(&artist_id)
            .cloned()
            .ok_or_else(|| Self::unavailable(&format!("/relation/{}", artist_id)))
    }

    async fn fetch_location_index(&self) -> Result<LocationIndex, CatalogError> {
        self.index.clone().ok_or_else(|| Self::unavailable("/locations"))
    }
}

/// Geocoder answering from a fixed address table, recording every call
pub struct CountingLookup {
    table: HashMap<String, (f64, f64)>,
    delay: Duration,
    calls: AtomicUsize,
    addresses: Mutex<Vec<String>>,
    call_times: Mutex<Vec<Instant>>,
}

impl CountingLookup {
    pub fn new(entries: &[(&str, f64, f64)]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(address, lat, lon)| (address.to_string(), (*lat, *lon)))
                .collect(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            addresses: Mutex::new(Vec::new()),
            call_times: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn addresses(&self) -> Vec<String> {
        self.addresses.lock().unwrap().clone()
    }

    /// When each lookup reached the service, in call order
    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeocodeLookup for CountingLookup {
    async fn lookup(&self, address: &str) -> Result<Vec<GeocodePlace>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.addresses.lock().unwrap().push(address.to_string());
        self.call_times.lock().unwrap().push(Instant::now());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(self
            .table
            .get(address)
            .map(|(lat, lon)| {
                vec![GeocodePlace {
                    lat: lat.to_string(),
                    lon: lon.to_string(),
                }]
            })
            .unwrap_or_default())
    }
}
