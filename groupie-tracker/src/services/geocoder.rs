//! Geocode resolution with caching and rate limiting
//!
//! [`GeocodeResolver`] turns location slugs into [`Coordinates`]:
//! - the cache key is the normalized address, not the raw slug
//! - cache hits return immediately (no network, no rate-limit wait)
//! - misses go through one [`LookupRateLimiter`] owned by the resolver (and
//!   optionally shared with other resolvers), so every call site respects the
//!   external service's 1 request/second ceiling
//! - concurrent misses on the same address perform exactly one lookup and
//!   all receive its outcome, failures included; misses on different
//!   addresses only contend on the rate limiter

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use groupie_common::{location, Coordinates};
use serde::Deserialize;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, warn};

/// Geocoding errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeocodeError {
    /// The service answered with an empty result list
    #[error("No geocoding result for '{0}'")]
    NotFound(String),

    /// Transport or parsing failure
    #[error("Geocoding lookup failed: {0}")]
    Lookup(String),
}

/// One raw result from the geocoding service
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeocodePlace {
    pub lat: String,
    pub lon: String,
}

impl GeocodePlace {
    fn to_coordinates(&self) -> Result<Coordinates, GeocodeError> {
        let lat = self
            .lat
            .trim()
            .parse::<f64>()
            .map_err(|e| GeocodeError::Lookup(format!("invalid latitude '{}': {}", self.lat, e)))?;
        let lon = self
            .lon
            .trim()
            .parse::<f64>()
            .map_err(|e| GeocodeError::Lookup(format!("invalid longitude '{}': {}", self.lon, e)))?;
        Ok(Coordinates::new(lat, lon))
    }
}

/// External geocoding lookup (free-text address -> candidate places)
#[async_trait]
pub trait GeocodeLookup: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<Vec<GeocodePlace>, GeocodeError>;
}

/// Minimum-interval gate in front of the geocoding service
pub struct LookupRateLimiter {
    limiter: DefaultDirectRateLimiter,
    min_interval: Duration,
}

impl LookupRateLimiter {
    /// One permit per `min_interval`, burst of 1
    pub fn new(min_interval: Duration) -> Self {
        let quota = Quota::with_period(min_interval)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN));

        Self {
            limiter: DefaultDirectRateLimiter::direct(quota),
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next outbound request is allowed
    pub async fn wait(&self) {
        if self.limiter.check().is_err() {
            debug!("Rate limiting geocode lookup");
            self.limiter.until_ready().await;
        }
    }
}

/// Address -> coordinates cache, one entry per normalized address
#[derive(Default)]
pub struct GeocodeCache {
    entries: RwLock<HashMap<String, Coordinates>>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, address: &str) -> Option<Coordinates> {
        self.entries.read().await.get(address).copied()
    }

    /// Insert unless the address is already cached; returns the cached value
    pub async fn insert_if_absent(&self, address: &str, coords: Coordinates) -> Coordinates {
        let mut entries = self.entries.write().await;
        *entries.entry(address.to_string()).or_insert(coords)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Outcome of resolving a batch of slugs
#[derive(Debug, Default)]
pub struct BatchResolution {
    /// (slug, coordinates) for every location that resolved
    pub resolved: Vec<(String, Coordinates)>,
    /// (slug, error) for every location that did not
    pub failed: Vec<(String, GeocodeError)>,
}

/// Outcome of one lookup, shared by every caller waiting on that address
type InFlightLookup = Arc<OnceCell<Result<Coordinates, GeocodeError>>>;

/// Cached, rate-limited geocoder for concert locations
pub struct GeocodeResolver {
    lookup: Arc<dyn GeocodeLookup>,
    cache: GeocodeCache,
    limiter: Arc<LookupRateLimiter>,
    /// Lookups currently running, keyed by address
    in_flight: Mutex<HashMap<String, InFlightLookup>>,
}

/// Removes an in-flight entry when its caller finishes or is dropped
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashMap<String, InFlightLookup>>,
    address: &'a str,
    cell: InFlightLookup,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = match self.in_flight.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        // A newer lookup may already own this address
        if in_flight
            .get(self.address)
            .is_some_and(|current| Arc::ptr_eq(current, &self.cell))
        {
            in_flight.remove(self.address);
        }
    }
}

impl GeocodeResolver {
    pub fn new(lookup: Arc<dyn GeocodeLookup>, limiter: Arc<LookupRateLimiter>) -> Self {
        Self {
            lookup,
            cache: GeocodeCache::new(),
            limiter,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    /// Resolve a raw location slug (e.g. `north_carolina-usa`)
    pub async fn resolve(&self, slug: &str) -> Result<Coordinates, GeocodeError> {
        let address = location::normalize(slug);
        self.resolve_address(&address).await
    }

    /// Resolve an already-normalized address
    ///
    /// Concurrent callers for one address share a single lookup and all
    /// receive its result, failures included.
    pub async fn resolve_address(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        if let Some(coords) = self.cache.get(address).await {
            debug!(address = %address, "Geocode cache hit");
            return Ok(coords);
        }

        let guard = InFlightGuard {
            in_flight: &self.in_flight,
            address,
            cell: self.in_flight_lookup(address),
        };

        let result = guard
            .cell
            .get_or_init(move || async move {
                // Another caller may have finished this address while we waited
                match self.cache.get(address).await {
                    Some(coords) => {
                        debug!(address = %address, "Geocode resolved by earlier caller");
                        Ok(coords)
                    }
                    None => self.fetch(address).await,
                }
            })
            .await
            .clone();
        result
    }

    /// Resolve each slug in order; failures are collected, never fatal
    pub async fn resolve_all<S: AsRef<str>>(&self, slugs: &[S]) -> BatchResolution {
        let mut batch = BatchResolution::default();

        for slug in slugs {
            let slug = slug.as_ref();
            match self.resolve(slug).await {
                Ok(coords) => batch.resolved.push((slug.to_string(), coords)),
                Err(e) => {
                    warn!(location = %slug, error = %e, "Geocoding failed, skipping location");
                    batch.failed.push((slug.to_string(), e));
                }
            }
        }

        batch
    }

    fn in_flight_lookup(&self, address: &str) -> InFlightLookup {
        let mut in_flight = match self.in_flight.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        in_flight
            .entry(address.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    async fn fetch(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        self.limiter.wait().await;

        debug!(address = %address, "Geocode cache miss, querying service");
        let places = self.lookup.lookup(address).await?;

        let first = places
            .first()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;
        let coords = first.to_coordinates()?;

        Ok(self.cache.insert_if_absent(address, coords).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    /// Lookup that answers from a fixed table and counts calls
    struct TableLookup {
        calls: AtomicUsize,
        delay: Duration,
        table: HashMap<String, Vec<GeocodePlace>>,
    }

    impl TableLookup {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            let table = entries
                .iter()
                .map(|(address, lat, lon)| {
                    (
                        address.to_string(),
                        vec![GeocodePlace {
                            lat: lat.to_string(),
                            lon: lon.to_string(),
                        }],
                    )
                })
                .collect();
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                table,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeocodeLookup for TableLookup {
        async fn lookup(&self, address: &str) -> Result<Vec<GeocodePlace>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if address == "broken, land" {
                return Err(GeocodeError::Lookup("connection reset".to_string()));
            }
            Ok(self.table.get(address).cloned().unwrap_or_default())
        }
    }

    fn resolver_with(lookup: Arc<TableLookup>, interval_ms: u64) -> GeocodeResolver {
        let limiter = Arc::new(LookupRateLimiter::new(Duration::from_millis(interval_ms)));
        GeocodeResolver::new(lookup, limiter)
    }

    #[tokio::test]
    async fn test_resolve_uses_normalized_address_as_key() {
        let lookup = Arc::new(TableLookup::new(&[("north carolina, usa", "35.5", "-79.4")]));
        let resolver = resolver_with(lookup.clone(), 10);

        let coords = resolver.resolve("north_carolina-usa").await.unwrap();

        assert_eq!(coords, Coordinates::new(35.5, -79.4));
        assert_eq!(resolver.cache().get("north carolina, usa").await, Some(coords));
        assert_eq!(resolver.cache().get("north_carolina-usa").await, None);
    }

    #[tokio::test]
    async fn test_second_resolve_is_cache_hit() {
        let lookup = Arc::new(TableLookup::new(&[("london, uk", "51.5", "-0.12")]));
        let resolver = resolver_with(lookup.clone(), 10);

        let first = resolver.resolve("london-uk").await.unwrap();
        let second = resolver.resolve("london-uk").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(lookup.calls(), 1);
        assert_eq!(resolver.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_found() {
        let lookup = Arc::new(TableLookup::new(&[]));
        let resolver = resolver_with(lookup.clone(), 10);

        let result = resolver.resolve("atlantis-ocean").await;

        assert_eq!(result, Err(GeocodeError::NotFound("atlantis, ocean".to_string())));
        assert!(resolver.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_unparseable_coordinates_are_lookup_error() {
        let lookup = Arc::new(TableLookup::new(&[("oslo, norway", "north", "10.7")]));
        let resolver = resolver_with(lookup, 10);

        let result = resolver.resolve("oslo-norway").await;
        assert!(matches!(result, Err(GeocodeError::Lookup(_))));
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let lookup = Arc::new(TableLookup::new(&[]));
        let resolver = resolver_with(lookup.clone(), 10);

        assert!(resolver.resolve("broken-land").await.is_err());
        assert!(resolver.resolve("broken-land").await.is_err());
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_same_key_single_lookup() {
        let lookup = Arc::new(
            TableLookup::new(&[("osaka, japan", "34.69", "135.5")])
                .with_delay(Duration::from_millis(50)),
        );
        let resolver = Arc::new(resolver_with(lookup.clone(), 10));

        let a = tokio::spawn({
            let resolver = resolver.clone();
            async move { resolver.resolve("osaka-japan").await }
        });
        let b = tokio::spawn({
            let resolver = resolver.clone();
            async move { resolver.resolve("osaka-japan").await }
        });

        let a = a.await.unwrap().unwrap();
        let b = b.await.unwrap().unwrap();

        assert_eq!(a, b);
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_failed_miss_single_lookup() {
        let lookup = Arc::new(TableLookup::new(&[]).with_delay(Duration::from_millis(100)));
        let resolver = Arc::new(resolver_with(lookup.clone(), 10));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let resolver = resolver.clone();
                tokio::spawn(async move { resolver.resolve("atlantis-ocean").await })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap();
            assert_eq!(result, Err(GeocodeError::NotFound("atlantis, ocean".to_string())));
        }
        assert_eq!(lookup.calls(), 1);
        assert!(resolver.in_flight.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_resolve_releases_in_flight_entry() {
        let lookup = Arc::new(
            TableLookup::new(&[("lima, peru", "-12.05", "-77.04")])
                .with_delay(Duration::from_millis(200)),
        );
        let resolver = resolver_with(lookup.clone(), 10);

        let cancelled =
            tokio::time::timeout(Duration::from_millis(20), resolver.resolve("lima-peru")).await;
        assert!(cancelled.is_err());
        assert!(resolver.in_flight.lock().unwrap().is_empty());

        // A later caller starts a fresh lookup
        let coords = resolver.resolve("lima-peru").await.unwrap();
        assert_eq!(coords, Coordinates::new(-12.05, -77.04));
        assert_eq!(lookup.calls(), 2);
    }

    #[test]
    fn test_stale_guard_keeps_newer_entry() {
        let resolver = resolver_with(Arc::new(TableLookup::new(&[])), 10);
        let stale = resolver.in_flight_lookup("a, x");
        resolver.in_flight.lock().unwrap().remove("a, x");
        let current = resolver.in_flight_lookup("a, x");

        drop(InFlightGuard {
            in_flight: &resolver.in_flight,
            address: "a, x",
            cell: stale,
        });

        let in_flight = resolver.in_flight.lock().unwrap();
        assert!(Arc::ptr_eq(&in_flight["a, x"], &current));
    }

    #[tokio::test]
    async fn test_misses_are_spaced_by_limiter() {
        let lookup = Arc::new(TableLookup::new(&[
            ("a, x", "1", "1"),
            ("b, x", "2", "2"),
            ("c, x", "3", "3"),
        ]));
        let resolver = resolver_with(lookup, 200);

        let start = Instant::now();
        for slug in ["a-x", "b-x", "c-x"] {
            resolver.resolve(slug).await.unwrap();
        }

        // First lookup is immediate, the next two wait ~200ms each
        assert!(start.elapsed() >= Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_cache_hits_skip_limiter() {
        let lookup = Arc::new(TableLookup::new(&[("a, x", "1", "1")]));
        let resolver = resolver_with(lookup, 500);

        resolver.resolve("a-x").await.unwrap();

        let start = Instant::now();
        for _ in 0..5 {
            resolver.resolve("a-x").await.unwrap();
        }
        assert!(start.elapsed() < Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_partial_results() {
        let lookup = Arc::new(TableLookup::new(&[
            ("london, uk", "51.5", "-0.12"),
            ("paris, france", "48.85", "2.35"),
        ]));
        let resolver = resolver_with(lookup, 10);

        let slugs = vec![
            "london-uk".to_string(),
            "atlantis-ocean".to_string(),
            "broken-land".to_string(),
            "paris-france".to_string(),
        ];
        let batch = resolver.resolve_all(&slugs).await;

        let resolved: Vec<&str> = batch.resolved.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(resolved, vec!["london-uk", "paris-france"]);
        assert_eq!(batch.failed.len(), 2);
        assert!(matches!(batch.failed[0].1, GeocodeError::NotFound(_)));
        assert!(matches!(batch.failed[1].1, GeocodeError::Lookup(_)));
    }

    #[test]
    fn test_limiter_keeps_interval() {
        let limiter = LookupRateLimiter::new(Duration::from_millis(1100));
        assert_eq!(limiter.min_interval(), Duration::from_millis(1100));
    }
}
