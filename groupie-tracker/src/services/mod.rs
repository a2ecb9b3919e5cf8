//! Services: catalog access, geocoding and concert map enrichment

pub mod catalog_client;
pub mod concert_map;
pub mod geocoder;
pub mod nominatim_client;

pub use catalog_client::{Catalog, CatalogClient, CatalogError};
pub use concert_map::{ConcertMap, ConcertStop, MapPoint};
pub use geocoder::{
    BatchResolution, GeocodeCache, GeocodeError, GeocodeLookup, GeocodePlace, GeocodeResolver,
    LookupRateLimiter,
};
pub use nominatim_client::NominatimClient;
