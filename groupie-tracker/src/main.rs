//! groupie-tracker - touring artist catalog service
//!
//! Loads the artist catalog and location index once at startup, then serves
//! filtering, search suggestions and geocoded concert maps over HTTP.

use anyhow::Result;
use clap::Parser;
use groupie_common::config::{load_toml_config, resolve_config_path, TomlConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use groupie_tracker::services::{
    CatalogClient, GeocodeResolver, LookupRateLimiter, NominatimClient,
};
use groupie_tracker::{build_router, AppState};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "groupie-tracker", version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, env = "GROUPIE_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port (overrides the config file)
    #[arg(long, env = "GROUPIE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match resolve_config_path(args.config.as_deref()) {
        Some(path) => load_toml_config(&path)?,
        None => TomlConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting groupie-tracker v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Catalog: {}", config.catalog_base_url);
    info!(
        "Geocoder: {} (min interval {:?})",
        config.geocoder.base_url,
        config.geocoder.min_interval()
    );

    let catalog = Arc::new(CatalogClient::from_config(&config)?);
    let lookup = Arc::new(NominatimClient::from_config(&config.geocoder)?);
    let limiter = Arc::new(LookupRateLimiter::new(config.geocoder.min_interval()));
    let resolver = Arc::new(GeocodeResolver::new(lookup, limiter));

    let state = AppState::load(catalog, resolver).await?;
    if state.locations.is_empty() {
        warn!("Running without location index: location filters and suggestions are empty");
    }

    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
