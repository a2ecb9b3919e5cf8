//! Bootstrap configuration loading
//!
//! Configuration is read once at startup from a TOML file. Every field has a
//! built-in default, so a missing file is not an error: the loader logs a
//! warning and continues with defaults.
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `GROUPIE_CONFIG` environment variable
//! 3. `<platform config dir>/groupie-tracker/config.toml`

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "GROUPIE_CONFIG";

const DEFAULT_PORT: u16 = 5780;
const DEFAULT_CATALOG_URL: &str = "https://groupietrackers.herokuapp.com/api";
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 15;
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;
/// Nominatim allows at most 1 request/second; keep a little headroom
const DEFAULT_GEOCODER_MIN_INTERVAL_MS: u64 = 1100;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the artist catalog API
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,

    /// Request timeout for catalog fetches
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Geocoding service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,

    /// Sent on every request; the service rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_geocoder_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum spacing between two outbound lookups
    #[serde(default = "default_geocoder_min_interval_ms")]
    pub min_interval_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            catalog_base_url: default_catalog_base_url(),
            catalog_timeout_secs: default_catalog_timeout_secs(),
            geocoder: GeocoderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout_secs(),
            min_interval_ms: default_geocoder_min_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_catalog_base_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    DEFAULT_CATALOG_TIMEOUT_SECS
}

fn default_geocoder_base_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}

fn default_geocoder_timeout_secs() -> u64 {
    DEFAULT_GEOCODER_TIMEOUT_SECS
}

fn default_geocoder_min_interval_ms() -> u64 {
    DEFAULT_GEOCODER_MIN_INTERVAL_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Standard user-agent for outbound HTTP clients
pub fn default_user_agent() -> String {
    format!("GroupieTracker/{}", env!("CARGO_PKG_VERSION"))
}

impl TomlConfig {
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    /// Check cross-field constraints
    ///
    /// - geocoder user agent is non-blank
    /// - geocoder timeout is shorter than the catalog timeout
    /// - geocoder minimum interval is non-zero
    pub fn validate(&self) -> Result<()> {
        if self.geocoder.user_agent.trim().is_empty() {
            return Err(Error::Config(
                "geocoder.user_agent must not be empty".to_string(),
            ));
        }
        if self.geocoder.timeout_secs >= self.catalog_timeout_secs {
            return Err(Error::Config(format!(
                "geocoder.timeout_secs ({}) must be shorter than catalog_timeout_secs ({})",
                self.geocoder.timeout_secs, self.catalog_timeout_secs
            )));
        }
        if self.geocoder.min_interval_ms == 0 {
            return Err(Error::Config(
                "geocoder.min_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

/// Pick the config file path by priority (CLI > ENV > platform default)
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("groupie-tracker").join("config.toml"))
}

/// Load and validate the TOML config at `path`
///
/// A missing file yields defaults (with a warning); an unreadable or
/// malformed file is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let config = match std::fs::read_to_string(path) {
        Ok(content) => {
            let config: TomlConfig = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Parse TOML {:?} failed: {}", path, e)))?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            TomlConfig::default()
        }
        Err(e) => return Err(Error::Io(e)),
    };

    config.validate()?;
    Ok(config)
}
