//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `WARUNG_API_BASE_URL` - Backend origin and version prefix
//!   (default: `http://10.0.2.2:8000/api/v1`)
//! - `WARUNG_DATA_DIR` - Directory for the persisted token and user record
//!   (default: `.warung`)
//! - `WARUNG_LATITUDE` / `WARUNG_LONGITUDE` - Device location; without both,
//!   location access behaves as denied
//! - `WARUNG_NEARBY_RADIUS_KM` - Radius for nearby stores (default: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::models::Coordinates;

/// Default backend, reachable from the Android emulator.
pub const DEFAULT_API_BASE_URL: &str = "http://10.0.2.2:8000/api/v1";

/// Default data directory for the key-value store.
pub const DEFAULT_DATA_DIR: &str = ".warung";

/// Default radius for the nearby-store search, in kilometres.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
///
/// Implements `Debug` manually to redact the Sentry DSN.
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend base URL, always ending in `/`
    pub api_base_url: Url,
    /// Directory holding the persisted key-value store
    pub data_dir: PathBuf,
    /// Device location, if known
    pub location: Option<Coordinates>,
    /// Radius for nearby-store queries, in kilometres
    pub nearby_radius_km: f64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("data_dir", &self.data_dir)
            .field("location", &self.location)
            .field("nearby_radius_km", &self.nearby_radius_km)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(
            "WARUNG_API_BASE_URL",
            &get_env_or_default("WARUNG_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let data_dir = PathBuf::from(get_env_or_default("WARUNG_DATA_DIR", DEFAULT_DATA_DIR));

        let latitude = get_optional_f64("WARUNG_LATITUDE")?;
        let longitude = get_optional_f64("WARUNG_LONGITUDE")?;
        let location = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };

        let nearby_radius_km =
            get_optional_f64("WARUNG_NEARBY_RADIUS_KM")?.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);

        Ok(Self {
            api_base_url,
            data_dir,
            location,
            nearby_radius_km,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for a given backend with defaults for everything else.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url("base_url", base_url)?,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            location: None,
            nearby_radius_km: DEFAULT_NEARBY_RADIUS_KM,
            sentry_dsn: None,
            sentry_environment: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL, normalising it to end in `/` so that relative endpoint
/// paths join under the version prefix instead of replacing it.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let normalised = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&normalised)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    Ok(url)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get an optional floating point environment variable.
fn get_optional_f64(key: &str) -> Result<Option<f64>, ConfigError> {
    get_optional_env(key)
        .map(|raw| {
            raw.parse::<f64>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("TEST", "http://localhost:8000/api/v1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/");
        assert_eq!(
            url.join("orders").unwrap().as_str(),
            "http://localhost:8000/api/v1/orders"
        );
    }

    #[test]
    fn test_parse_base_url_keeps_trailing_slash() {
        let url = parse_base_url("TEST", "http://localhost:8000/api/v1/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        let err = parse_base_url("TEST", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_for_base_url_defaults() {
        let config = ClientConfig::for_base_url("http://127.0.0.1:9/api/v1").unwrap();
        assert!(config.location.is_none());
        assert!((config.nearby_radius_km - DEFAULT_NEARBY_RADIUS_KM).abs() < f64::EPSILON);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn test_debug_redacts_sentry_dsn() {
        let mut config = ClientConfig::for_base_url("http://127.0.0.1:9/api/v1").unwrap();
        config.sentry_dsn = Some("https://super-secret-key@sentry.example/1".to_string());

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-key"));
    }
}
