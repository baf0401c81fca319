//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_API_URL` - Base URL of the storefront API (default: `http://localhost:3000`)
//! - `SHOPFRONT_REQUEST_TIMEOUT_SECS` - Transport timeout per request (default: 30)
//! - `SHOPFRONT_STORAGE_DIR` - Directory for durable client storage (default: `.shopfront`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default base URL of the storefront API.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STORAGE_DIR: &str = ".shopfront";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote API configuration
    pub api: ApiConfig,
    /// Directory backing durable client storage
    pub storage_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Remote API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL that endpoint paths are joined onto
    pub base_url: Url,
    /// Transport-level timeout for a single request
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Configuration pointing at `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("SHOPFRONT_API_URL", base_url)?,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }
}

impl StorefrontConfig {
    /// Configuration with every variable unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a built-in default cannot be parsed.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_lookup(|_| None)
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "SHOPFRONT_API_URL",
            lookup("SHOPFRONT_API_URL").as_deref().unwrap_or(DEFAULT_API_URL),
        )?;

        let timeout_secs = get_or_default(
            &lookup,
            "SHOPFRONT_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPFRONT_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let storage_dir = PathBuf::from(get_or_default(
            &lookup,
            "SHOPFRONT_STORAGE_DIR",
            DEFAULT_STORAGE_DIR,
        ));

        Ok(Self {
            api: ApiConfig {
                base_url,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            storage_dir,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse an absolute http(s) base URL.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.api.request_timeout, Duration::from_secs(30));
        assert_eq!(config.storage_dir, PathBuf::from(".shopfront"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_defaults_match_empty_environment() {
        let from_lookup = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap();
        let defaults = StorefrontConfig::defaults().unwrap();
        assert_eq!(from_lookup.api.base_url, defaults.api.base_url);
        assert_eq!(from_lookup.api.request_timeout, defaults.api.request_timeout);
        assert_eq!(from_lookup.storage_dir, defaults.storage_dir);
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("SHOPFRONT_API_URL", "https://api.example.com"),
            ("SHOPFRONT_REQUEST_TIMEOUT_SECS", "5"),
            ("SHOPFRONT_STORAGE_DIR", "/var/lib/shopfront"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ]))
        .unwrap();
        assert_eq!(config.api.base_url.host_str(), Some("api.example.com"));
        assert_eq!(config.api.request_timeout, Duration::from_secs(5));
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/shopfront"));
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_url() {
        let result = StorefrontConfig::from_lookup(lookup_from(&[("SHOPFRONT_API_URL", "nope")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "SHOPFRONT_API_URL"));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let result =
            StorefrontConfig::from_lookup(lookup_from(&[("SHOPFRONT_API_URL", "ftp://host")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let result = StorefrontConfig::from_lookup(lookup_from(&[(
            "SHOPFRONT_REQUEST_TIMEOUT_SECS",
            "soon",
        )]));
        assert!(result.is_err());

        let result =
            StorefrontConfig::from_lookup(lookup_from(&[("SHOPFRONT_REQUEST_TIMEOUT_SECS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_sentry_dsn_is_disabled() {
        let config =
            StorefrontConfig::from_lookup(lookup_from(&[("SENTRY_DSN", "")])).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_with_base_url() {
        let api = ApiConfig::with_base_url("http://127.0.0.1:4010").unwrap();
        assert_eq!(api.base_url.port(), Some(4010));
        assert_eq!(api.request_timeout, Duration::from_secs(30));
    }
}
