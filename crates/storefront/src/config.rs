//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AURELLE_API_URL` - Base URL of the commerce backend API
//! - `AURELLE_BASE_URL` - Public URL of this storefront (used to build the
//!   payment callback URL)
//!
//! ## Optional
//! - `AURELLE_STORAGE_DIR` - Directory for persisted cart/wishlist snapshots
//!   (default: `.aurelle`)
//! - `AURELLE_HTTP_TIMEOUT_SECS` - Request timeout for backend calls
//!   (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Path under the public base URL that the payment gateway redirects back to.
const PAYMENT_CALLBACK_PATH: &str = "checkout/verify";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the commerce backend API
    pub api_url: Url,
    /// Public base URL of this storefront
    pub base_url: Url,
    /// Callback URL handed to payment initialization
    pub callback_url: Url,
    /// Directory holding persisted store snapshots
    pub storage_dir: PathBuf,
    /// Timeout applied to backend requests
    pub http_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_url("AURELLE_API_URL")?;
        let base_url = get_url("AURELLE_BASE_URL")?;
        let storage_dir = PathBuf::from(get_env_or_default("AURELLE_STORAGE_DIR", ".aurelle"));
        let timeout_secs = get_env_or_default(
            "AURELLE_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("AURELLE_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Self::new(api_url, base_url, storage_dir, timeout_secs, sentry_dsn)
    }

    /// Build a configuration from already-parsed values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the callback URL cannot be derived from
    /// `base_url` (e.g. a `cannot-be-a-base` URL).
    pub fn new(
        api_url: Url,
        base_url: Url,
        storage_dir: PathBuf,
        timeout_secs: u64,
        sentry_dsn: Option<String>,
    ) -> Result<Self, ConfigError> {
        let callback_url = join_path(&base_url, PAYMENT_CALLBACK_PATH).map_err(|e| {
            ConfigError::InvalidEnvVar("AURELLE_BASE_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_url,
            base_url,
            callback_url,
            storage_dir,
            http_timeout: Duration::from_secs(timeout_secs),
            sentry_dsn,
        })
    }
}

/// Join a relative path onto a base URL, tolerating a missing trailing slash.
fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    if base.path().ends_with('/') {
        base.join(path)
    } else {
        let mut with_slash = base.clone();
        with_slash.set_path(&format!("{}/", base.path()));
        with_slash.join(path)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable parsed as a URL.
fn get_url(key: &str) -> Result<Url, ConfigError> {
    let value = get_required_env(key)?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_with_base(base: &str) -> StorefrontConfig {
        StorefrontConfig::new(
            Url::parse("https://api.aurelle.shop/api").unwrap(),
            Url::parse(base).unwrap(),
            PathBuf::from(".aurelle"),
            30,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_callback_url_from_bare_origin() {
        let config = config_with_base("https://aurelle.shop");
        assert_eq!(
            config.callback_url.as_str(),
            "https://aurelle.shop/checkout/verify"
        );
    }

    #[test]
    fn test_callback_url_with_trailing_slash() {
        let config = config_with_base("https://aurelle.shop/");
        assert_eq!(
            config.callback_url.as_str(),
            "https://aurelle.shop/checkout/verify"
        );
    }

    #[test]
    fn test_callback_url_with_subpath() {
        let config = config_with_base("https://example.com/shop");
        assert_eq!(
            config.callback_url.as_str(),
            "https://example.com/shop/checkout/verify"
        );
    }

    #[test]
    fn test_http_timeout() {
        let config = config_with_base("https://aurelle.shop");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }
}
