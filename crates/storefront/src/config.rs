//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_CURRENCY` - ISO 4217 code for catalog and cart prices (default: USD)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog file (default: the bundled catalog)
//! - `STOREFRONT_CONTINUE_SHOPPING_URL` - Where "Continue Shopping" leads (default: /products)
//! - `STOREFRONT_CART_IDLE_MINUTES` - Minutes before an untouched cart is dropped (default: 60)
//! - `STOREFRONT_MAX_CARTS` - Upper bound on carts held in memory (default: 10000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use paradise_nursery_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_CONTINUE_SHOPPING_URL: &str = "/products";
const DEFAULT_CART_IDLE_MINUTES: u64 = 60;
const DEFAULT_MAX_CARTS: u64 = 10_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Currency every catalog price and cart is denominated in
    pub currency: CurrencyCode,
    /// Catalog file to load instead of the bundled one
    pub catalog_path: Option<PathBuf>,
    /// Destination of the "Continue Shopping" action
    pub continue_shopping_url: String,
    /// How long a cart (and its session) survives without activity
    pub cart_idle_timeout: Duration,
    /// Maximum number of carts held in memory
    pub max_carts: u64,
    /// Sentry DSN for error tracking (contains the project key)
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment name (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            currency: CurrencyCode::default(),
            catalog_path: None,
            continue_shopping_url: DEFAULT_CONTINUE_SHOPPING_URL.to_string(),
            cart_idle_timeout: Duration::from_secs(DEFAULT_CART_IDLE_MINUTES * 60),
            max_carts: DEFAULT_MAX_CARTS,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_or(&lookup, "STOREFRONT_HOST", defaults.host)?;
        let port = parse_or(&lookup, "STOREFRONT_PORT", defaults.port)?;

        let base_url = lookup("STOREFRONT_BASE_URL").unwrap_or(defaults.base_url);
        Url::parse(&base_url).map_err(|e| invalid("STOREFRONT_BASE_URL", e))?;

        let currency = parse_or(&lookup, "STOREFRONT_CURRENCY", defaults.currency)?;
        let catalog_path = lookup("STOREFRONT_CATALOG_PATH")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        let continue_shopping_url = lookup("STOREFRONT_CONTINUE_SHOPPING_URL")
            .unwrap_or(defaults.continue_shopping_url);

        let idle_minutes = parse_or(
            &lookup,
            "STOREFRONT_CART_IDLE_MINUTES",
            DEFAULT_CART_IDLE_MINUTES,
        )?;
        if idle_minutes == 0 {
            return Err(invalid(
                "STOREFRONT_CART_IDLE_MINUTES",
                "must be greater than zero",
            ));
        }
        let cart_idle_timeout = Duration::from_secs(idle_minutes.saturating_mul(60));

        let max_carts = parse_or(&lookup, "STOREFRONT_MAX_CARTS", defaults.max_carts)?;

        let sentry_dsn = lookup("SENTRY_DSN")
            .filter(|dsn| !dsn.is_empty())
            .map(SecretString::from);
        let sentry_environment = lookup("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_rate(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(Self {
            host,
            port,
            base_url,
            currency,
            catalog_path,
            continue_shopping_url,
            cart_idle_timeout,
            max_carts,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value.trim().parse::<T>().map_err(|e| invalid(key, e))
    })
}

/// Parse a sample rate and check it lies within 0.0-1.0.
fn parse_rate(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f32,
) -> Result<f32, ConfigError> {
    let rate = parse_or(lookup, key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(invalid(key, format!("{rate} is outside 0.0-1.0")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.currency, CurrencyCode::USD);
        assert_eq!(config.continue_shopping_url, "/products");
        assert_eq!(config.cart_idle_timeout, Duration::from_secs(3600));
        assert!(config.sentry_dsn.is_none());
        assert!(config.catalog_path.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_BASE_URL", "https://nursery.example.com"),
            ("STOREFRONT_CURRENCY", "eur"),
            ("STOREFRONT_CONTINUE_SHOPPING_URL", "/"),
            ("STOREFRONT_CATALOG_PATH", "/etc/nursery/catalog.json"),
            ("STOREFRONT_CART_IDLE_MINUTES", "5"),
            ("STOREFRONT_MAX_CARTS", "42"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.is_secure());
        assert_eq!(config.currency, CurrencyCode::EUR);
        assert_eq!(config.continue_shopping_url, "/");
        assert_eq!(config.catalog_path, Some(PathBuf::from("/etc/nursery/catalog.json")));
        assert_eq!(config.cart_idle_timeout, Duration::from_secs(300));
        assert_eq!(config.max_carts, 42);
        assert_eq!(
            config.sentry_dsn.as_ref().unwrap().expose_secret(),
            "https://key@sentry.example.com/1"
        );
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(load(&[("STOREFRONT_BASE_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_unknown_currency() {
        assert!(load(&[("STOREFRONT_CURRENCY", "XYZ")]).is_err());
    }

    #[test]
    fn test_zero_idle_timeout_rejected() {
        assert!(load(&[("STOREFRONT_CART_IDLE_MINUTES", "0")]).is_err());
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        assert!(load(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        assert!(load(&[("SENTRY_SAMPLE_RATE", "-0.1")]).is_err());
    }

    #[test]
    fn test_empty_sentry_dsn_is_unset() {
        let config = load(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_debug_redacts_sentry_dsn() {
        let config = load(&[("SENTRY_DSN", "https://supersecretkey@sentry.example.com/1")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("supersecretkey"));
    }
}
