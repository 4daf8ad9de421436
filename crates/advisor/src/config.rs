//! Advisor configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADVISOR_PROXY_URL` - Chat-completion proxy endpoint (POST)
//!
//! ## Optional
//! - `ADVISOR_HOST` - Bind address (default: 127.0.0.1)
//! - `ADVISOR_PORT` - Listen port (default: 3000)
//! - `ADVISOR_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `ADVISOR_DATABASE_URL` - `SQLite` URL for the session store, falls back to
//!   `DATABASE_URL` (default: sqlite://advisor.db?mode=rwc)
//! - `ADVISOR_MODEL` - Model name sent to the proxy (default: gpt-4o)
//! - `ADVISOR_PROXY_TIMEOUT_SECS` - Outbound request timeout (default: 60)
//! - `ADVISOR_CATALOG` - Catalog file path or http(s) URL
//!   (default: crates/advisor/static/products.json)
//! - `ADVISOR_SELECTION_TTL_DAYS` - Session inactivity expiry (default: 365)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG: &str = "crates/advisor/static/products.json";
const DEFAULT_DATABASE_URL: &str = "sqlite://advisor.db?mode=rwc";
const DEFAULT_MODEL: &str = "gpt-4o";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the product catalog document is read from at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fetched with an HTTP GET.
    Remote(Url),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret a configured value: `http(s)` URLs are remote, anything
    /// else is a file path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            _ => Self::File(PathBuf::from(value)),
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Chat-completion proxy configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Endpoint that accepts `{ model, messages }`
    pub url: Url,
    /// Model name forwarded to the proxy
    pub model: String,
    /// Upper bound on a single request
    pub timeout: Duration,
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

/// Advisor application configuration.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// `SQLite` URL for the session store
    pub database_url: String,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the advisor
    pub base_url: String,
    /// Catalog document location
    pub catalog: CatalogSource,
    /// How long an idle visitor keeps their selection
    pub selection_ttl: Duration,
    /// Chat-completion proxy configuration
    pub proxy: ProxyConfig,
    /// Sentry configuration
    pub sentry: SentryConfig,
}

impl AdvisorConfig {
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

        let host = parse_env("ADVISOR_HOST", "127.0.0.1")?;
        let port = parse_env("ADVISOR_PORT", "3000")?;
        let base_url = get_env_or_default("ADVISOR_BASE_URL", "http://localhost:3000");
        let database_url = get_database_url("ADVISOR_DATABASE_URL");
        let catalog = CatalogSource::parse(&get_env_or_default("ADVISOR_CATALOG", DEFAULT_CATALOG));
        let ttl_days: u64 = parse_env("ADVISOR_SELECTION_TTL_DAYS", "365")?;
        let selection_ttl = days_to_duration("ADVISOR_SELECTION_TTL_DAYS", ttl_days)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            catalog,
            selection_ttl,
            proxy: ProxyConfig::from_env()?,
            sentry: SentryConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ProxyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("ADVISOR_PROXY_URL")?;
        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("ADVISOR_PROXY_URL".to_string(), e.to_string()))?;
        let timeout_secs: u64 = parse_env("ADVISOR_PROXY_TIMEOUT_SECS", "60")?;

        Ok(Self {
            url,
            model: get_env_or_default("ADVISOR_MODEL", DEFAULT_MODEL),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert a day count to a duration, rejecting counts that overflow.
fn days_to_duration(key: &str, days: u64) -> Result<Duration, ConfigError> {
    days.checked_mul(SECONDS_PER_DAY)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), format!("{days} days is too long")))
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> String {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> AdvisorConfig {
        AdvisorConfig {
            database_url: "sqlite::memory:".to_string(),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog: CatalogSource::parse(DEFAULT_CATALOG),
            selection_ttl: Duration::from_secs(60),
            proxy: ProxyConfig {
                url: Url::parse("https://proxy.example.workers.dev").unwrap(),
                model: DEFAULT_MODEL.to_string(),
                timeout: Duration::from_secs(60),
            },
            sentry: SentryConfig::default(),
        }
    }

    #[test]
    fn test_catalog_source_remote() {
        let source = CatalogSource::parse("https://cdn.example.com/products.json");
        assert!(matches!(source, CatalogSource::Remote(url) if url.host_str() == Some("cdn.example.com")));
    }

    #[test]
    fn test_catalog_source_file() {
        assert_eq!(
            CatalogSource::parse("static/products.json"),
            CatalogSource::File(PathBuf::from("static/products.json"))
        );
        // Non-http schemes are treated as paths.
        assert!(matches!(
            CatalogSource::parse("C:/catalog/products.json"),
            CatalogSource::File(_)
        ));
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("ADVISOR_PORT", "not-a-port").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ADVISOR_PORT"));
    }

    #[test]
    fn test_days_to_duration() {
        let ttl = days_to_duration("ADVISOR_SELECTION_TTL_DAYS", 365).unwrap();
        assert_eq!(ttl, Duration::from_secs(365 * 24 * 60 * 60));

        let err = days_to_duration("ADVISOR_SELECTION_TTL_DAYS", u64::MAX).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ADVISOR_SELECTION_TTL_DAYS")
        );
    }

    #[test]
    fn test_parse_value_ok() {
        let rate: f32 = parse_value("SENTRY_SAMPLE_RATE", "0.5").unwrap();
        assert!((rate - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure_follows_base_url() {
        let mut config = config();
        assert!(!config.is_secure());
        config.base_url = "https://advisor.example.com".to_string();
        assert!(config.is_secure());
    }
}
