//! Assistant configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RESTAURANT_API_URL` - Base URL of the restaurant backend (menu, coupons, orders, loyalty)
//!
//! ## Optional
//! - `ASSISTANT_HOST` - Bind address (default: 127.0.0.1)
//! - `ASSISTANT_PORT` - Listen port (default: 3000)
//! - `NOMINATIM_URL` - Geocoder base URL (default: <https://nominatim.openstreetmap.org>)
//! - `VIACEP_URL` - ViaCEP base URL (default: <https://viacep.com.br/ws>)
//! - `GEOCODE_REGION_HINT` - Region appended to street searches (default: SP)
//! - `DELIVERY_RADIUS_KM` - Maximum delivery distance (default: 6.0)
//! - `DELIVERY_FEE_BASE` - Flat fee component in reais (default: 3.00)
//! - `DELIVERY_FEE_PER_KM` - Per-kilometer fee in reais (default: 1.50)
//! - `PROFILE_DIR` - Directory for persisted customer profiles (default: data/profiles)
//! - `KNOWLEDGE_FILE` - Path to the small-talk knowledge base JSON
//! - `LOOKUP_TIMEOUT_SECS` - Timeout for each remote lookup (default: 10)
//! - `SESSION_IDLE_SECS` - Idle time before a chat session is dropped (default: 1800)
//! - `UTC_OFFSET_HOURS` - Store local time offset from UTC (default: -3)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use forneria_core::Money;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Assistant application configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Restaurant backend configuration
    pub restaurant: RestaurantApiConfig,
    /// Geocoding configuration
    pub geocode: GeocodeConfig,
    /// Delivery radius and fee configuration
    pub delivery: DeliveryConfig,
    /// Directory holding per-device customer profiles
    pub profile_dir: PathBuf,
    /// Optional small-talk knowledge base file
    pub knowledge_file: Option<PathBuf>,
    /// Timeout applied to every remote lookup
    pub lookup_timeout: Duration,
    /// Idle time before a chat session expires
    pub session_idle: Duration,
    /// Store local time offset from UTC, in hours
    pub utc_offset_hours: i32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Restaurant backend API configuration.
#[derive(Debug, Clone)]
pub struct RestaurantApiConfig {
    /// Base URL, e.g. <https://forneriacolonial.com.br>
    pub base_url: String,
}

/// Geocoding service configuration.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// Nominatim base URL
    pub nominatim_url: String,
    /// ViaCEP base URL
    pub viacep_url: String,
    /// Region hint appended to free-text street searches
    pub region_hint: String,
}

/// Delivery radius and fee configuration.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Maximum straight-line distance served, in kilometers
    pub radius_km: f64,
    /// Flat component of the delivery fee
    pub fee_base: Money,
    /// Per-kilometer component of the delivery fee
    pub fee_per_km: Money,
}

impl AssistantConfig {
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

        let host = get_env_or_default("ASSISTANT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ASSISTANT_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ASSISTANT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ASSISTANT_PORT".to_string(), e.to_string()))?;

        let restaurant = RestaurantApiConfig {
            base_url: trim_trailing_slash(get_required_env("RESTAURANT_API_URL")?),
        };

        let geocode = GeocodeConfig {
            nominatim_url: trim_trailing_slash(get_env_or_default(
                "NOMINATIM_URL",
                "https://nominatim.openstreetmap.org",
            )),
            viacep_url: trim_trailing_slash(get_env_or_default(
                "VIACEP_URL",
                "https://viacep.com.br/ws",
            )),
            region_hint: get_env_or_default("GEOCODE_REGION_HINT", "SP"),
        };

        let delivery = DeliveryConfig {
            radius_km: parse_env_f64("DELIVERY_RADIUS_KM", "6.0")?,
            fee_base: parse_env_money("DELIVERY_FEE_BASE", "3.00")?,
            fee_per_km: parse_env_money("DELIVERY_FEE_PER_KM", "1.50")?,
        };

        let profile_dir = PathBuf::from(get_env_or_default("PROFILE_DIR", "data/profiles"));
        let knowledge_file = get_optional_env("KNOWLEDGE_FILE").map(PathBuf::from);

        let lookup_timeout = Duration::from_secs(parse_env_u64("LOOKUP_TIMEOUT_SECS", "10")?);
        let session_idle = Duration::from_secs(parse_env_u64("SESSION_IDLE_SECS", "1800")?);

        let utc_offset_hours = get_env_or_default("UTC_OFFSET_HOURS", "-3")
            .parse::<i32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("UTC_OFFSET_HOURS".to_string(), e.to_string())
            })?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_env_f32("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_env_f32("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            host,
            port,
            restaurant,
            geocode,
            delivery,
            profile_dir,
            knowledge_file,
            lookup_timeout,
            session_idle,
            utc_offset_hours,
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
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Strip a single trailing slash so URL joins stay predictable.
fn trim_trailing_slash(mut url: String) -> String {
    if url.ends_with('/') {
        url.pop();
    }
    url
}

fn parse_env_f64(key: &str, default: &str) -> Result<f64, ConfigError> {
    get_env_or_default(key, default)
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_env_f32(key: &str, default: &str) -> Result<f32, ConfigError> {
    get_env_or_default(key, default)
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_env_u64(key: &str, default: &str) -> Result<u64, ConfigError> {
    get_env_or_default(key, default)
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_env_money(key: &str, default: &str) -> Result<Money, ConfigError> {
    let raw = get_env_or_default(key, default);
    Money::parse_brl(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> AssistantConfig {
        AssistantConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            restaurant: RestaurantApiConfig {
                base_url: "http://localhost:5000".to_string(),
            },
            geocode: GeocodeConfig {
                nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
                viacep_url: "https://viacep.com.br/ws".to_string(),
                region_hint: "SP".to_string(),
            },
            delivery: DeliveryConfig {
                radius_km: 6.0,
                fee_base: Money::from_cents(300),
                fee_per_km: Money::from_cents(150),
            },
            profile_dir: PathBuf::from("data/profiles"),
            knowledge_file: None,
            lookup_timeout: Duration::from_secs(10),
            session_idle: Duration::from_secs(1800),
            utc_offset_hours: -3,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_trim_trailing_slash() {
        assert_eq!(
            trim_trailing_slash("http://localhost:5000/".to_string()),
            "http://localhost:5000"
        );
        assert_eq!(
            trim_trailing_slash("http://localhost:5000".to_string()),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_parse_env_money_default() {
        let fee = parse_env_money("FORNERIA_TEST_UNSET_FEE", "3.00").unwrap();
        assert_eq!(fee, Money::from_cents(300));
    }

    #[test]
    fn test_parse_env_f64_default() {
        let radius = parse_env_f64("FORNERIA_TEST_UNSET_RADIUS", "6.0").unwrap();
        assert!((radius - 6.0).abs() < f64::EPSILON);
    }
}
