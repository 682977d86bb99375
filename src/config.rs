//! Runtime configuration from the environment.
//!
//! `.env` is loaded first when present, then real environment variables win.

use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use tracing::{info, warn};

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// CRM database (family types)
    pub crm_database_url: String,
    /// Quote generator database (packages, hotels, vehicles)
    pub quote_database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub cache_refresh: Duration,
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            info!("No .env file loaded: {}", e);
        }

        Ok(Self {
            crm_database_url: required("CRM_DATABASE_URL")?,
            quote_database_url: required("QUOTE_DATABASE_URL")?,
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8080")?,
            db_max_connections: at_least_one(
                "DB_MAX_CONNECTIONS",
                try_load("DB_MAX_CONNECTIONS", "5")?,
            )?,
            cache_refresh: Duration::from_secs(at_least_one(
                "CACHE_REFRESH_SECS",
                try_load("CACHE_REFRESH_SECS", "600")?,
            )?),
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw)
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            message: e.to_string(),
        }
    })
}

/// Pool sizes and timer periods of zero are unusable
fn at_least_one<T: PartialOrd + From<u8>>(key: &'static str, value: T) -> Result<T, ConfigError> {
    if value < T::from(1) {
        warn!("Invalid {key} value: must be at least 1");
        return Err(ConfigError::Invalid {
            key,
            message: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}
