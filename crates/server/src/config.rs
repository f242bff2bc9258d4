//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Database connection pool size.
    pub pool_size: u32,
    /// Paging and radius defaults for list endpoints.
    pub limits: Limits,
}

/// Defaults and caps applied to query parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    /// Radius used by nearby search when none is given.
    pub default_radius_km: f64,
    /// Page size used when none is given.
    pub default_limit: i64,
    /// Largest page size a client may request.
    pub max_limit: i64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            default_radius_km: 100.0,
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `CFP_ADDR` | Server bind address | `127.0.0.1:8080` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:connect_for_peace.db?mode=rwc` |
    /// | `DB_POOL_SIZE` | Connection pool size | `20` |
    /// | `CFP_DEFAULT_RADIUS_KM` | Nearby search radius | `100` |
    /// | `CFP_MAX_LIMIT` | Largest page size | `100` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("CFP_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:connect_for_peace.db?mode=rwc".to_string());

        let pool_size = match env::var("DB_POOL_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidNumber("DB_POOL_SIZE"))?,
            Err(_) => 20,
        };

        let mut limits = Limits::default();

        if let Ok(raw) = env::var("CFP_DEFAULT_RADIUS_KM") {
            limits.default_radius_km = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|r| r.is_finite() && *r > 0.0)
                .ok_or(ConfigError::InvalidNumber("CFP_DEFAULT_RADIUS_KM"))?;
        }

        if let Ok(raw) = env::var("CFP_MAX_LIMIT") {
            limits.max_limit = raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidNumber("CFP_MAX_LIMIT"))?;
            limits.default_limit = limits.default_limit.min(limits.max_limit);
        }

        Ok(Self {
            addr,
            database_url,
            pool_size,
            limits,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CFP_ADDR format")]
    InvalidAddr,

    #[error("{0} must be a positive number")]
    InvalidNumber(&'static str),
}
