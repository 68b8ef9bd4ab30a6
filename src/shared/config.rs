use std::{env, fmt::Display, str::FromStr, time::Duration};

use crate::log_info;
use crate::shared::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileConfig {
    /// Zero disables the periodic sweep.
    pub interval: Duration,
    pub chunk_size: i64,
}

impl ReconcileConfig {
    pub fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
    pub reconcile: ReconcileConfig,
}

impl Config {
    /// Load configuration from the process environment
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let config = Self {
            port: try_load(&lookup, "APP_PORT", "8080")?,
            database: DatabaseConfig {
                url: require(&lookup, "DATABASE_URL")?,
                max_connections: try_load(&lookup, "DATABASE_MAX_CONNECTIONS", "10")?,
            },
            jwt_secret: require(&lookup, "JWT_SECRET")?,
            reconcile: ReconcileConfig {
                interval: Duration::from_secs(try_load(&lookup, "RECONCILE_INTERVAL_SECS", "0")?),
                chunk_size: try_load(&lookup, "RECONCILE_CHUNK_SIZE", "500")?,
            },
        };

        if config.database.max_connections == 0 {
            return Err(AppError::ConfigError(
                "DATABASE_MAX_CONNECTIONS must be positive".to_string(),
            ));
        }
        if config.reconcile.chunk_size <= 0 {
            return Err(AppError::ConfigError(
                "RECONCILE_CHUNK_SIZE must be positive".to_string(),
            ));
        }

        Ok(config)
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> AppResult<String> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::ConfigError(format!("{} environment variable not found", key)))
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> AppResult<T>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            log_info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e| AppError::ConfigError(format!("Invalid {key} value: {e}")))
}
