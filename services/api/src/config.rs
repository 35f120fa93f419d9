//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub log_level: Level,
    /// Attempts per submission when the database reports a serialization conflict.
    pub process_max_attempts: u32,
    /// When unset, any origin is allowed.
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address = match var("BIND_ADDRESS") {
            Some(address) => parse_var("BIND_ADDRESS", &address)?,
            None => {
                let host = var("SERVER_ADDRESS").unwrap_or_else(|| "localhost".to_string());
                let host = if host == "localhost" {
                    "127.0.0.1".to_string()
                } else {
                    host
                };
                let port = var("SERVER_PORT").unwrap_or_else(|| "8080".to_string());
                parse_var("SERVER_ADDRESS", &format!("{}:{}", host, port))?
            }
        };

        // --- Database Settings ---
        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&var)?,
        };
        let db_max_connections = var("DB_MAX_CONNECTIONS")
            .map(|v| parse_var("DB_MAX_CONNECTIONS", &v))
            .transpose()?
            .unwrap_or(5);
        let db_acquire_timeout = var("DB_ACQUIRE_TIMEOUT_SECS")
            .map(|v| parse_var("DB_ACQUIRE_TIMEOUT_SECS", &v))
            .transpose()?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(3));

        // --- Processing Settings ---
        let process_max_attempts: u32 = var("PROCESS_MAX_ATTEMPTS")
            .map(|v| parse_var("PROCESS_MAX_ATTEMPTS", &v))
            .transpose()?
            .unwrap_or(3);
        if process_max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "PROCESS_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let cors_allowed_origin = var("CORS_ALLOWED_ORIGIN");
        if let Some(origin) = &cors_allowed_origin {
            axum::http::HeaderValue::from_str(origin).map_err(|e| {
                ConfigError::InvalidValue("CORS_ALLOWED_ORIGIN".to_string(), e.to_string())
            })?;
        }

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            database_url,
            db_max_connections,
            db_acquire_timeout,
            log_level,
            process_max_attempts,
            cors_allowed_origin,
        })
    }
}

/// Composes a Postgres URL from the discrete `DB_*` variables.
fn database_url_from_parts<F>(var: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |name: &str| var(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()));

    let host = var("DB_HOST").ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;
    let port = var("DB_PORT").unwrap_or_else(|| "5432".to_string());
    let user = required("DB_USER")?;
    let password = required("DB_PASSWORD")?;
    let name = required("DB_NAME")?;

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}?sslmode=disable",
        user, password, host, port, name
    ))
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}
