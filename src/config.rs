use std::env;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Process configuration read from environment variables
///
/// - `DATABASE_URL`: optional; when absent the in-memory store is used
/// - `PORT`: default 3000
/// - `DATABASE_MAX_CONNECTIONS`: default 5
/// - `RUST_LOG`: default `shareit=debug,tower_http=debug`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub port: u16,
    pub max_connections: u32,
    pub log_filter: String,
}

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_LOG_FILTER: &str = "shareit=debug,tower_http=debug";

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Ok(Self {
            database_url,
            port: env_parse_or("PORT", DEFAULT_PORT)?,
            max_connections: env_parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            log_filter: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Helper to parse an environment variable, falling back to a default when unset
fn env_parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
