use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::auth::jwt::JwtConfig;

/// Startup configuration errors. The binary aborts on any of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be set in the environment")]
    Missing { key: &'static str },

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Parse an optional raw value, falling back to `default` when absent.
fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

/// Read `key` from the environment, falling back to `default` when unset.
pub(crate) fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    parse_or(key, std::env::var(key).ok(), default)
}

/// Read a required, non-empty `key` from the environment.
pub(crate) fn require_env(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing { key }),
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines (default).
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `DATABASE_URL`             | **yes**  | --      |
    /// | `DATABASE_MAX_CONNECTIONS` | no       | `20`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: require_env("DATABASE_URL")?,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 20)?,
        })
    }
}

/// Settings for the in-process entity cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Lifetime of a cached user or project (default: 300 s).
    pub ttl_secs: u64,
    /// Capacity bound across all entity kinds (default: 10 000).
    pub max_entries: usize,
}

impl CacheConfig {
    /// | Env Var             | Default |
    /// |---------------------|---------|
    /// | `CACHE_TTL_SECS`    | `300`   |
    /// | `CACHE_MAX_ENTRIES` | `10000` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            ttl_secs: env_or("CACHE_TTL_SECS", 300)?,
            max_entries: env_or("CACHE_MAX_ENTRIES", 10_000)?,
        })
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub log_format: LogFormat,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `LOG_FORMAT`           | `pretty` (or `json`)       |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env_or("PORT", 3000)?;

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        )?;

        let request_timeout_secs = env_or("REQUEST_TIMEOUT_SECS", 30)?;
        let log_format = parse_or(
            "LOG_FORMAT",
            std::env::var("LOG_FORMAT").ok(),
            LogFormat::Pretty,
        )?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            log_format,
            jwt: JwtConfig::from_env()?,
            cache: CacheConfig::from_env()?,
        })
    }
}

/// Split a comma-separated origin list. Every origin must be a valid header value.
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| match HeaderValue::from_str(origin) {
            Ok(_) => Ok(origin.to_string()),
            Err(_) => Err(ConfigError::Invalid {
                key: "CORS_ORIGINS",
                value: origin.to_string(),
            }),
        })
        .collect()
}
