//! Database configuration - environment loading
//!
//! Configuration is loaded from environment variables:
//! - `DATABASE_URL`: full connection URL (postgres://, mysql://, sqlite:)
//! - otherwise `MYSQL_USER`, `MYSQL_PASSWORD`, `MYSQL_HOST`, `MYSQL_PORT`,
//!   `MYSQL_DATABASE` are assembled into a `mysql://` URL
//! - `DB_MAX_CONNECTIONS` (default 10)
//! - `DB_CONNECT_ATTEMPTS` (default 10)
//! - `DB_CONNECT_RETRY_SECS` (default 5)
//! - `DB_QUERY_TIMEOUT_SECS` (default 30)

use std::time::Duration;

use thiserror::Error;

use crate::query::Dialect;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_ATTEMPTS: u32 = 10;
const DEFAULT_RETRY_DELAY_SECS: u64 = 5;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

const MYSQL_VARS: [&str; 5] = [
    "MYSQL_USER",
    "MYSQL_PASSWORD",
    "MYSQL_HOST",
    "MYSQL_PORT",
    "MYSQL_DATABASE",
];

/// Missing or invalid connection parameters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(String),

    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("unsupported database url scheme in '{0}'")]
    UnsupportedScheme(String),
}

/// Connection settings for the question store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_attempts: u32,
    pub retry_delay: Duration,
    pub query_timeout: Duration,
}

impl DatabaseConfig {
    /// Config for `url` with default pool, retry and timeout settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }

    /// Create config from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = match get("DATABASE_URL") {
            Some(url) => url,
            None => mysql_url(&get)?,
        };

        let mut config = Self::new(url);
        config.dialect()?;

        if let Some(v) = get("DB_MAX_CONNECTIONS") {
            config.max_connections = parse_positive("DB_MAX_CONNECTIONS", &v)? as u32;
        }
        if let Some(v) = get("DB_CONNECT_ATTEMPTS") {
            config.connect_attempts = parse_positive("DB_CONNECT_ATTEMPTS", &v)? as u32;
        }
        if let Some(v) = get("DB_CONNECT_RETRY_SECS") {
            config.retry_delay = Duration::from_secs(parse_u64("DB_CONNECT_RETRY_SECS", &v)?);
        }
        if let Some(v) = get("DB_QUERY_TIMEOUT_SECS") {
            config.query_timeout =
                Duration::from_secs(parse_positive("DB_QUERY_TIMEOUT_SECS", &v)?);
        }

        Ok(config)
    }

    /// Dialect implied by the URL scheme.
    pub fn dialect(&self) -> Result<Dialect, ConfigError> {
        Dialect::from_url(&self.url).ok_or_else(|| ConfigError::UnsupportedScheme(redact(&self.url)))
    }

    /// URL with any password replaced, safe for logs.
    pub fn redacted_url(&self) -> String {
        redact(&self.url)
    }
}

fn mysql_url<F>(get: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<&str> = MYSQL_VARS
        .iter()
        .copied()
        .filter(|key| get(key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::Missing(format!(
            "DATABASE_URL or {}",
            missing.join(", ")
        )));
    }

    let value = |key: &str| get(key).unwrap_or_default();
    let port = value("MYSQL_PORT");
    parse_u64("MYSQL_PORT", &port)?;

    Ok(format!(
        "mysql://{}:{}@{}:{}/{}?charset=utf8mb4",
        urlencoding::encode(&value("MYSQL_USER")),
        urlencoding::encode(&value("MYSQL_PASSWORD")),
        value("MYSQL_HOST"),
        port,
        urlencoding::encode(&value("MYSQL_DATABASE")),
    ))
}

fn parse_u64(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_owned(),
    })
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match parse_u64(key, value)? {
        0 => Err(ConfigError::Invalid {
            key,
            value: value.to_owned(),
        }),
        n if n > u64::from(u32::MAX) => Err(ConfigError::Invalid {
            key,
            value: value.to_owned(),
        }),
        n => Ok(n),
    }
}

fn redact(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_owned();
    };
    let Some((userinfo, host)) = rest.split_once('@') else {
        return url.to_owned();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_owned(),
    }
}
