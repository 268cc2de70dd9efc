//! Process configuration consumed from the environment.
//!
//! `DATABASE_URL` and `PORT` are required; the process must fail loudly at
//! startup rather than run with an invalid pool. The parsing core takes a
//! lookup closure so tests never mutate process environment.

use std::time::Duration;

/// Environment variable naming the PostgreSQL connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable naming the listen port.
pub const PORT_VAR: &str = "PORT";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("{name} must be set")]
    MissingVar { name: &'static str },
    /// A variable is present but unparseable.
    #[error("{name} is not valid: {message}")]
    InvalidVar { name: &'static str, message: String },
}

impl ConfigError {
    fn missing(name: &'static str) -> Self {
        Self::MissingVar { name }
    }

    fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidVar {
            name,
            message: message.into(),
        }
    }
}

/// Runtime configuration for the identity server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// TCP port the HTTP listener binds to.
    pub listen_port: u16,
    /// Maximum pooled connections.
    pub pool_max_size: u32,
    /// Idle connections kept warm.
    pub pool_min_idle: u32,
    /// Pool checkout timeout.
    pub pool_connect_timeout: Duration,
    /// Idle connection reap threshold.
    pub pool_idle_timeout: Duration,
    /// Maximum lifetime of a pooled connection.
    pub pool_max_lifetime: Duration,
    /// Per-request deadline for storage operations.
    pub request_deadline: Duration,
}

impl AppConfig {
    /// Read configuration from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigError::missing(DATABASE_URL_VAR))?;

        let listen_port = lookup(PORT_VAR)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigError::missing(PORT_VAR))?
            .parse::<u16>()
            .map_err(|err| ConfigError::invalid(PORT_VAR, err.to_string()))?;

        Ok(Self {
            database_url,
            listen_port,
            pool_max_size: parse_or(&lookup, "DB_POOL_MAX_CONNECTIONS", 10)?,
            pool_min_idle: parse_or(&lookup, "DB_POOL_MIN_IDLE", 2)?,
            pool_connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_POOL_CONNECT_TIMEOUT_SECS",
                30,
            )?),
            pool_idle_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_POOL_IDLE_TIMEOUT_SECS",
                300,
            )?),
            pool_max_lifetime: Duration::from_secs(parse_or(
                &lookup,
                "DB_POOL_MAX_LIFETIME_SECS",
                3600,
            )?),
            request_deadline: Duration::from_millis(parse_or(
                &lookup,
                "REQUEST_DEADLINE_MS",
                5000,
            )?),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) if !raw.is_empty() => raw
            .parse::<T>()
            .map_err(|err| ConfigError::invalid(name, err.to_string())),
        _ => Ok(default),
    }
}
