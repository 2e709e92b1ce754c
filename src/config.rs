//! Process configuration read from environment variables.
//!
//! Unset or empty variables fall back to defaults suited to a local
//! `PostgreSQL` on the standard port. `DATABASE_URL` takes precedence over the
//! individual `DB_*` connection variables.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_PASSWORD: &str = "password";
const DEFAULT_DB_NAME: &str = "postgres";
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_CONNECT_RETRIES: u32 = 10;
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("{name} must be {expected}, got {value:?}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Description of the accepted values.
        expected: &'static str,
    },
}

/// `PostgreSQL` connection settings.
///
/// `Debug` output hides the password and the whole `DATABASE_URL`, which may
/// embed credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// Full connection string from `DATABASE_URL`.
    Url(String),
    /// Individual connection parameters.
    Parts {
        /// Server host.
        host: String,
        /// Server port.
        port: u16,
        /// Login role.
        user: String,
        /// Login password.
        password: String,
        /// Database name.
        name: String,
    },
}

struct Redacted;

impl fmt::Debug for Redacted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(_) => f.debug_tuple("Url").field(&Redacted).finish(),
            Self::Parts {
                host,
                port,
                user,
                password: _,
                name,
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("password", &Redacted)
                .field("name", name)
                .finish(),
        }
    }
}

impl DatabaseConfig {
    /// Returns a libpq-compatible connection string.
    ///
    /// Keyword values are single-quoted so passwords with spaces, quotes or
    /// backslashes survive.
    #[must_use]
    pub fn connection_string(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Parts {
                host,
                port,
                user,
                password,
                name,
            } => format!(
                "host={} port={port} user={} password={} dbname={} sslmode=disable",
                quote(host),
                quote(user),
                quote(password),
                quote(name),
            ),
        }
    }
}

/// Settings for the `rota_server` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// TCP port the HTTP server listens on.
    pub server_port: u16,
    /// Maximum size of the connection pool.
    pub max_connections: u32,
    /// Number of connection attempts before giving up.
    pub connect_retries: u32,
    /// Pause between connection attempts.
    pub retry_delay: Duration,
}

impl ServiceConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable cannot be
    /// parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database = if let Some(url) = read("DATABASE_URL") {
            DatabaseConfig::Url(url)
        } else {
            DatabaseConfig::Parts {
                host: read("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_owned()),
                port: parse_or(read("DB_PORT"), "DB_PORT", DEFAULT_DB_PORT, "a port number")?,
                user: read("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.to_owned()),
                password: read("DB_PASSWORD").unwrap_or_else(|| DEFAULT_DB_PASSWORD.to_owned()),
                name: read("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_owned()),
            }
        };

        Ok(Self {
            database,
            server_port: parse_or(
                read("SERVER_PORT"),
                "SERVER_PORT",
                DEFAULT_SERVER_PORT,
                "a port number",
            )?,
            max_connections: parse_or(
                read("DB_MAX_CONNECTIONS"),
                "DB_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
                "a positive integer",
            )?,
            connect_retries: parse_or(
                read("DB_CONNECT_RETRIES"),
                "DB_CONNECT_RETRIES",
                DEFAULT_CONNECT_RETRIES,
                "a positive integer",
            )?,
            retry_delay: Duration::from_secs(parse_or(
                read("DB_RETRY_DELAY_SECS"),
                "DB_RETRY_DELAY_SECS",
                DEFAULT_RETRY_DELAY_SECS,
                "a number of seconds",
            )?),
        })
    }

    /// Returns the address the HTTP server binds to.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.server_port))
    }
}

/// Quotes a libpq keyword value, escaping backslashes and single quotes.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if matches!(ch, '\\' | '\'') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('\'');
    quoted
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name,
                value,
                expected,
            })
    })
}
