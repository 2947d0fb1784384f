//! Environment variable parsing helpers
//!
//! Provides ergonomic helpers for reading configuration from environment variables,
//! and the connection configuration shared by both tools.

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 20;

/// Extension trait for parsing environment variables.
///
/// Provides convenient methods for reading env vars with defaults, required values,
/// and type parsing.
pub trait ConfigExt {
    /// Get an environment variable with a default value.
    ///
    /// # Example
    /// ```ignore
    /// let dir = String::env_or("SQL_DIR", "sql");
    /// ```
    fn env_or(name: &str, default: &str) -> String {
        env::var(name).unwrap_or_else(|_| default.to_string())
    }

    /// Get a required environment variable, returning an error if not set.
    ///
    /// # Example
    /// ```ignore
    /// let user = String::env_required("MARIADB_USER")?;
    /// ```
    fn env_required(name: &str) -> Result<String> {
        env::var(name).context(format!("{} must be set", name))
    }

    /// Get an environment variable parsed as a specific type.
    ///
    /// Returns `default` if the variable is not set or fails to parse.
    ///
    /// # Example
    /// ```ignore
    /// let retries: u32 = u32::env_parse("INIT_MAX_RETRIES", 30);
    /// ```
    fn env_parse<T: FromStr>(name: &str, default: T) -> T {
        env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get a required environment variable parsed as a specific type.
    ///
    /// Unlike `env_parse`, a value that fails to parse is an error. The
    /// implementing type is the parsed type.
    ///
    /// # Example
    /// ```ignore
    /// let port = u16::env_parse_required("MARIADB_PORT")?;
    /// ```
    fn env_parse_required(name: &str) -> Result<Self>
    where
        Self: FromStr + Sized,
        <Self as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = env::var(name).context(format!("{} must be set", name))?;
        raw.trim()
            .parse()
            .context(format!("{} must be a valid number, got {:?}", name, raw))
    }
}

// Blanket implementation for all types
impl<T> ConfigExt for T {}

/// Load a `.env` file from the working directory, if there is one.
///
/// Must run before any configuration is read so the file's values are visible.
/// Returns the path that was loaded.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Connection settings for the target database
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_host(String::env_required("MARIADB_HOST")?)
    }

    /// Load everything but the host from environment variables.
    ///
    /// `MARIADB_HOST` is not read, so it may be unset.
    pub fn from_env_with_host(host: impl Into<String>) -> Result<Self> {
        Ok(Self {
            host: host.into(),
            port: u16::env_parse_required("MARIADB_PORT")?,
            user: String::env_required("MARIADB_USER")?,
            password: env::var("MARIADB_PASSWORD").unwrap_or_default(),
            database: String::env_required("MARIADB_DATABASE")?,
            connect_timeout: Duration::from_secs(u64::env_parse(
                "MARIADB_CONNECT_TIMEOUT",
                DEFAULT_CONNECT_TIMEOUT,
            )),
        })
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DbConfig {
        DbConfig {
            host: "db".to_string(),
            port: 3306,
            user: "app".to_string(),
            password: "hunter2".to_string(),
            database: "blog".to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_explicit_host_does_not_need_host_variable() {
        env::remove_var("MARIADB_HOST");
        env::set_var("MARIADB_PORT", "3307");
        env::set_var("MARIADB_USER", "app");
        env::set_var("MARIADB_DATABASE", "blog");

        let config = DbConfig::from_env_with_host("localhost").unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3307);
        assert_eq!(config.database, "blog");

        let err = DbConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("MARIADB_HOST"));
    }

    #[test]
    fn test_env_parse_falls_back_on_garbage() {
        env::set_var("COMMON_TEST_GARBAGE_NUMBER", "not-a-number");
        assert_eq!(u32::env_parse("COMMON_TEST_GARBAGE_NUMBER", 7), 7);
    }

    #[test]
    fn test_env_parse_required_rejects_garbage() {
        env::set_var("COMMON_TEST_BAD_PORT", "abc");
        assert!(u16::env_parse_required("COMMON_TEST_BAD_PORT").is_err());
        env::set_var("COMMON_TEST_GOOD_PORT", " 3307 ");
        let port = u16::env_parse_required("COMMON_TEST_GOOD_PORT").unwrap();
        assert_eq!(port, 3307u16);
    }

    #[test]
    fn test_env_required_names_missing_variable() {
        let err = String::env_required("COMMON_TEST_DEFINITELY_UNSET").unwrap_err();
        assert!(err.to_string().contains("COMMON_TEST_DEFINITELY_UNSET"));
    }
}
