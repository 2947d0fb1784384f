//! Inspector configuration from environment variables and arguments

use anyhow::Result;
use common::{ConfigExt, DbConfig, RetryPolicy};

/// Tables shown when none are named on the command line
pub const DEFAULT_TABLES: [&str; 3] = ["users", "posts", "comments"];

/// The inspector runs next to the database, not inside the compose network
pub const DEFAULT_HOST: &str = "localhost";

/// Configuration for the inspector
#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub retry: RetryPolicy,
    pub tables: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables; `args` are table names
    pub fn from_env(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let host = String::env_or("SHOW_DATA_HOST", DEFAULT_HOST);

        Ok(Self {
            db: DbConfig::from_env_with_host(host)?,
            retry: RetryPolicy::from_env("SHOW", RetryPolicy::inspect()),
            tables: table_list(args),
        })
    }
}

/// Table names from arguments, or the default list when there are none
pub fn table_list(args: impl IntoIterator<Item = String>) -> Vec<String> {
    let tables: Vec<String> = args
        .into_iter()
        .map(|arg| arg.trim().to_string())
        .filter(|arg| !arg.is_empty())
        .collect();

    if tables.is_empty() {
        DEFAULT_TABLES.iter().map(|t| t.to_string()).collect()
    } else {
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_args() {
        assert_eq!(table_list(Vec::new()), vec!["users", "posts", "comments"]);
    }

    #[test]
    fn test_runs_without_host_variable() {
        std::env::remove_var("MARIADB_HOST");
        std::env::remove_var("SHOW_DATA_HOST");
        std::env::set_var("MARIADB_PORT", "3306");
        std::env::set_var("MARIADB_USER", "app");
        std::env::set_var("MARIADB_DATABASE", "blog");

        let config = Config::from_env(Vec::new()).unwrap();

        assert_eq!(config.db.host, DEFAULT_HOST);
        assert_eq!(config.tables, vec!["users", "posts", "comments"]);
        assert_eq!(config.retry, RetryPolicy::inspect());
    }

    #[test]
    fn test_args_replace_defaults() {
        let args = vec!["orders".to_string(), " ".to_string(), "items ".to_string()];
        assert_eq!(table_list(args), vec!["orders", "items"]);
    }
}
