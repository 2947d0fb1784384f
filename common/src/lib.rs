//! Shared utilities for the database bootstrap tools
//!
//! This crate provides common functionality used by both the bootstrapper and
//! the inspector:
//! - Structured logging initialization
//! - Environment variable parsing helpers and connection configuration
//! - Connection retry policy
//! - The database seam (connector/session traits and the MySQL implementation)

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mysql;
pub mod retry;
pub mod scope;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{load_dotenv, ConfigExt, DbConfig};
pub use db::{first_column, quote_identifier, CellValue, Connector, Session};
pub use error::DbError;
pub use logging::init_logging;
pub use mysql::MySqlConnector;
pub use retry::{connect_with_retry, ConnectError, RetryPolicy, Sleeper, TokioSleeper};
pub use scope::SessionScope;
