//! Database bootstrapper
//!
//! Creates the schema and loads seed data into a fresh MariaDB database,
//! waiting for the server to accept connections first.

pub mod bootstrap;
pub mod paths;

pub use bootstrap::{initialize, BootstrapConfig, InitOutcome, SqlFileError, StatementBatch};
pub use common::{MySqlConnector, TokioSleeper};
