//! Bootstrap components
//!
//! This module provides the pieces of a bootstrap run:
//! - Configuration from environment
//! - SQL file splitting
//! - The connect, apply, commit sequence

mod batch;
mod config;
mod initialize;

pub use batch::{SqlFileError, StatementBatch};
pub use config::{BootstrapConfig, RETRY_ENV_PREFIX};
pub use initialize::{initialize, InitOutcome};
