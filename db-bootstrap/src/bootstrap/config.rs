//! Configuration for the bootstrapper
//!
//! Built once in `main` and passed down; nothing below reads the environment.

use crate::paths::sql_dir;
use anyhow::Result;
use common::{DbConfig, RetryPolicy};
use std::path::PathBuf;

/// Env prefix for the retry overrides (`INIT_MAX_RETRIES`, `INIT_RETRY_DELAY`)
pub const RETRY_ENV_PREFIX: &str = "INIT";

/// Everything the bootstrapper needs for one run
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub db: DbConfig,
    pub sql_dir: PathBuf,
    pub retry: RetryPolicy,
}

impl BootstrapConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            db: DbConfig::from_env()?,
            sql_dir: sql_dir(),
            retry: RetryPolicy::from_env(RETRY_ENV_PREFIX, RetryPolicy::bootstrap()),
        })
    }
}
