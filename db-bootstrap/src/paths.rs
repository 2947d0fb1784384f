//! Path utilities for SQL inputs
//!
//! Provides consistent resolution of the SQL directory and the files inside it.

use common::ConfigExt;
use std::path::{Path, PathBuf};

/// Default directory holding the SQL files, relative to the working directory
pub const DEFAULT_SQL_DIR: &str = "sql";

pub const SCHEMA_FILE: &str = "schema.sql";
pub const SEED_FILE: &str = "seed.sql";

/// Get the SQL directory from environment or default
pub fn sql_dir() -> PathBuf {
    PathBuf::from(String::env_or("SQL_DIR", DEFAULT_SQL_DIR))
}

/// Path to the schema file
pub fn schema_path(sql_dir: &Path) -> PathBuf {
    sql_dir.join(SCHEMA_FILE)
}

/// Path to the seed file
pub fn seed_path(sql_dir: &Path) -> PathBuf {
    sql_dir.join(SEED_FILE)
}
