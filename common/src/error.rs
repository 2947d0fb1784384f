//! Database error taxonomy
//!
//! Only `Connection` errors are retried; everything else ends the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Could not open a session with the server
    #[error("connection failed: {0}")]
    Connection(String),

    /// A statement was rejected while applying SQL
    #[error("statement failed: {0}")]
    Statement(String),

    /// A read query failed
    #[error("query failed: {0}")]
    Query(String),
}

impl DbError {
    /// Whether a fresh connection attempt could succeed where this failed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
