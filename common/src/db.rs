//! Database seam
//!
//! Both tools talk to the server through these two traits. The production
//! implementation lives in [`crate::mysql`]; tests use [`crate::testing`].

#![allow(async_fn_in_trait)]

use crate::config::DbConfig;
use crate::error::DbError;
use std::fmt;

/// Opens sessions against the configured server
pub trait Connector {
    type Session: Session;

    /// Open one session. Failures are reported as [`DbError::Connection`].
    async fn connect(&self, config: &DbConfig) -> Result<Self::Session, DbError>;
}

/// One live connection with its cursor
pub trait Session {
    /// Execute a statement that returns no rows
    async fn execute(&mut self, sql: &str) -> Result<(), DbError>;

    /// Run a query and return every row
    async fn fetch_all(&mut self, sql: &str) -> Result<Vec<Vec<CellValue>>, DbError>;

    async fn commit(&mut self) -> Result<(), DbError>;

    async fn rollback(&mut self) -> Result<(), DbError>;

    /// Release the connection
    async fn close(self) -> Result<(), DbError>
    where
        Self: Sized;
}

/// A scalar value fetched from the database
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(String),
    Text(String),
    Bytes(Vec<u8>),
}

impl CellValue {
    /// Numeric values are right-aligned when rendered
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int(_) | Self::UInt(_) | Self::Float(_) | Self::Decimal(_)
        )
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Decimal(v) | Self::Text(v) => f.write_str(v),
            Self::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Back-quote an identifier for MySQL, doubling embedded back-quotes
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// First column of each row rendered as text.
///
/// Used for `SHOW TABLES` and `SHOW COLUMNS`, whose first field is the name.
pub fn first_column(rows: &[Vec<CellValue>]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.first())
        .map(|cell| cell.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_renders_empty() {
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn test_bytes_render_as_hex() {
        assert_eq!(CellValue::Bytes(vec![0xde, 0xad]).to_string(), "0xdead");
    }

    #[test]
    fn test_numeric_classification() {
        assert!(CellValue::Int(-1).is_numeric());
        assert!(CellValue::Decimal("1.50".to_string()).is_numeric());
        assert!(!CellValue::Text("1".to_string()).is_numeric());
        assert!(!CellValue::Null.is_numeric());
    }

    #[test]
    fn test_quote_identifier_escapes_backquotes() {
        assert_eq!(quote_identifier("users"), "`users`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_first_column_skips_empty_rows() {
        let rows = vec![
            vec![CellValue::from("users"), CellValue::from("x")],
            vec![],
            vec![CellValue::from("posts")],
        ];
        assert_eq!(first_column(&rows), vec!["users", "posts"]);
    }
}
