//! SQL file splitting
//!
//! Statements are separated by `;`. Semicolons inside string literals or
//! comments are not recognised and will split a statement in two.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlFileError {
    #[error("SQL file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read SQL file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Ordered, non-empty, trimmed statements from one SQL file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatementBatch {
    statements: Vec<String>,
}

impl StatementBatch {
    /// Split raw SQL text on `;`, dropping blank fragments
    pub fn parse(sql: &str) -> Self {
        let statements = sql
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { statements }
    }

    /// Read and split a file
    pub fn from_file(path: &Path) -> Result<Self, SqlFileError> {
        match fs::read_to_string(path) {
            Ok(sql) => Ok(Self::parse(&sql)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(SqlFileError::NotFound(path.to_path_buf()))
            }
            Err(source) => Err(SqlFileError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_order_and_drops_blanks() {
        let batch = StatementBatch::parse(
            "CREATE TABLE users (id INT);\n\n  ;\nCREATE TABLE posts (id INT);\n   \n",
        );
        assert_eq!(
            batch.iter().collect::<Vec<_>>(),
            vec!["CREATE TABLE users (id INT)", "CREATE TABLE posts (id INT)"]
        );
    }

    #[test]
    fn test_trailing_statement_without_terminator() {
        let batch = StatementBatch::parse("SELECT 1; SELECT 2");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.iter().last(), Some("SELECT 2"));
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(StatementBatch::parse(" ;\n;\t; ").is_empty());
        assert!(StatementBatch::parse("").is_empty());
    }

    #[test]
    fn test_count_matches_non_empty_fragments() {
        let statements = ["INSERT INTO t VALUES (1)", "INSERT INTO t VALUES (2)", "DELETE FROM t"];
        let sql = format!(";;{};\n{};  ;{};", statements[0], statements[1], statements[2]);
        let batch = StatementBatch::parse(&sql);
        assert_eq!(batch.len(), statements.len());
        assert_eq!(batch.iter().collect::<Vec<_>>(), statements);
    }

    #[test]
    fn test_semicolon_in_literal_splits() {
        // Not quote-aware
        let batch = StatementBatch::parse("INSERT INTO t VALUES ('a;b')");
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        match StatementBatch::from_file(&path) {
            Err(SqlFileError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.sql");
        std::fs::write(&path, "INSERT INTO users VALUES (1, 'ada');\n").unwrap();
        let batch = StatementBatch::from_file(&path).unwrap();
        assert_eq!(batch.iter().collect::<Vec<_>>(), vec!["INSERT INTO users VALUES (1, 'ada')"]);
    }
}
