//! Table snapshots

use anyhow::{Context, Result};
use common::{first_column, quote_identifier, CellValue, Session};
use tracing::debug;

/// Columns and rows of one table at one moment
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TableSnapshot {
    /// Fetch column names, then every row in server order
    pub async fn fetch<S: Session>(session: &mut S, table: &str) -> Result<Self> {
        let quoted = quote_identifier(table);

        debug!(table, "Fetching column names");
        let columns = session
            .fetch_all(&format!("SHOW COLUMNS FROM {}", quoted))
            .await
            .with_context(|| format!("Failed to read columns of {}", table))?;

        debug!(table, "Fetching rows");
        let rows = session
            .fetch_all(&format!("SELECT * FROM {}", quoted))
            .await
            .with_context(|| format!("Failed to read rows of {}", table))?;

        Ok(Self {
            table: table.to_string(),
            columns: first_column(&columns),
            rows,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
