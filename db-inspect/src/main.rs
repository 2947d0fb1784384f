//! Table inspector
//!
//! Connects to the local MariaDB and logs the contents of each named table as
//! a grid. Tables are handled independently: a failure on one is logged and
//! the next one is still shown.

mod config;
mod render;
mod show;
mod snapshot;

use anyhow::Result;
use common::{init_logging, load_dotenv, MySqlConnector, TokioSleeper};
use config::Config;
use show::{show, ShowOutcome};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = load_dotenv();
    let _guard = init_logging("show-data");

    if let Some(path) = dotenv {
        debug!(path = %path.display(), "Loaded .env file");
    }

    let config = Config::from_env(std::env::args().skip(1))?;

    info!(
        host = %config.db.host,
        database = %config.db.database,
        tables = ?config.tables,
        "Running show-data"
    );

    let mut unavailable = Vec::new();
    for table in &config.tables {
        match show(&MySqlConnector, &TokioSleeper, &config.db, &config.retry, table).await {
            ShowOutcome::Rendered(grid) => {
                debug!(table = %table, lines = grid.lines().count(), "Table shown");
            }
            ShowOutcome::Empty => {}
            ShowOutcome::RetriesExhausted => unavailable.push(table.as_str()),
            ShowOutcome::ConnectionRejected(reason) | ShowOutcome::Failed(reason) => {
                debug!(table = %table, reason = %reason, "Table skipped");
                unavailable.push(table.as_str());
            }
        }
    }

    if !unavailable.is_empty() {
        warn!(tables = ?unavailable, "Some tables could not be shown");
    }

    Ok(())
}
