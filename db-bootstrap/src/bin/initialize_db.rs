//! Database bootstrap entry point
//!
//! Waits for MariaDB to accept connections, applies `schema.sql` and the
//! optional `seed.sql`, then logs the tables that exist. An unreachable server
//! or a missing schema is reported through logs only; a failing statement
//! exits non-zero.

use anyhow::Result;
use common::{init_logging, load_dotenv};
use db_bootstrap::{initialize, BootstrapConfig, InitOutcome, MySqlConnector, TokioSleeper};
use std::time::Instant;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = load_dotenv();
    let _guard = init_logging("initialize-db");

    if let Some(path) = dotenv {
        debug!(path = %path.display(), "Loaded .env file");
    }

    let start = Instant::now();
    let config = BootstrapConfig::from_env()?;

    info!(
        host = %config.db.host,
        port = config.db.port,
        database = %config.db.database,
        sql_dir = %config.sql_dir.display(),
        max_attempts = config.retry.max_attempts,
        "=== Database bootstrap ==="
    );

    match initialize(&MySqlConnector, &TokioSleeper, &config).await {
        Ok(InitOutcome::Completed { tables }) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            info!(duration_ms, tables = tables.len(), "Bootstrap completed");
        }
        Ok(InitOutcome::SchemaMissing(path)) => {
            error!(path = %path.display(), "Bootstrap aborted: no schema to apply");
        }
        Ok(InitOutcome::RetriesExhausted) => {
            error!("Bootstrap aborted: database never became reachable");
        }
        Ok(InitOutcome::ConnectionRejected(reason)) => {
            error!(reason = %reason, "Bootstrap aborted: database refused the connection");
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "Bootstrap failed");
            std::process::exit(1);
        }
    }

    Ok(())
}
