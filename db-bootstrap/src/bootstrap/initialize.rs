//! Schema and seed application
//!
//! Connects with retries, applies `schema.sql` then the optional `seed.sql`,
//! commits, and reports the tables that now exist.

use super::batch::{SqlFileError, StatementBatch};
use super::config::BootstrapConfig;
use crate::paths::{schema_path, seed_path, SCHEMA_FILE, SEED_FILE};
use anyhow::{Context, Result};
use common::{
    connect_with_retry, first_column, quote_identifier, ConnectError, Connector, Session,
    SessionScope, Sleeper,
};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// How a bootstrap run ended, short of a propagated statement error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// Schema (and seed, if present) applied and committed
    Completed { tables: Vec<String> },
    /// No schema file; nothing was written
    SchemaMissing(PathBuf),
    /// The connection budget ran out
    RetriesExhausted,
    /// The server refused the session outright; nothing was retried
    ConnectionRejected(String),
}

/// Bootstrap the configured database.
///
/// Only connecting is retried. A failing statement aborts the run and comes
/// back as `Err` after a best-effort rollback. The session is closed on every
/// path.
pub async fn initialize<C, S>(
    connector: &C,
    sleeper: &S,
    config: &BootstrapConfig,
) -> Result<InitOutcome>
where
    C: Connector,
    S: Sleeper,
{
    let connected = connect_with_retry(connector, sleeper, &config.db, &config.retry).await;

    let mut scope = SessionScope::empty();
    let result = match connected {
        Ok(session) => run(scope.acquire(session), config).await,
        Err(ConnectError::Exhausted { .. }) => {
            error!("Could not initialize database");
            Ok(InitOutcome::RetriesExhausted)
        }
        Err(ConnectError::Rejected(e)) => {
            error!(error = %e, "Could not initialize database");
            Ok(InitOutcome::ConnectionRejected(e.to_string()))
        }
    };

    scope.release().await;
    result
}

async fn run<S: Session>(session: &mut S, config: &BootstrapConfig) -> Result<InitOutcome> {
    let database = &config.db.database;
    session
        .execute(&format!("USE {}", quote_identifier(database)))
        .await
        .with_context(|| format!("Failed to select database {}", database))?;

    info!(dir = %config.sql_dir.display(), "Looking for SQL files");

    let schema_path = schema_path(&config.sql_dir);
    let schema = match StatementBatch::from_file(&schema_path) {
        Ok(batch) => batch,
        Err(SqlFileError::NotFound(path)) => {
            error!(path = %path.display(), "schema.sql not found");
            return Ok(InitOutcome::SchemaMissing(path));
        }
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = apply(session, config, &schema).await {
        match session.rollback().await {
            Ok(()) => info!("Rolled back uncommitted changes"),
            Err(rollback_err) => warn!(error = %rollback_err, "Rollback failed"),
        }
        return Err(e);
    }

    // The data is committed by now; a failed listing only loses the report
    let tables = match session.fetch_all("SHOW TABLES").await {
        Ok(rows) => first_column(&rows),
        Err(e) => {
            warn!(error = %e, "Failed to list tables");
            Vec::new()
        }
    };
    info!(tables = ?tables, "Created tables");
    info!("Database initialization completed successfully");

    Ok(InitOutcome::Completed { tables })
}

/// Schema, seed, commit
async fn apply<S: Session>(
    session: &mut S,
    config: &BootstrapConfig,
    schema: &StatementBatch,
) -> Result<()> {
    info!(statements = schema.len(), "Creating tables");
    execute_batch(session, schema, SCHEMA_FILE).await?;

    let seed_path = seed_path(&config.sql_dir);
    match StatementBatch::from_file(&seed_path) {
        Ok(seed) => {
            info!(statements = seed.len(), "Inserting seed data");
            execute_batch(session, &seed, SEED_FILE).await?;
        }
        Err(SqlFileError::NotFound(path)) => {
            warn!(path = %path.display(), "seed.sql not found, skipping seed data");
        }
        Err(e) => return Err(e.into()),
    }

    session.commit().await.context("Failed to commit")?;
    Ok(())
}

async fn execute_batch<S: Session>(
    session: &mut S,
    batch: &StatementBatch,
    file: &str,
) -> Result<()> {
    for (index, statement) in batch.iter().enumerate() {
        debug!(file, index, statement, "Executing SQL statement");
        session
            .execute(statement)
            .await
            .with_context(|| format!("Statement {} of {} failed", index + 1, file))?;
    }
    Ok(())
}
