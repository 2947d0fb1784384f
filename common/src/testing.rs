//! Scripted test doubles for the database seam
//!
//! Enabled under `cfg(test)` and by the `testing` feature so the tool crates
//! can drive their operations without a server.

use crate::config::DbConfig;
use crate::db::{CellValue, Connector, Session};
use crate::error::DbError;
use crate::retry::Sleeper;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Connection settings that point nowhere
pub fn sample_config() -> DbConfig {
    DbConfig {
        host: "db.test".to_string(),
        port: 3306,
        user: "app".to_string(),
        password: "secret".to_string(),
        database: "blog".to_string(),
        connect_timeout: Duration::from_secs(20),
    }
}

#[derive(Debug, Default)]
struct LogState {
    statements: Vec<String>,
    queries: Vec<String>,
    commits: u32,
    rollbacks: u32,
    closes: u32,
}

/// Everything a [`FakeSession`] was asked to do, shared across clones
#[derive(Debug, Default, Clone)]
pub struct SessionLog(Arc<Mutex<LogState>>);

impl SessionLog {
    fn with<T>(&self, f: impl FnOnce(&mut LogState) -> T) -> T {
        let mut state = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state)
    }

    /// Statements passed to `execute`, in order
    pub fn statements(&self) -> Vec<String> {
        self.with(|s| s.statements.clone())
    }

    /// Queries passed to `fetch_all`, in order
    pub fn queries(&self) -> Vec<String> {
        self.with(|s| s.queries.clone())
    }

    pub fn commits(&self) -> u32 {
        self.with(|s| s.commits)
    }

    pub fn rollbacks(&self) -> u32 {
        self.with(|s| s.rollbacks)
    }

    pub fn closes(&self) -> u32 {
        self.with(|s| s.closes)
    }
}

/// In-memory session with scripted query results and injectable failures
#[derive(Debug, Clone)]
pub struct FakeSession {
    log: SessionLog,
    results: HashMap<String, Vec<Vec<CellValue>>>,
    fail_statement: Option<String>,
    fail_query: Option<String>,
    fail_close: bool,
}

impl FakeSession {
    pub fn new(log: SessionLog) -> Self {
        Self {
            log,
            results: HashMap::new(),
            fail_statement: None,
            fail_query: None,
            fail_close: false,
        }
    }

    /// Rows returned when exactly `sql` is fetched. Other queries return no rows.
    pub fn with_result(mut self, sql: &str, rows: Vec<Vec<CellValue>>) -> Self {
        self.results.insert(sql.to_string(), rows);
        self
    }

    /// Make `execute` fail for any statement containing `needle`
    pub fn fail_statement_containing(mut self, needle: &str) -> Self {
        self.fail_statement = Some(needle.to_string());
        self
    }

    /// Make `fetch_all` fail for any query containing `needle`
    pub fn fail_query_containing(mut self, needle: &str) -> Self {
        self.fail_query = Some(needle.to_string());
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

impl Session for FakeSession {
    async fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        self.log.with(|s| s.statements.push(sql.to_string()));
        match &self.fail_statement {
            Some(needle) if sql.contains(needle.as_str()) => {
                Err(DbError::Statement(format!("rejected: {}", sql)))
            }
            _ => Ok(()),
        }
    }

    async fn fetch_all(&mut self, sql: &str) -> Result<Vec<Vec<CellValue>>, DbError> {
        self.log.with(|s| s.queries.push(sql.to_string()));
        if let Some(needle) = &self.fail_query {
            if sql.contains(needle.as_str()) {
                return Err(DbError::Query(format!("rejected: {}", sql)));
            }
        }
        Ok(self.results.get(sql).cloned().unwrap_or_default())
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        self.log.with(|s| s.commits += 1);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        self.log.with(|s| s.rollbacks += 1);
        Ok(())
    }

    async fn close(self) -> Result<(), DbError> {
        self.log.with(|s| s.closes += 1);
        if self.fail_close {
            Err(DbError::Connection("already closed".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Fails a fixed number of connection attempts, then hands out a [`FakeSession`]
#[derive(Debug)]
pub struct ScriptedConnector {
    failures: Option<u32>,
    reject: bool,
    attempts: AtomicU32,
    session: FakeSession,
}

impl ScriptedConnector {
    /// Fail the first `k` attempts, succeed afterwards
    pub fn failing_times(k: u32) -> Self {
        Self {
            failures: Some(k),
            reject: false,
            attempts: AtomicU32::new(0),
            session: FakeSession::new(SessionLog::default()),
        }
    }

    /// Never succeed
    pub fn always_failing() -> Self {
        Self {
            failures: None,
            ..Self::failing_times(0)
        }
    }

    /// Refuse every attempt with an error that is not worth retrying
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::always_failing()
        }
    }

    /// Session handed out on success
    pub fn with_session(mut self, session: FakeSession) -> Self {
        self.session = session;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Log of the session this connector hands out
    pub fn log(&self) -> SessionLog {
        self.session.log.clone()
    }
}

impl Connector for ScriptedConnector {
    type Session = FakeSession;

    async fn connect(&self, config: &DbConfig) -> Result<FakeSession, DbError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.reject {
            return Err(DbError::Statement(format!(
                "Access denied for user '{}'@'{}'",
                config.user, config.host
            )));
        }
        match self.failures {
            Some(k) if attempt > k => Ok(self.session.clone()),
            _ => Err(DbError::Connection(format!(
                "Can't connect to server on '{}' (attempt {})",
                config.host, attempt
            ))),
        }
    }
}

/// Records requested sleeps instead of waiting
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self) -> usize {
        self.sleeps().len()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(duration);
    }
}
