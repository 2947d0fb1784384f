//! Show one table's contents in the log

use crate::render::render_grid;
use crate::snapshot::TableSnapshot;
use common::{
    connect_with_retry, ConnectError, Connector, DbConfig, RetryPolicy, SessionScope, Sleeper,
};
use tracing::{error, info, warn};

/// How showing one table ended. Never an error: the caller moves on to the next table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    /// The rendered grid that was logged
    Rendered(String),
    /// The table exists but has no rows
    Empty,
    RetriesExhausted,
    /// The server refused the session; nothing was retried
    ConnectionRejected(String),
    /// A query failed after connecting
    Failed(String),
}

/// Connect, fetch `table`, and log it as a grid
pub async fn show<C, S>(
    connector: &C,
    sleeper: &S,
    config: &DbConfig,
    policy: &RetryPolicy,
    table: &str,
) -> ShowOutcome
where
    C: Connector,
    S: Sleeper,
{
    info!(table, "Showing table data");

    let connected = connect_with_retry(connector, sleeper, config, policy).await;

    let mut scope = SessionScope::empty();
    let outcome = match connected {
        Err(ConnectError::Exhausted { .. }) => {
            error!(table, "Could not connect to database");
            ShowOutcome::RetriesExhausted
        }
        Err(ConnectError::Rejected(e)) => {
            error!(table, error = %e, "Could not connect to database");
            ShowOutcome::ConnectionRejected(e.to_string())
        }
        Ok(session) => match TableSnapshot::fetch(scope.acquire(session), table).await {
            Ok(snapshot) if snapshot.is_empty() => {
                warn!(table, "No data found");
                ShowOutcome::Empty
            }
            Ok(snapshot) => {
                info!(table = %snapshot.table, records = snapshot.rows.len(), "Found records");
                let grid = render_grid(&snapshot);
                info!("Contents of {}:\n{}", table, grid);
                ShowOutcome::Rendered(grid)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(table, error = %message, "Database error");
                ShowOutcome::Failed(message)
            }
        },
    };

    scope.release().await;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::testing::{
        sample_config, FakeSession, RecordingSleeper, ScriptedConnector, SessionLog,
    };
    use common::CellValue;
    use std::time::Duration;

    fn users_session(log: &SessionLog, rows: Vec<Vec<CellValue>>) -> FakeSession {
        FakeSession::new(log.clone())
            .with_result(
                "SHOW COLUMNS FROM `users`",
                vec![
                    vec![CellValue::from("id")],
                    vec![CellValue::from("name")],
                ],
            )
            .with_result("SELECT * FROM `users`", rows)
    }

    #[tokio::test]
    async fn test_renders_header_and_rows() {
        let log = SessionLog::default();
        let rows = vec![
            vec![CellValue::Int(1), CellValue::from("ada")],
            vec![CellValue::Int(2), CellValue::from("grace")],
            vec![CellValue::Int(3), CellValue::from("barbara")],
        ];
        let connector = ScriptedConnector::failing_times(0).with_session(users_session(&log, rows));

        let outcome = show(
            &connector,
            &RecordingSleeper::default(),
            &sample_config(),
            &RetryPolicy::inspect(),
            "users",
        )
        .await;

        let ShowOutcome::Rendered(grid) = outcome else {
            panic!("expected a rendered table, got {:?}", outcome);
        };
        let content: Vec<&str> = grid.lines().filter(|l| l.starts_with('|')).collect();
        assert_eq!(content.len(), 1 + 3);
        assert!(content[0].contains("id") && content[0].contains("name"));
        assert!(content[3].contains("barbara"));
        assert_eq!(log.closes(), 1);
    }

    #[tokio::test]
    async fn test_empty_table_is_not_rendered() {
        let log = SessionLog::default();
        let connector =
            ScriptedConnector::failing_times(0).with_session(users_session(&log, vec![]));

        let outcome = show(
            &connector,
            &RecordingSleeper::default(),
            &sample_config(),
            &RetryPolicy::inspect(),
            "users",
        )
        .await;

        assert_eq!(outcome, ShowOutcome::Empty);
        assert_eq!(log.closes(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_inspector_budget() {
        let connector = ScriptedConnector::always_failing();
        let sleeper = RecordingSleeper::default();

        let outcome = show(
            &connector,
            &sleeper,
            &sample_config(),
            &RetryPolicy::inspect(),
            "users",
        )
        .await;

        assert_eq!(outcome, ShowOutcome::RetriesExhausted);
        assert_eq!(connector.attempts(), 5);
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(2); 4]);
        assert_eq!(connector.log().closes(), 0);
    }

    #[tokio::test]
    async fn test_query_error_is_reported_not_retried() {
        let log = SessionLog::default();
        let session = FakeSession::new(log.clone()).fail_query_containing("SELECT");
        let connector = ScriptedConnector::failing_times(1).with_session(session);
        let sleeper = RecordingSleeper::default();

        let outcome = show(
            &connector,
            &sleeper,
            &sample_config(),
            &RetryPolicy::inspect(),
            "comments",
        )
        .await;

        match outcome {
            ShowOutcome::Failed(message) => assert!(message.contains("comments")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(connector.attempts(), 2);
        assert_eq!(sleeper.count(), 1);
        assert_eq!(log.closes(), 1);
    }

    #[tokio::test]
    async fn test_rejected_connection_skips_the_budget() {
        let connector = ScriptedConnector::rejecting();
        let sleeper = RecordingSleeper::default();

        let outcome = show(
            &connector,
            &sleeper,
            &sample_config(),
            &RetryPolicy::inspect(),
            "users",
        )
        .await;

        assert!(matches!(outcome, ShowOutcome::ConnectionRejected(_)));
        assert_eq!(connector.attempts(), 1);
        assert_eq!(sleeper.count(), 0);
        assert_eq!(connector.log().closes(), 0);
    }
}
