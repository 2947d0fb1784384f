//! Connection retry policy
//!
//! Only establishing the connection is retried. Once a session exists, any
//! error belongs to the caller.

#![allow(async_fn_in_trait)]

use crate::config::{ConfigExt, DbConfig};
use crate::db::Connector;
use crate::error::DbError;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Why no session could be opened
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Every attempt failed with a connection error
    #[error("gave up after {attempts} connection attempts")]
    Exhausted { attempts: u32 },

    /// The server answered but refused the session; retrying will not help
    #[error("connection rejected: {0}")]
    Rejected(#[source] DbError),
}

/// How many times to try connecting and how long to wait between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// Fixed delay between every attempt
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Budget used by the bootstrapper: 30 attempts, 2s apart
    pub const fn bootstrap() -> Self {
        Self::fixed(30, Duration::from_secs(2))
    }

    /// Budget used by the inspector: 5 attempts, 2s apart
    pub const fn inspect() -> Self {
        Self::fixed(5, Duration::from_secs(2))
    }

    /// Override `default` with `<PREFIX>_MAX_RETRIES` and `<PREFIX>_RETRY_DELAY` (seconds)
    pub fn from_env(prefix: &str, default: Self) -> Self {
        let max_attempts = u32::env_parse(&format!("{}_MAX_RETRIES", prefix), default.max_attempts);
        let delay = u64::env_parse(&format!("{}_RETRY_DELAY", prefix), default.delay.as_secs());
        Self::fixed(max_attempts.max(1), Duration::from_secs(delay))
    }

    /// Delay to wait after the given (1-based) failed attempt
    pub fn delay_after(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

/// Blocks the current task between attempts
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Try to open a session until one succeeds or the budget runs out.
///
/// Each failure is logged here. A non-retryable error ends the loop at once.
pub async fn connect_with_retry<C, S>(
    connector: &C,
    sleeper: &S,
    config: &DbConfig,
    policy: &RetryPolicy,
) -> Result<C::Session, ConnectError>
where
    C: Connector,
    S: Sleeper,
{
    let max_attempts = policy.max_attempts;

    for attempt in 1..=max_attempts {
        info!(
            attempt,
            max_attempts,
            host = %config.host,
            database = %config.database,
            "Attempting to connect"
        );

        match connector.connect(config).await {
            Ok(session) => return Ok(session),
            Err(e) if !e.is_retryable() => {
                error!(attempt, error = %e, "Connection rejected, not retrying");
                return Err(ConnectError::Rejected(e));
            }
            Err(e) => {
                error!(attempt, error = %e, "Error connecting to database");
                if attempt < max_attempts {
                    let delay = policy.delay_after(attempt);
                    info!(delay_secs = delay.as_secs(), "Retrying");
                    sleeper.sleep(delay).await;
                }
            }
        }
    }

    error!(max_attempts, "Max retries reached, giving up");
    Err(ConnectError::Exhausted {
        attempts: max_attempts,
    })
}
