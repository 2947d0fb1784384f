//! Scoped session release
//!
//! Closing a connection is async, so it cannot happen in `Drop`. Callers hold
//! the session in a [`SessionScope`] and call [`SessionScope::release`] once on
//! every exit path. Releasing a scope that never acquired a session is a no-op.

use crate::db::Session;
use tracing::{debug, warn};

pub struct SessionScope<S: Session> {
    session: Option<S>,
}

impl<S: Session> SessionScope<S> {
    /// A scope that holds nothing yet
    pub fn empty() -> Self {
        Self { session: None }
    }

    /// Take ownership of a freshly opened session and lend it back
    pub fn acquire(&mut self, session: S) -> &mut S {
        self.session.insert(session)
    }

    /// The held session, if acquisition succeeded
    pub fn session(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    pub fn is_acquired(&self) -> bool {
        self.session.is_some()
    }

    /// Close the session if there is one. Close errors are logged, not returned.
    pub async fn release(self) {
        let Some(session) = self.session else {
            return;
        };

        match session.close().await {
            Ok(()) => debug!("Connection closed"),
            Err(e) => warn!(error = %e, "Failed to close connection cleanly"),
        }
    }
}
