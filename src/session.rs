//! Resolve-once session state.
//!
//! A [`SessionCell`] starts unresolved when a page boots and is written
//! exactly once by the session check. Components that depend on the login
//! state await [`SessionCell::resolved`] instead of reading a default, so a
//! "logged out" answer is never assumed while the check is still in flight.
//!
//! Logging out does not move the cell back to unresolved. The page is
//! reloaded instead, which creates a fresh cell.

use crate::api::{NewsClient, SessionStatus};
use std::sync::Arc;
use tokio::sync::watch;

/// Resolved authentication state for one page lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub logged_in: bool,
    pub username: Option<String>,
}

impl SessionState {
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn logged_in(username: impl Into<String>) -> Self {
        Self {
            logged_in: true,
            username: Some(username.into()),
        }
    }
}

impl From<SessionStatus> for SessionState {
    fn from(status: SessionStatus) -> Self {
        Self {
            logged_in: status.logged_in,
            // A username without a session is meaningless
            username: status.username.filter(|_| status.logged_in),
        }
    }
}

/// Single-writer, many-reader cell holding the page's session state.
///
/// Clones share the same slot.
#[derive(Debug, Clone)]
pub struct SessionCell {
    slot: Arc<watch::Sender<Option<SessionState>>>,
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCell {
    /// Create an unresolved cell.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { slot: Arc::new(tx) }
    }

    /// Store the resolved state.
    ///
    /// Only the first call takes effect; later calls are ignored and return
    /// `false`.
    pub fn resolve(&self, state: SessionState) -> bool {
        let written = self.slot.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(state.clone());
            true
        });

        if written {
            tracing::debug!(logged_in = state.logged_in, "Session resolved");
        } else {
            tracing::warn!("Ignoring second session resolution for this page");
        }
        written
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Wait for the session to resolve and return a snapshot of it.
    pub async fn resolved(&self) -> SessionState {
        let mut rx = self.slot.subscribe();
        let state = match rx.wait_for(Option::is_some).await {
            Ok(state) => state.clone().unwrap_or_default(),
            // The sender lives in `self`, so the channel cannot close while
            // we hold it; fall back to logged out rather than panic.
            Err(_) => SessionState::logged_out(),
        };
        state
    }
}

/// Query the service once and store the answer in `cell`.
///
/// A failed check resolves to logged out.
pub async fn resolve_session(client: &NewsClient, cell: &SessionCell) -> SessionState {
    let state = SessionState::from(client.check_session().await);
    cell.resolve(state.clone());
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_cell_is_unresolved() {
        let cell = SessionCell::new();
        assert!(!cell.is_resolved());
    }

    #[tokio::test]
    async fn test_resolve_only_once() {
        let cell = SessionCell::new();
        assert!(cell.resolve(SessionState::logged_in("alice")));
        assert!(!cell.resolve(SessionState::logged_out()));
        assert_eq!(cell.resolved().await, SessionState::logged_in("alice"));
    }

    #[test]
    fn test_clones_share_state() {
        let cell = SessionCell::new();
        let reader = cell.clone();
        cell.resolve(SessionState::logged_out());
        assert!(reader.is_resolved());
    }

    #[tokio::test]
    async fn test_resolved_waits_for_writer() {
        let cell = SessionCell::new();
        let reader = cell.clone();
        let waiter = tokio::spawn(async move { reader.resolved().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        cell.resolve(SessionState::logged_in("bob"));
        let state = waiter.await.unwrap();
        assert_eq!(state.username.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn test_resolved_returns_immediately_once_resolved() {
        let cell = SessionCell::new();
        cell.resolve(SessionState::logged_out());
        let state = tokio::time::timeout(Duration::from_millis(100), cell.resolved())
            .await
            .unwrap();
        assert!(!state.logged_in);
    }

    #[test]
    fn test_status_conversion_drops_stray_username() {
        let state = SessionState::from(SessionStatus {
            logged_in: false,
            username: Some("ghost".to_string()),
        });
        assert_eq!(state, SessionState::logged_out());
    }
}
