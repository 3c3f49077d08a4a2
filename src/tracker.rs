//! Best-effort click-through recording.
//!
//! Tracking runs on its own task so the article link opens immediately;
//! the task waits for the session to resolve and records the interaction
//! only for logged-in users. Failures are logged and otherwise ignored.

use crate::api::{ArticleId, NewsClient};
use crate::session::SessionCell;
use tokio::task::JoinHandle;

/// What happened to one tracking attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Session resolved logged out; no request was made.
    Skipped,
    Recorded,
    /// The request failed; already logged.
    Failed,
}

#[derive(Debug, Clone)]
pub struct InteractionTracker {
    client: NewsClient,
    session: SessionCell,
}

impl InteractionTracker {
    pub fn new(client: NewsClient, session: SessionCell) -> Self {
        Self { client, session }
    }

    /// Record a click on `article_id` in the background.
    ///
    /// Returns immediately. Callers normally drop the handle.
    pub fn track(&self, article_id: ArticleId) -> JoinHandle<TrackOutcome> {
        let tracker = self.clone();
        tokio::spawn(async move { tracker.record(&article_id).await })
    }

    async fn record(&self, article_id: &ArticleId) -> TrackOutcome {
        let state = self.session.resolved().await;
        if !state.logged_in {
            tracing::trace!(article_id = %article_id, "Not logged in, interaction not recorded");
            return TrackOutcome::Skipped;
        }

        match self.client.record_interaction(article_id).await {
            Ok(()) => {
                tracing::debug!(article_id = %article_id, "Interaction recorded");
                TrackOutcome::Recorded
            }
            Err(e) => {
                tracing::warn!(article_id = %article_id, error = %e, "Failed to record interaction");
                TrackOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DEFAULT_TIMEOUT;
    use crate::session::SessionState;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn interactions_server(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interactions"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    async fn request_count(server: &MockServer) -> usize {
        server.received_requests().await.unwrap_or_default().len()
    }

    #[tokio::test]
    async fn test_logged_out_is_noop() {
        let server = interactions_server(201).await;
        let session = SessionCell::new();
        session.resolve(SessionState::logged_out());
        let tracker = InteractionTracker::new(
            NewsClient::new(&server.uri(), DEFAULT_TIMEOUT).unwrap(),
            session,
        );

        let outcome = tracker.track(ArticleId::new("9")).await.unwrap();
        assert_eq!(outcome, TrackOutcome::Skipped);
        assert_eq!(request_count(&server).await, 0);
    }

    #[tokio::test]
    async fn test_logged_in_records_once() {
        let server = interactions_server(201).await;
        let session = SessionCell::new();
        session.resolve(SessionState::logged_in("alice"));
        let tracker = InteractionTracker::new(
            NewsClient::new(&server.uri(), DEFAULT_TIMEOUT).unwrap(),
            session,
        );

        let outcome = tracker.track(ArticleId::new("9")).await.unwrap();
        assert_eq!(outcome, TrackOutcome::Recorded);
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_waits_for_resolution() {
        let server = interactions_server(201).await;
        let session = SessionCell::new();
        let tracker = InteractionTracker::new(
            NewsClient::new(&server.uri(), DEFAULT_TIMEOUT).unwrap(),
            session.clone(),
        );

        let handle = tracker.track(ArticleId::new("9"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(request_count(&server).await, 0);

        session.resolve(SessionState::logged_in("alice"));
        assert_eq!(handle.await.unwrap(), TrackOutcome::Recorded);
    }

    #[tokio::test]
    async fn test_server_failure_is_swallowed() {
        let server = interactions_server(500).await;
        let session = SessionCell::new();
        session.resolve(SessionState::logged_in("alice"));
        let tracker = InteractionTracker::new(
            NewsClient::new(&server.uri(), DEFAULT_TIMEOUT).unwrap(),
            session,
        );

        assert_eq!(
            tracker.track(ArticleId::new("9")).await.unwrap(),
            TrackOutcome::Failed
        );
    }
}
