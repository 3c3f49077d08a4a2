//! Login-gated recommendations panel.
//!
//! Recommendations are non-critical: nothing is requested until the
//! session resolves to logged in, failures are swallowed by the client, and
//! the panel stays hidden unless at least one article comes back.

use crate::api::{Article, NewsClient};
use crate::app::AppEvent;
use crate::session::SessionCell;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Visibility and contents of the recommendations panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RecommendationsRegion {
    #[default]
    Hidden,
    Visible(Vec<Article>),
}

impl RecommendationsRegion {
    pub fn is_visible(&self) -> bool {
        matches!(self, RecommendationsRegion::Visible(_))
    }

    pub fn articles(&self) -> &[Article] {
        match self {
            RecommendationsRegion::Visible(articles) => articles,
            RecommendationsRegion::Hidden => &[],
        }
    }
}

#[derive(Debug, Default)]
pub struct RecommendationController {
    region: RecommendationsRegion,
}

impl RecommendationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self) -> &RecommendationsRegion {
        &self.region
    }

    /// Render a fetched list. An empty list keeps the panel hidden.
    pub fn apply(&mut self, articles: Vec<Article>) {
        if articles.is_empty() {
            tracing::debug!("No recommendations, panel stays hidden");
            return;
        }
        tracing::debug!(count = articles.len(), "Showing recommendations");
        self.region = RecommendationsRegion::Visible(articles);
    }

    /// Hide the panel (used when the page reloads).
    pub fn reset(&mut self) {
        self.region = RecommendationsRegion::Hidden;
    }

    /// Spawn the gated load for the page identified by `page`.
    ///
    /// The task waits for `session` to resolve. Logged-out sessions produce
    /// no request and no event.
    pub fn maybe_load(
        client: &NewsClient,
        session: &SessionCell,
        page: u64,
        event_tx: &mpsc::Sender<AppEvent>,
    ) -> JoinHandle<()> {
        let client = client.clone();
        let session = session.clone();
        let tx = event_tx.clone();

        tokio::spawn(async move {
            let Some(articles) = fetch_if_logged_in(&client, &session).await else {
                return;
            };
            if let Err(e) = tx
                .send(AppEvent::RecommendationsLoaded { page, articles })
                .await
            {
                tracing::warn!(error = %e, "Failed to send recommendations (receiver dropped)");
            }
        })
    }
}

/// Await session resolution, then fetch recommendations if logged in.
///
/// Returns `None` without touching the network for logged-out sessions.
pub async fn fetch_if_logged_in(client: &NewsClient, session: &SessionCell) -> Option<Vec<Article>> {
    let state = session.resolved().await;
    if !state.logged_in {
        tracing::debug!("Skipping recommendations for logged-out session");
        return None;
    }
    Some(client.fetch_recommendations().await)
}
