//! Background task event processing.

use crate::app::{App, AppEvent};
use tokio::sync::mpsc;

/// Apply one completed background task to the app state.
///
/// `event_tx` is needed because a completed login or logout reloads the
/// page, which spawns the next page's boot tasks.
pub fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::SessionResolved { page, state } => {
            tracing::debug!(page, logged_in = state.logged_in, "Session check completed");
            app.handle_session_resolved(page, state);
        }
        AppEvent::FeedLoaded {
            generation,
            filter,
            result,
        } => {
            app.handle_feed_loaded(generation, filter, result);
        }
        AppEvent::RecommendationsLoaded { page, articles } => {
            app.handle_recommendations_loaded(page, articles);
        }
        AppEvent::AuthCompleted {
            page,
            mode,
            outcome,
        } => {
            app.handle_auth_completed(page, mode, outcome, event_tx);
        }
        AppEvent::LogoutCompleted { page, result } => {
            app.handle_logout_completed(page, result, event_tx);
        }
    }
}
