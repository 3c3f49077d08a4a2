use crate::api::{Article, NewsClient};
use crate::auth::{self, AuthForm, AuthMode, AuthOutcome};
use crate::config::Config;
use crate::feed::{FeedController, FilterState};
use crate::nav::{self, NavView};
use crate::recommendations::RecommendationController;
use crate::session::{self, SessionCell, SessionState};
use crate::tracker::InteractionTracker;
use crate::util::{validate_url_for_open, MAX_SEARCH_QUERY_LENGTH};
use std::borrow::Cow;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// Which article list has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Feed,
    Recommendations,
}

/// Events from background tasks.
///
/// Page-scoped events carry the `page` epoch they were spawned under; the
/// handler drops them when the page has been reloaded since.
#[derive(Debug)]
pub enum AppEvent {
    /// The session check for `page` finished.
    SessionResolved { page: u64, state: SessionState },
    /// A feed load finished.
    ///
    /// Fields:
    /// - `generation`: Sequence number issued when the load started
    /// - `filter`: The filter the load was issued for
    /// - `result`: The articles, or an error description
    FeedLoaded {
        generation: u64,
        filter: FilterState,
        result: Result<Vec<Article>, String>,
    },
    /// Recommendations fetched for a logged-in `page`.
    RecommendationsLoaded { page: u64, articles: Vec<Article> },
    /// A login or registration request finished.
    AuthCompleted {
        page: u64,
        mode: AuthMode,
        outcome: AuthOutcome,
    },
    /// The logout request finished.
    LogoutCompleted {
        page: u64,
        result: Result<(), String>,
    },
}

/// Central application state.
///
/// One "page" is the span between two calls to [`App::reload`]. Everything
/// tied to the login state (session cell, nav, recommendations, dialog) is
/// rebuilt on reload; the feed controller survives so its sequence numbers
/// keep increasing and a response from before the reload can never match.
pub struct App {
    pub client: NewsClient,
    pub session: SessionCell,
    /// Page epoch, bumped by every reload.
    pub page: u64,

    pub feed: FeedController,
    pub recommendations: RecommendationController,
    pub tracker: InteractionTracker,
    pub nav: NavView,

    /// Category tabs in display order.
    pub categories: Vec<String>,
    /// Filter applied when a page boots.
    pub initial_filter: FilterState,

    // UI state
    pub focus: Focus,
    pub selected_article: usize,
    pub selected_recommendation: usize,
    pub search_mode: bool,
    pub search_input: String,
    /// Open login/register dialog, if any.
    pub auth_form: Option<AuthForm>,
    pub show_help: bool,
    pub open_links: bool,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Set whenever state changes; the loop only draws when this is true.
    pub needs_redraw: bool,

    session_handle: Option<JoinHandle<()>>,
    recommendations_handle: Option<JoinHandle<()>>,
    feed_handle: Option<JoinHandle<()>>,
    logout_in_flight: bool,
}

impl App {
    pub fn new(client: NewsClient, config: &Config, initial_filter: FilterState) -> Self {
        let session = SessionCell::new();
        let tracker = InteractionTracker::new(client.clone(), session.clone());

        Self {
            client,
            session,
            page: 0,
            feed: FeedController::new(),
            recommendations: RecommendationController::new(),
            tracker,
            nav: NavView::pending(),
            categories: config.categories.clone(),
            initial_filter,
            focus: Focus::Feed,
            selected_article: 0,
            selected_recommendation: 0,
            search_mode: false,
            search_input: String::new(),
            auth_form: None,
            show_help: false,
            open_links: config.open_links,
            status_message: None,
            needs_redraw: true,
            session_handle: None,
            recommendations_handle: None,
            feed_handle: None,
            logout_in_flight: false,
        }
    }

    /// Run the page initialization sequence.
    ///
    /// The session check, the gated recommendations load and the initial
    /// feed load start together; the feed does not wait for the session.
    pub fn bootstrap(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        tracing::info!(page = self.page, base_url = %self.client.base_url(), "Booting page");

        let client = self.client.clone();
        let cell = self.session.clone();
        let tx = event_tx.clone();
        let page = self.page;
        self.session_handle = Some(tokio::spawn(async move {
            let state = session::resolve_session(&client, &cell).await;
            if let Err(e) = tx.send(AppEvent::SessionResolved { page, state }).await {
                tracing::warn!(error = %e, "Failed to send session state (receiver dropped)");
            }
        }));

        self.recommendations_handle = Some(RecommendationController::maybe_load(
            &self.client,
            &self.session,
            page,
            event_tx,
        ));

        let filter = self.initial_filter.clone();
        self.load_feed(filter, event_tx);
    }

    /// Discard all page state and boot again.
    pub fn reload(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        self.page = self.page.wrapping_add(1);
        tracing::info!(page = self.page, "Reloading page");

        if let Some(handle) = self.recommendations_handle.take() {
            handle.abort();
        }
        // The previous session check keeps running: trackers spawned on the
        // old page still wait on its cell.
        self.session_handle = None;

        self.session = SessionCell::new();
        self.tracker = InteractionTracker::new(self.client.clone(), self.session.clone());
        self.nav = NavView::pending();
        self.recommendations.reset();
        self.auth_form = None;
        self.search_mode = false;
        self.search_input.clear();
        self.show_help = false;
        self.focus = Focus::Feed;
        self.selected_article = 0;
        self.selected_recommendation = 0;
        self.logout_in_flight = false;
        self.needs_redraw = true;

        self.bootstrap(event_tx);
    }

    fn is_current_page(&self, page: u64, what: &str) -> bool {
        if page != self.page {
            tracing::debug!(
                expected = self.page,
                got = page,
                event = what,
                "Ignoring event from a previous page"
            );
            return false;
        }
        true
    }

    // ------------------------------------------------------------------
    // Background completions
    // ------------------------------------------------------------------

    pub fn handle_session_resolved(&mut self, page: u64, state: SessionState) {
        if !self.is_current_page(page, "session") {
            return;
        }
        self.nav = nav::render(&state);
        self.needs_redraw = true;
    }

    pub fn handle_feed_loaded(
        &mut self,
        generation: u64,
        filter: FilterState,
        result: Result<Vec<Article>, String>,
    ) {
        if self.feed.apply(generation, result) {
            self.selected_article = 0;
            self.needs_redraw = true;
        } else {
            tracing::debug!(filter = %filter.describe(), "Dropped superseded feed response");
        }
    }

    pub fn handle_recommendations_loaded(&mut self, page: u64, articles: Vec<Article>) {
        if !self.is_current_page(page, "recommendations") {
            return;
        }
        self.recommendations.apply(articles);
        self.selected_recommendation = 0;
        self.needs_redraw = true;
    }

    pub fn handle_auth_completed(
        &mut self,
        page: u64,
        mode: AuthMode,
        outcome: AuthOutcome,
        event_tx: &mpsc::Sender<AppEvent>,
    ) {
        if !self.is_current_page(page, "auth") {
            return;
        }

        if let AuthOutcome::LoggedIn { username } = &outcome {
            tracing::info!(username = %username, "Logged in");
            self.reload(event_tx);
            return;
        }

        match self.auth_form.as_mut() {
            Some(form) if form.mode == mode => form.finish(&outcome),
            // Dialog was closed or switched while the request was in flight
            _ => {
                if let AuthOutcome::Failed(message) = outcome {
                    self.set_status(message);
                }
            }
        }
        self.needs_redraw = true;
    }

    pub fn handle_logout_completed(
        &mut self,
        page: u64,
        result: Result<(), String>,
        event_tx: &mpsc::Sender<AppEvent>,
    ) {
        if !self.is_current_page(page, "logout") {
            return;
        }
        self.logout_in_flight = false;
        match result {
            Ok(()) => self.reload(event_tx),
            Err(e) => tracing::warn!(error = %e, "Logout failed"),
        }
    }

    // ------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------

    pub fn load_feed(&mut self, filter: FilterState, event_tx: &mpsc::Sender<AppEvent>) {
        self.feed_handle = Some(self.feed.load_feed(&self.client, filter, event_tx));
        self.selected_article = 0;
        self.needs_redraw = true;
    }

    /// Submit the search box. Returns `false` when the query was rejected.
    pub fn submit_search(&mut self, event_tx: &mpsc::Sender<AppEvent>) -> bool {
        self.search_mode = false;
        let query = std::mem::take(&mut self.search_input);
        if query.chars().count() > MAX_SEARCH_QUERY_LENGTH {
            self.set_status(format!(
                "Search query too long (max {} characters)",
                MAX_SEARCH_QUERY_LENGTH
            ));
            return false;
        }
        self.feed_handle = Some(self.feed.search(&self.client, &query, event_tx));
        self.selected_article = 0;
        self.needs_redraw = true;
        true
    }

    /// Filter by the category at `index` in the tab list.
    pub fn select_category(&mut self, index: usize, event_tx: &mpsc::Sender<AppEvent>) {
        let Some(name) = self.categories.get(index).cloned() else {
            return;
        };
        self.feed_handle = Some(self.feed.select_category(&self.client, &name, event_tx));
        self.selected_article = 0;
        self.needs_redraw = true;
    }

    /// Move the category filter one tab left or right, wrapping around.
    /// With no active category, forward starts at the first tab.
    pub fn cycle_category(&mut self, forward: bool, event_tx: &mpsc::Sender<AppEvent>) {
        let count = self.categories.len();
        if count == 0 {
            return;
        }
        let current = self
            .feed
            .active_category()
            .and_then(|active| self.categories.iter().position(|c| c == active));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
            (None, true) => 0,
            (None, false) => count - 1,
        };
        self.select_category(next, event_tx);
    }

    pub fn show_all(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        self.load_feed(FilterState::all(), event_tx);
    }

    pub fn retry(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        self.feed_handle = Some(self.feed.retry(&self.client, event_tx));
        self.selected_article = 0;
        self.needs_redraw = true;
    }

    /// Log out, if the nav currently offers it.
    ///
    /// Any answer from the server reloads the page, since the server side
    /// of the session may have changed even when it reports an error. Only
    /// a request that never got an answer leaves the page as it is.
    pub fn logout(&mut self, event_tx: &mpsc::Sender<AppEvent>) -> bool {
        if !self.nav.show_logout || self.logout_in_flight {
            return false;
        }
        self.logout_in_flight = true;

        let client = self.client.clone();
        let tx = event_tx.clone();
        let page = self.page;
        tokio::spawn(async move {
            let result = match client.logout().await {
                Ok(()) => Ok(()),
                Err(e) if e.is_transport() => Err(e.to_string()),
                Err(e) => {
                    tracing::warn!(error = %e, "Logout rejected by server, reloading anyway");
                    Ok(())
                }
            };
            if let Err(e) = tx.send(AppEvent::LogoutCompleted { page, result }).await {
                tracing::warn!(error = %e, "Failed to send logout result (receiver dropped)");
            }
        });
        true
    }

    /// Open the login or register dialog. Only possible once the session
    /// has resolved and the nav shows the matching control.
    pub fn open_auth_dialog(&mut self, mode: AuthMode) -> bool {
        let offered = match mode {
            AuthMode::Login => self.nav.show_login,
            AuthMode::Register => self.nav.show_register,
        };
        if !offered {
            return false;
        }
        self.auth_form = Some(AuthForm::new(mode));
        self.needs_redraw = true;
        true
    }

    pub fn close_auth_dialog(&mut self) {
        self.auth_form = None;
        self.needs_redraw = true;
    }

    pub fn submit_auth(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        let page = self.page;
        let Some(form) = self.auth_form.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        if let Some((username, password)) = form.take_credentials() {
            auth::spawn_submit(&self.client, form.mode, username, password, page, event_tx);
        }
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    fn visible_len(&self) -> usize {
        match self.focus {
            Focus::Feed => self.feed.region().articles().len(),
            Focus::Recommendations => self.recommendations.region().articles().len(),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.focus {
            Focus::Feed => &mut self.selected_article,
            Focus::Recommendations => &mut self.selected_recommendation,
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        let cursor = self.cursor_mut();
        if *cursor + 1 < len {
            *cursor += 1;
        }
        self.needs_redraw = true;
    }

    pub fn select_prev(&mut self) {
        let cursor = self.cursor_mut();
        *cursor = cursor.saturating_sub(1);
        self.needs_redraw = true;
    }

    /// Switch between the feed and the recommendations panel (when shown).
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Feed if self.recommendations.region().is_visible() => Focus::Recommendations,
            _ => Focus::Feed,
        };
        self.needs_redraw = true;
    }

    /// The article under the cursor in the focused list.
    pub fn selected(&self) -> Option<&Article> {
        match self.focus {
            Focus::Feed => self.feed.region().articles().get(self.selected_article),
            Focus::Recommendations => self
                .recommendations
                .region()
                .articles()
                .get(self.selected_recommendation),
        }
    }

    /// Follow the selected article's link and record the click.
    ///
    /// Tracking is spawned first and never waited on.
    pub fn open_selected(&mut self) {
        let Some(article) = self.selected() else {
            return;
        };
        let id = article.id.clone();
        let link = validate_url_for_open(&article.url);

        drop(self.tracker.track(id));

        let url = match link {
            Ok(url) => url,
            Err(e) => {
                self.set_status(e.to_string());
                return;
            }
        };
        if !self.open_links {
            self.set_status(format!("Link: {}", url));
            return;
        }
        if let Err(e) = open::that(url.as_str()) {
            tracing::warn!(url = %url, error = %e, "Failed to open link");
            self.set_status(format!("Failed to open link: {}", e));
        }
    }

    // ------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

impl Drop for App {
    fn drop(&mut self) {
        for handle in [
            self.session_handle.take(),
            self.recommendations_handle.take(),
            self.feed_handle.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
        tracing::debug!("Aborted page tasks on App drop");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ArticleId, DEFAULT_TIMEOUT};
    use crate::feed::FeedRegion;
    use tokio::time::{self, Duration};

    fn test_app() -> App {
        let client = NewsClient::new("http://127.0.0.1:1", DEFAULT_TIMEOUT).unwrap();
        App::new(client, &Config::default(), FilterState::all())
    }

    fn article(id: u32) -> Article {
        Article {
            id: ArticleId::new(id.to_string()),
            title: format!("Article {}", id),
            description: None,
            url: format!("https://example.com/{}", id),
            image_url: None,
            source: None,
            published_at: None,
            category: None,
        }
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_auth_dialog_gated_on_nav() {
        let mut app = test_app();
        assert!(!app.open_auth_dialog(AuthMode::Login));
        assert!(app.auth_form.is_none());

        app.handle_session_resolved(0, SessionState::logged_out());
        assert!(app.open_auth_dialog(AuthMode::Register));
        assert_eq!(app.auth_form.as_ref().map(|f| f.mode), Some(AuthMode::Register));
    }

    #[tokio::test]
    async fn test_logout_requires_logged_in_nav() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        assert!(!app.logout(&tx));

        app.handle_session_resolved(0, SessionState::logged_out());
        assert!(!app.logout(&tx));
    }

    #[tokio::test]
    async fn test_events_from_old_page_ignored() {
        let mut app = test_app();
        app.page = 2;

        app.handle_session_resolved(1, SessionState::logged_in("alice"));
        assert!(app.nav.is_pending());

        app.handle_recommendations_loaded(1, vec![article(1)]);
        assert!(!app.recommendations.region().is_visible());

        app.handle_recommendations_loaded(2, vec![article(1)]);
        assert!(app.recommendations.region().is_visible());
    }

    #[tokio::test]
    async fn test_overlong_search_rejected() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        let before = app.feed.generation();

        app.search_input = "x".repeat(MAX_SEARCH_QUERY_LENGTH + 1);
        assert!(!app.submit_search(&tx));
        assert_eq!(app.feed.generation(), before);
        assert!(app.status_message.is_some());
        assert!(app.search_input.is_empty());
    }

    #[tokio::test]
    async fn test_cycle_category_wraps() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        app.cycle_category(false, &tx);
        assert_eq!(app.feed.active_category(), Some("technology"));
        app.cycle_category(true, &tx);
        assert_eq!(app.feed.active_category(), Some("business"));
        assert_eq!(app.feed.region(), &FeedRegion::Loading);
    }

    #[tokio::test]
    async fn test_selection_clamps_and_focus_needs_panel() {
        let mut app = test_app();
        let generation = app.feed.begin(FilterState::all());
        app.handle_feed_loaded(generation, FilterState::all(), Ok(vec![article(1), article(2)]));

        app.select_next();
        app.select_next();
        assert_eq!(app.selected_article, 1);
        app.select_prev();
        app.select_prev();
        assert_eq!(app.selected_article, 0);

        app.toggle_focus();
        assert_eq!(app.focus, Focus::Feed);
        app.handle_recommendations_loaded(0, vec![article(9)]);
        app.toggle_focus();
        assert_eq!(app.focus, Focus::Recommendations);
        assert_eq!(app.selected().map(|a| a.id.as_str()), Some("9"));
    }

    #[tokio::test]
    async fn test_reload_resets_page_state() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        app.handle_session_resolved(0, SessionState::logged_in("alice"));
        app.handle_recommendations_loaded(0, vec![article(1)]);
        let old_session = app.session.clone();
        let old_generation = app.feed.generation();

        app.reload(&tx);

        assert_eq!(app.page, 1);
        assert!(app.nav.is_pending());
        assert!(!app.recommendations.region().is_visible());
        assert!(app.feed.generation() > old_generation);
        assert!(!app.session.is_resolved());
        old_session.resolve(SessionState::logged_out());
        assert!(!app.session.is_resolved());
    }
}
