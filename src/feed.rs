//! Article feed orchestration.
//!
//! Every filter change goes through [`FeedController::load_feed`]: the feed
//! region switches to a loading placeholder, exactly one request is issued,
//! and the response is applied only if no newer load has been started since.
//! Superseded requests are not cancelled; their responses are dropped when
//! they arrive ("last request wins").

use crate::api::{Article, NewsClient};
use crate::app::AppEvent;
use crate::util::catch_task_panic;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const LOADING_MESSAGE: &str = "Loading...";
pub const EMPTY_MESSAGE: &str = "No articles found.";
pub const FAILED_MESSAGE: &str = "Failed to load news. Please try again later.";

/// The active feed filter.
///
/// Query and category are mutually exclusive: the constructors never set
/// both, so selecting a category clears the query and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    query: String,
    category: Option<String>,
}

impl FilterState {
    /// No constraint on either axis.
    pub fn all() -> Self {
        Self::default()
    }

    /// Free-text search. A blank query means "no constraint".
    pub fn search(query: &str) -> Self {
        Self {
            query: query.trim().to_string(),
            category: None,
        }
    }

    /// Category filter. A blank name means "no constraint".
    pub fn category(name: &str) -> Self {
        let name = name.trim();
        Self {
            query: String::new(),
            category: (!name.is_empty()).then(|| name.to_string()),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.query.is_empty() && self.category.is_none()
    }

    /// Short label for panel titles and logs.
    pub fn describe(&self) -> String {
        match (&self.category, self.query.is_empty()) {
            (Some(category), _) => format!("Category: {}", crate::util::capitalize(category)),
            (None, false) => format!("Search: {}", self.query),
            (None, true) => "Latest".to_string(),
        }
    }
}

/// What the feed region currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeedRegion {
    #[default]
    Loading,
    Articles(Vec<Article>),
    Empty,
    Failed,
}

impl FeedRegion {
    /// Placeholder text, or `None` when articles are shown.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            FeedRegion::Loading => Some(LOADING_MESSAGE),
            FeedRegion::Articles(_) => None,
            FeedRegion::Empty => Some(EMPTY_MESSAGE),
            FeedRegion::Failed => Some(FAILED_MESSAGE),
        }
    }

    pub fn articles(&self) -> &[Article] {
        match self {
            FeedRegion::Articles(articles) => articles,
            _ => &[],
        }
    }
}

/// Owns the feed region, the active filter and the request sequence.
#[derive(Debug, Default)]
pub struct FeedController {
    region: FeedRegion,
    filter: FilterState,
    /// Sequence number of the most recently issued load.
    generation: u64,
}

impl FeedController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self) -> &FeedRegion {
        &self.region
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The category tab to highlight. At most one, and none during a search.
    pub fn active_category(&self) -> Option<&str> {
        self.filter.category_name()
    }

    /// Start a load: record the filter, show the placeholder and return the
    /// sequence number the response must carry to be applied.
    pub fn begin(&mut self, filter: FilterState) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.filter = filter;
        self.region = FeedRegion::Loading;
        self.generation
    }

    /// Apply a response. Returns `false` (and changes nothing) when a newer
    /// load has been started since `generation` was issued.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<Article>, String>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = generation,
                "Ignoring stale feed response (generation mismatch)"
            );
            return false;
        }

        self.region = match result {
            Ok(articles) if articles.is_empty() => FeedRegion::Empty,
            Ok(articles) => {
                tracing::debug!(count = articles.len(), filter = %self.filter.describe(), "Feed loaded");
                FeedRegion::Articles(articles)
            }
            Err(e) => {
                tracing::warn!(error = %e, filter = %self.filter.describe(), "Feed load failed");
                FeedRegion::Failed
            }
        };
        true
    }

    /// Show the placeholder and spawn the request for `filter`.
    ///
    /// The response comes back as [`AppEvent::FeedLoaded`] and must be
    /// passed to [`apply`](Self::apply).
    pub fn load_feed(
        &mut self,
        client: &NewsClient,
        filter: FilterState,
        event_tx: &mpsc::Sender<AppEvent>,
    ) -> JoinHandle<()> {
        let generation = self.begin(filter.clone());
        let client = client.clone();
        let tx = event_tx.clone();

        tracing::debug!(generation, filter = %filter.describe(), "Spawning feed load");

        tokio::spawn(async move {
            let fetch = client.fetch_articles(Some(filter.query()), filter.category_name());
            let result = match catch_task_panic(fetch).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(panic_msg) => {
                    tracing::error!(error = %panic_msg, "Feed load task panicked");
                    Err(panic_msg)
                }
            };

            let event = AppEvent::FeedLoaded {
                generation,
                filter,
                result,
            };
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "Failed to send feed results (receiver dropped)");
            }
        })
    }

    /// Free-text search; clears any category filter.
    pub fn search(
        &mut self,
        client: &NewsClient,
        query: &str,
        event_tx: &mpsc::Sender<AppEvent>,
    ) -> JoinHandle<()> {
        self.load_feed(client, FilterState::search(query), event_tx)
    }

    /// Category filter; clears any search query.
    pub fn select_category(
        &mut self,
        client: &NewsClient,
        category: &str,
        event_tx: &mpsc::Sender<AppEvent>,
    ) -> JoinHandle<()> {
        self.load_feed(client, FilterState::category(category), event_tx)
    }

    /// Re-issue the current filter.
    pub fn retry(
        &mut self,
        client: &NewsClient,
        event_tx: &mpsc::Sender<AppEvent>,
    ) -> JoinHandle<()> {
        let filter = self.filter.clone();
        self.load_feed(client, filter, event_tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ArticleId;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn article(id: u32, title: &str) -> Article {
        Article {
            id: ArticleId::new(id.to_string()),
            title: title.to_string(),
            description: None,
            url: format!("https://example.com/{}", id),
            image_url: None,
            source: None,
            published_at: None,
            category: None,
        }
    }

    #[test]
    fn test_filters_are_mutually_exclusive() {
        let search = FilterState::search("  bitcoin ");
        assert_eq!(search.query(), "bitcoin");
        assert_eq!(search.category_name(), None);

        let category = FilterState::category("sports");
        assert_eq!(category.query(), "");
        assert_eq!(category.category_name(), Some("sports"));
    }

    #[test]
    fn test_blank_filters_are_unfiltered() {
        assert!(FilterState::search("   ").is_unfiltered());
        assert!(FilterState::category("").is_unfiltered());
        assert!(FilterState::all().is_unfiltered());
    }

    #[test]
    fn test_describe() {
        assert_eq!(FilterState::all().describe(), "Latest");
        assert_eq!(FilterState::search("rust").describe(), "Search: rust");
        assert_eq!(FilterState::category("health").describe(), "Category: Health");
    }

    #[test]
    fn test_begin_shows_placeholder() {
        let mut feed = FeedController::new();
        let generation = feed.begin(FilterState::all());
        assert!(feed.apply(generation, Err("boom".to_string())));
        assert_eq!(feed.region(), &FeedRegion::Failed);

        feed.begin(FilterState::search("bitcoin"));
        assert_eq!(feed.region(), &FeedRegion::Loading);
        assert_eq!(feed.region().message(), Some(LOADING_MESSAGE));
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let mut feed = FeedController::new();
        let generation = feed.begin(FilterState::category("technology"));
        feed.apply(generation, Ok(Vec::new()));
        assert_eq!(feed.region(), &FeedRegion::Empty);
        assert_eq!(feed.region().message(), Some(EMPTY_MESSAGE));
    }

    #[test]
    fn test_success_after_failure_replaces_error() {
        let mut feed = FeedController::new();
        let first = feed.begin(FilterState::all());
        feed.apply(first, Err("connection refused".to_string()));
        assert_eq!(feed.region().message(), Some(FAILED_MESSAGE));

        let second = feed.begin(FilterState::search("bitcoin"));
        feed.apply(second, Ok(vec![article(1, "Bitcoin hits new high")]));
        assert_eq!(feed.region().message(), None);
        assert_eq!(feed.region().articles().len(), 1);
    }

    #[test]
    fn test_stale_response_dropped() {
        let mut feed = FeedController::new();
        let sports = feed.begin(FilterState::category("sports"));
        let health = feed.begin(FilterState::category("health"));

        assert!(feed.apply(health, Ok(vec![article(2, "Health news")])));
        assert!(!feed.apply(sports, Ok(vec![article(1, "Sports news")])));

        assert_eq!(feed.region().articles()[0].title, "Health news");
        assert_eq!(feed.active_category(), Some("health"));
    }

    #[test]
    fn test_search_clears_active_category() {
        let mut feed = FeedController::new();
        feed.begin(FilterState::category("sports"));
        assert_eq!(feed.active_category(), Some("sports"));
        feed.begin(FilterState::search("olympics"));
        assert_eq!(feed.active_category(), None);
    }

    proptest! {
        /// Whatever order responses arrive in, only the last-issued load
        /// ends up rendered.
        #[test]
        fn prop_last_request_wins(
            arrival in (1usize..8).prop_flat_map(|n| Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
        ) {
            let count = arrival.len();
            let mut feed = FeedController::new();
            let generations: Vec<u64> = (0..count)
                .map(|i| feed.begin(FilterState::search(&format!("q{}", i))))
                .collect();

            for idx in arrival {
                feed.apply(generations[idx], Ok(vec![article(idx as u32, &format!("result {}", idx))]));
            }

            let rendered = feed.region().articles();
            prop_assert_eq!(rendered.len(), 1);
            prop_assert_eq!(&rendered[0].title, &format!("result {}", count - 1));
            prop_assert_eq!(feed.filter().query(), format!("q{}", count - 1));
        }
    }
}
