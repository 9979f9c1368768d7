//! Search controller: query text, results, loading and error state.
//!
//! The controller does no I/O. [`SearchController::update`] takes a
//! [`Message`] and returns an [`Action`] for the driver (browser or terminal)
//! to perform. Every dispatched fetch carries a request token; only the
//! response for the most recent token is applied, so a slow early response
//! can never overwrite a later one.

use serde::Serialize;

use osusume_api::{AnimeRecord, Catalog, CatalogService, DiscoveryRoll, FallbackSource};

use crate::banner::ErrorBanner;
use crate::config::ProgressConfig;
use crate::progress::Progress;

// ── Mode ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    None,
    Manual,
    Random,
}

// ── Requests & results ────────────────────────────────────────────

/// What the driver should ask the catalog for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    Text(String),
    Genre(DiscoveryRoll),
}

/// Failures travel as their display text; the banner is derived from it.
pub type FetchResult = Result<Vec<AnimeRecord>, String>;

// ── Messages ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    ClearQuery,
    RandomRequested,
    Loaded { token: u64, result: FetchResult },
    ProgressTick,
    ProgressHidden,
    /// Pick the result at this index.
    Select(usize),
    SelectionAccepted,
    SelectionRejected(ErrorBanner),
    DismissError,
}

impl Message {
    /// Messages that come from the user rather than from a timer or fetch.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::QueryChanged(_) | Self::ClearQuery | Self::RandomRequested | Self::Select(_)
        )
    }
}

/// Side effects requested by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    /// Run this request and answer with [`Message::Loaded`] carrying `token`.
    Fetch { token: u64, request: SearchRequest },
    /// Start the repeating progress ticker ([`Message::ProgressTick`]).
    StartProgress,
    /// Cancel the ticker, then send [`Message::ProgressHidden`] after the hold.
    StopProgress,
    /// Hand this record to the selection aggregator and report back with
    /// [`Message::SelectionAccepted`] or [`Message::SelectionRejected`].
    Selected(AnimeRecord),
    Batch(Vec<Action>),
}

impl Action {
    /// Flatten into a list, dropping `None`.
    pub fn into_vec(self) -> Vec<Action> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(actions) => actions.into_iter().flat_map(Action::into_vec).collect(),
            other => vec![other],
        }
    }
}

// ── State ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SearchController {
    query: String,
    results: Vec<AnimeRecord>,
    is_loading: bool,
    mode: SearchMode,
    error: Option<ErrorBanner>,
    /// Selection feedback; kept apart from `error` so a rejected pick does
    /// not hide the results it was made from.
    notice: Option<ErrorBanner>,
    discovery: Option<DiscoveryRoll>,
    progress: Progress,
    page_size: usize,
    latest_token: u64,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(osusume_api::DEFAULT_PAGE_SIZE as usize, &ProgressConfig::default())
    }
}

impl SearchController {
    pub fn new(page_size: usize, progress: &ProgressConfig) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            is_loading: false,
            mode: SearchMode::None,
            error: None,
            notice: None,
            discovery: None,
            progress: Progress::new(progress),
            page_size: page_size.max(1),
            latest_token: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[AnimeRecord] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        self.error.as_ref()
    }

    pub fn selection_notice(&self) -> Option<&ErrorBanner> {
        self.notice.as_ref()
    }

    pub fn discovery(&self) -> Option<&DiscoveryRoll> {
        self.discovery.as_ref()
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// A random search is running; query input and the random trigger are disabled.
    pub fn is_busy(&self) -> bool {
        self.is_loading && self.mode == SearchMode::Random
    }

    /// Whether a response with this token would still be applied.
    pub fn is_current(&self, token: u64) -> bool {
        token == self.latest_token
    }

    fn next_token(&mut self) -> u64 {
        self.latest_token += 1;
        self.latest_token
    }

    /// Invalidate anything in flight.
    fn supersede(&mut self) {
        self.next_token();
        self.is_loading = false;
    }

    fn clear_feedback(&mut self) {
        self.error = None;
        self.notice = None;
        self.discovery = None;
    }

    /// Drop all state, as when the search view is unmounted.
    pub fn reset(&mut self) -> Action {
        let was_busy = self.is_busy();
        self.supersede();
        self.query.clear();
        self.results.clear();
        self.mode = SearchMode::None;
        self.clear_feedback();
        self.progress.hide();
        if was_busy {
            Action::StopProgress
        } else {
            Action::None
        }
    }

    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            Message::QueryChanged(text) => self.on_query_changed(text),
            Message::ClearQuery => self.on_query_changed(String::new()),
            Message::RandomRequested => self.start_random(DiscoveryRoll::random()),
            Message::Loaded { token, result } => self.on_loaded(token, result),
            Message::ProgressTick => {
                if self.is_busy() {
                    self.progress.tick();
                }
                Action::None
            }
            Message::ProgressHidden => {
                // A new random search may have started during the hold.
                if !self.is_busy() {
                    self.progress.hide();
                }
                Action::None
            }
            Message::Select(index) => match self.results.get(index) {
                Some(record) => Action::Selected(record.clone()),
                None => Action::None,
            },
            Message::SelectionAccepted => {
                self.supersede();
                self.query.clear();
                self.results.clear();
                self.mode = SearchMode::None;
                self.clear_feedback();
                Action::None
            }
            Message::SelectionRejected(banner) => {
                self.notice = Some(banner);
                Action::None
            }
            Message::DismissError => {
                self.error = None;
                self.notice = None;
                Action::None
            }
        }
    }

    /// Begin a random search with a given roll.
    pub fn start_random(&mut self, roll: DiscoveryRoll) -> Action {
        if self.is_busy() {
            return Action::None;
        }
        self.query.clear();
        self.results.clear();
        self.clear_feedback();
        self.discovery = Some(roll.clone());
        self.mode = SearchMode::Random;
        self.is_loading = true;
        self.progress.start();
        let token = self.next_token();
        tracing::debug!(token, genre = %roll.genre, page = roll.page, "Dispatching random search");
        Action::Batch(vec![
            Action::StartProgress,
            Action::Fetch {
                token,
                request: SearchRequest::Genre(roll),
            },
        ])
    }

    fn on_query_changed(&mut self, text: String) -> Action {
        if self.is_busy() {
            return Action::None;
        }
        self.query = text;
        self.clear_feedback();

        let term = self.query.trim();
        if term.is_empty() {
            self.supersede();
            self.results.clear();
            self.mode = SearchMode::None;
            return Action::None;
        }

        let term = term.to_string();
        self.mode = SearchMode::Manual;
        self.is_loading = true;
        let token = self.next_token();
        tracing::debug!(token, query = %term, "Dispatching text search");
        Action::Fetch {
            token,
            request: SearchRequest::Text(term),
        }
    }

    fn on_loaded(&mut self, token: u64, result: FetchResult) -> Action {
        if !self.is_current(token) {
            tracing::debug!(token, latest = self.latest_token, "Discarding stale search response");
            return Action::None;
        }
        self.is_loading = false;

        match result {
            Ok(mut records) => {
                records.truncate(self.page_size);
                if records.is_empty() {
                    self.results.clear();
                    self.error = Some(match self.mode {
                        SearchMode::Random => ErrorBanner::no_random_results(),
                        _ => ErrorBanner::no_results_for(self.query.trim()),
                    });
                } else {
                    tracing::debug!(token, count = records.len(), "Search results applied");
                    self.results = records;
                    self.error = None;
                }
            }
            Err(e) => {
                tracing::warn!(token, error = %e, "Search failed");
                self.results.clear();
                self.error = Some(ErrorBanner::classify(&e));
            }
        }

        if self.mode == SearchMode::Random {
            self.progress.settle();
            Action::StopProgress
        } else {
            Action::None
        }
    }
}

/// Run a [`SearchRequest`] against the catalog and wrap the answer.
pub async fn fetch<P, F>(catalog: &Catalog<P, F>, token: u64, request: SearchRequest) -> Message
where
    P: CatalogService,
    F: FallbackSource,
{
    let result = match request {
        SearchRequest::Text(term) => catalog.search_by_text(&term).await,
        SearchRequest::Genre(roll) => catalog.search_by_genre(&roll).await,
    };
    Message::Loaded {
        token,
        result: result.map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use osusume_api::{CatalogError, GENRES};

    use super::*;
    use crate::banner::BannerKind;

    fn record(id: u64) -> AnimeRecord {
        AnimeRecord {
            id,
            title: format!("Anime {id}"),
            ..Default::default()
        }
    }

    fn records(ids: &[u64]) -> FetchResult {
        Ok(ids.iter().copied().map(record).collect())
    }

    fn fetch_token(action: &Action) -> u64 {
        match action {
            Action::Fetch { token, .. } => *token,
            Action::Batch(actions) => actions.iter().find_map(|a| match a {
                Action::Fetch { token, .. } => Some(*token),
                _ => None,
            })
            .expect("batch has a fetch"),
            other => panic!("Expected Fetch, got {other:?}"),
        }
    }

    fn result_ids(ctrl: &SearchController) -> Vec<u64> {
        ctrl.results().iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_query_clears_without_request() {
        let mut ctrl = SearchController::default();
        let token = fetch_token(&ctrl.update(Message::QueryChanged("frieren".into())));
        ctrl.update(Message::Loaded {
            token,
            result: records(&[1, 2]),
        });
        assert_eq!(result_ids(&ctrl), vec![1, 2]);

        let action = ctrl.update(Message::QueryChanged("   ".into()));
        assert_eq!(action, Action::None);
        assert!(ctrl.results().is_empty());
        assert_eq!(ctrl.mode(), SearchMode::None);
        assert!(!ctrl.is_loading());
    }

    #[test]
    fn test_text_search_dispatches_trimmed_term() {
        let mut ctrl = SearchController::default();
        let action = ctrl.update(Message::QueryChanged("  one piece ".into()));
        assert_eq!(
            action,
            Action::Fetch {
                token: 1,
                request: SearchRequest::Text("one piece".into()),
            }
        );
        assert_eq!(ctrl.query(), "  one piece ");
        assert_eq!(ctrl.mode(), SearchMode::Manual);
        assert!(ctrl.is_loading());
        assert!(!ctrl.is_busy());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut ctrl = SearchController::default();
        let a = fetch_token(&ctrl.update(Message::QueryChanged("a".into())));
        let ab = fetch_token(&ctrl.update(Message::QueryChanged("ab".into())));
        assert!(ab > a);

        ctrl.update(Message::Loaded {
            token: ab,
            result: records(&[20, 21]),
        });
        ctrl.update(Message::Loaded {
            token: a,
            result: records(&[10]),
        });

        assert_eq!(result_ids(&ctrl), vec![20, 21]);
        assert!(ctrl.error().is_none());
    }

    #[test]
    fn test_stale_failure_does_not_clobber_results() {
        let mut ctrl = SearchController::default();
        let a = fetch_token(&ctrl.update(Message::QueryChanged("a".into())));
        let ab = fetch_token(&ctrl.update(Message::QueryChanged("ab".into())));
        ctrl.update(Message::Loaded {
            token: ab,
            result: records(&[5]),
        });
        ctrl.update(Message::Loaded {
            token: a,
            result: Err("network error: connection reset".into()),
        });
        assert_eq!(result_ids(&ctrl), vec![5]);
        assert!(ctrl.error().is_none());
    }

    #[test]
    fn test_response_after_clearing_is_discarded() {
        let mut ctrl = SearchController::default();
        let token = fetch_token(&ctrl.update(Message::QueryChanged("a".into())));
        ctrl.update(Message::ClearQuery);
        ctrl.update(Message::Loaded {
            token,
            result: records(&[1]),
        });
        assert!(ctrl.results().is_empty());
        assert!(ctrl.error().is_none());
    }

    #[test]
    fn test_results_truncated_to_page_size() {
        let mut ctrl = SearchController::new(3, &ProgressConfig::default());
        let token = fetch_token(&ctrl.update(Message::QueryChanged("x".into())));
        ctrl.update(Message::Loaded {
            token,
            result: records(&[1, 2, 3, 4, 5]),
        });
        assert_eq!(result_ids(&ctrl), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_result_sets_no_results_notice() {
        let mut ctrl = SearchController::default();
        let token = fetch_token(&ctrl.update(Message::QueryChanged("zzz".into())));
        ctrl.update(Message::Loaded {
            token,
            result: records(&[]),
        });
        let banner = ctrl.error().unwrap();
        assert_eq!(banner.kind, BannerKind::NoResults);
        assert!(banner.details.contains("\"zzz\""));
        assert!(ctrl.results().is_empty());
    }

    #[test]
    fn test_failure_clears_results_and_classifies() {
        let mut ctrl = SearchController::default();
        let token = fetch_token(&ctrl.update(Message::QueryChanged("a".into())));
        ctrl.update(Message::Loaded {
            token,
            result: records(&[1]),
        });

        let token = fetch_token(&ctrl.update(Message::QueryChanged("ab".into())));
        let err = CatalogError::Http {
            status: 429,
            message: "Too Many Requests.".into(),
        };
        ctrl.update(Message::Loaded {
            token,
            result: Err(err.to_string()),
        });
        assert!(ctrl.results().is_empty());
        assert_eq!(ctrl.error().unwrap().kind, BannerKind::RateLimited);
        assert!(!ctrl.is_loading());
    }

    #[test]
    fn test_every_settled_search_shows_results_or_error() {
        let outcomes: Vec<FetchResult> = vec![
            records(&[1, 2]),
            records(&[]),
            Err("network error: dns failure".into()),
            Err("API error: Invalid".into()),
        ];
        for outcome in outcomes {
            let mut ctrl = SearchController::default();
            let token = fetch_token(&ctrl.update(Message::QueryChanged("q".into())));
            ctrl.update(Message::Loaded {
                token,
                result: outcome,
            });
            assert!(ctrl.results().len() <= 9);
            assert_ne!(ctrl.results().is_empty(), ctrl.error().is_none());
        }
    }

    #[test]
    fn test_random_search_lifecycle() {
        let mut ctrl = SearchController::default();
        let token = fetch_token(&ctrl.update(Message::QueryChanged("old".into())));
        ctrl.update(Message::Loaded {
            token,
            result: records(&[1]),
        });

        let actions = ctrl.update(Message::RandomRequested).into_vec();
        assert_eq!(actions[0], Action::StartProgress);
        let (token, roll) = match &actions[1] {
            Action::Fetch {
                token,
                request: SearchRequest::Genre(roll),
            } => (*token, roll.clone()),
            other => panic!("Expected genre fetch, got {other:?}"),
        };
        assert!(roll.is_valid());
        assert_eq!(ctrl.discovery(), Some(&roll));
        assert_eq!(ctrl.query(), "");
        assert!(ctrl.results().is_empty());
        assert!(ctrl.is_busy());
        assert!(ctrl.progress().is_visible());

        for _ in 0..20 {
            ctrl.update(Message::ProgressTick);
        }
        assert_eq!(ctrl.progress().value(), 90);

        let action = ctrl.update(Message::Loaded {
            token,
            result: records(&[7]),
        });
        assert_eq!(action, Action::StopProgress);
        assert_eq!(ctrl.progress().value(), 100);
        assert_eq!(ctrl.discovery(), Some(&roll));
        assert!(!ctrl.is_busy());

        ctrl.update(Message::ProgressHidden);
        assert!(!ctrl.progress().is_visible());
        assert_eq!(ctrl.progress().value(), 0);
    }

    #[test]
    fn test_start_random_with_fixed_roll() {
        let mut ctrl = SearchController::default();
        let roll = DiscoveryRoll {
            genre: GENRES[9].into(),
            page: 4,
        };
        let actions = ctrl.start_random(roll.clone()).into_vec();
        assert_eq!(
            actions[1],
            Action::Fetch {
                token: 1,
                request: SearchRequest::Genre(roll),
            }
        );
        assert_eq!(ctrl.discovery().unwrap().to_string(), "Slice of Life (page 4)");
    }

    #[test]
    fn test_random_failure_still_completes_progress() {
        let mut ctrl = SearchController::default();
        let token = fetch_token(&ctrl.update(Message::RandomRequested));
        let action = ctrl.update(Message::Loaded {
            token,
            result: Err("network error: timed out".into()),
        });
        assert_eq!(action, Action::StopProgress);
        assert_eq!(ctrl.progress().value(), 100);
        assert_eq!(ctrl.error().unwrap().kind, BannerKind::Network);
    }

    #[test]
    fn test_input_ignored_while_random_loading() {
        let mut ctrl = SearchController::default();
        ctrl.update(Message::RandomRequested);
        assert_eq!(ctrl.update(Message::QueryChanged("x".into())), Action::None);
        assert_eq!(ctrl.update(Message::RandomRequested), Action::None);
        assert_eq!(ctrl.query(), "");
    }

    #[test]
    fn test_hide_ignored_when_new_random_started_during_hold() {
        let mut ctrl = SearchController::default();
        let token = fetch_token(&ctrl.update(Message::RandomRequested));
        ctrl.update(Message::Loaded {
            token,
            result: records(&[1]),
        });
        ctrl.update(Message::RandomRequested);
        ctrl.update(Message::ProgressHidden);
        assert!(ctrl.progress().is_visible());
    }

    #[test]
    fn test_select_then_accept_closes_search() {
        let mut ctrl = SearchController::default();
        let token = fetch_token(&ctrl.update(Message::QueryChanged("fri".into())));
        ctrl.update(Message::Loaded {
            token,
            result: records(&[1, 2]),
        });
        // Still typing: a newer request is in flight when the pick happens.
        let pending = fetch_token(&ctrl.update(Message::QueryChanged("frie".into())));

        let action = ctrl.update(Message::Select(1));
        assert_eq!(action, Action::Selected(record(2)));
        ctrl.update(Message::SelectionAccepted);
        assert_eq!(ctrl.query(), "");
        assert!(ctrl.results().is_empty());

        ctrl.update(Message::Loaded {
            token: pending,
            result: records(&[3]),
        });
        assert!(ctrl.results().is_empty());
    }

    #[test]
    fn test_rejected_selection_keeps_results() {
        let mut ctrl = SearchController::default();
        let token = fetch_token(&ctrl.update(Message::QueryChanged("fri".into())));
        ctrl.update(Message::Loaded {
            token,
            result: records(&[1]),
        });
        ctrl.update(Message::SelectionRejected(ErrorBanner::selection_limit(3)));
        assert_eq!(result_ids(&ctrl), vec![1]);
        assert_eq!(ctrl.selection_notice().unwrap().kind, BannerKind::SelectionRejected);
        assert!(ctrl.error().is_none());

        ctrl.update(Message::DismissError);
        assert!(ctrl.selection_notice().is_none());
    }

    #[test]
    fn test_select_out_of_range() {
        let mut ctrl = SearchController::default();
        assert_eq!(ctrl.update(Message::Select(0)), Action::None);
    }

    #[test]
    fn test_reset_while_random_stops_progress() {
        let mut ctrl = SearchController::default();
        let token = fetch_token(&ctrl.update(Message::RandomRequested));
        assert_eq!(ctrl.reset(), Action::StopProgress);
        assert!(!ctrl.progress().is_visible());
        assert!(!ctrl.is_current(token));
    }

    // ── fetch() against a scripted catalog ────────────────────────

    struct Scripted;

    impl CatalogService for Scripted {
        async fn search_by_text(
            &self,
            term: &str,
            _limit: u32,
        ) -> Result<Vec<AnimeRecord>, CatalogError> {
            if term == "fail" {
                Err(CatalogError::Api("Invalid search".into()))
            } else {
                Ok(vec![record(1)])
            }
        }

        async fn search_by_genre(
            &self,
            _roll: &DiscoveryRoll,
            limit: u32,
        ) -> Result<Vec<AnimeRecord>, CatalogError> {
            Ok((1..=limit as u64).map(record).collect())
        }

        async fn trending_and_popular(
            &self,
            _limit: u32,
        ) -> Result<Vec<AnimeRecord>, CatalogError> {
            Ok(Vec::new())
        }
    }

    struct NoFallback;

    impl FallbackSource for NoFallback {
        async fn search(&self, _term: &str, _limit: u32) -> Result<Vec<AnimeRecord>, CatalogError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_fetch_wraps_text_results() {
        let catalog = Catalog::with_sources(Scripted, None::<NoFallback>);
        match fetch(&catalog, 3, SearchRequest::Text("frieren".into())).await {
            Message::Loaded { token, result } => {
                assert_eq!(token, 3);
                assert_eq!(result.unwrap().len(), 1);
            }
            other => panic!("Expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_genre_uses_page_size() {
        let catalog = Catalog::with_sources(Scripted, None::<NoFallback>);
        let roll = DiscoveryRoll {
            genre: "Action".into(),
            page: 2,
        };
        match fetch(&catalog, 1, SearchRequest::Genre(roll)).await {
            Message::Loaded { result, .. } => assert_eq!(result.unwrap().len(), 9),
            other => panic!("Expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_error_becomes_text() {
        let catalog = Catalog::with_sources(Scripted, None::<NoFallback>);
        match fetch(&catalog, 1, SearchRequest::Text("fail".into())).await {
            Message::Loaded { result, .. } => {
                assert_eq!(result.unwrap_err(), "API error: Invalid search");
            }
            other => panic!("Expected Loaded, got {other:?}"),
        }
    }
}
