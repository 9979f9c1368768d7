//! One UI session: flow selector, search controller and selection wired together.
//!
//! Drivers feed every event through [`Session::update`] and run the returned
//! [`Effect`]s. Picks emitted by the search controller are routed into the
//! selection aggregator here, and the outcome is fed back to the controller.

use serde::Serialize;

use crate::config::AppConfig;
use crate::flow::{self, FlowChange, FlowSelector, Screen};
use crate::search::{self, Action, SearchController, SearchRequest};
use crate::selection::{Cardinality, DetailView, SelectOutcome, SelectionAggregator};

#[derive(Debug, Clone)]
pub enum Message {
    Flow(flow::Message),
    Search(search::Message),
    /// Drop a pick from the selection by id.
    Remove(u64),
    ClearSelection,
}

impl From<flow::Message> for Message {
    fn from(msg: flow::Message) -> Self {
        Self::Flow(msg)
    }
}

impl From<search::Message> for Message {
    fn from(msg: search::Message) -> Self {
        Self::Search(msg)
    }
}

/// Work for the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { token: u64, request: SearchRequest },
    StartProgress,
    StopProgress,
}

#[derive(Debug, Clone)]
pub struct Session {
    flow: FlowSelector,
    search: SearchController,
    selection: SelectionAggregator,
    weekly_cap: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            flow: FlowSelector::default(),
            search: SearchController::new(config.catalog.page_size as usize, &config.progress),
            selection: SelectionAggregator::with_cap(
                Cardinality::Single,
                config.selection.weekly_cap,
            ),
            weekly_cap: config.selection.weekly_cap,
        }
    }

    pub fn flow(&self) -> &FlowSelector {
        &self.flow
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn selection(&self) -> &SelectionAggregator {
        &self.selection
    }

    pub fn screen(&self) -> Screen {
        self.flow.screen()
    }

    pub fn detail(&self) -> DetailView {
        self.selection.render()
    }

    pub fn update(&mut self, msg: Message) -> Vec<Effect> {
        match msg {
            Message::Flow(msg) => match self.flow.update(msg) {
                FlowChange::Unchanged => Vec::new(),
                FlowChange::Input(_) => {
                    let action = self.search.reset();
                    self.run(action)
                }
                FlowChange::Cardinality(cardinality) => {
                    tracing::debug!(%cardinality, "Cardinality changed, selection reset");
                    self.selection = SelectionAggregator::with_cap(cardinality, self.weekly_cap);
                    let action = self.search.reset();
                    self.run(action)
                }
            },
            Message::Search(msg) => {
                if msg.is_user_input() && !self.screen().shows_search() {
                    tracing::debug!(?msg, "Search input ignored outside the search screen");
                    return Vec::new();
                }
                let action = self.search.update(msg);
                self.run(action)
            }
            Message::Remove(id) => {
                if let Some(record) = self.selection.remove(id) {
                    tracing::info!(id, title = %record.title, "Removed from selection");
                }
                Vec::new()
            }
            Message::ClearSelection => {
                self.selection.clear();
                Vec::new()
            }
        }
    }

    fn run(&mut self, action: Action) -> Vec<Effect> {
        let mut effects = Vec::new();
        for action in action.into_vec() {
            match action {
                Action::Fetch { token, request } => effects.push(Effect::Fetch { token, request }),
                Action::StartProgress => effects.push(Effect::StartProgress),
                Action::StopProgress => effects.push(Effect::StopProgress),
                Action::Selected(record) => {
                    let reply = match self.selection.select(record.clone()) {
                        Ok(outcome) => {
                            tracing::info!(
                                id = record.id,
                                title = %record.title,
                                replaced = outcome == SelectOutcome::Replaced,
                                count = self.selection.count(),
                                "Anime selected"
                            );
                            search::Message::SelectionAccepted
                        }
                        Err(banner) => {
                            tracing::debug!(id = record.id, reason = %banner.message, "Selection rejected");
                            search::Message::SelectionRejected(banner)
                        }
                    };
                    let follow_up = self.search.update(reply);
                    effects.extend(self.run(follow_up));
                }
                Action::None | Action::Batch(_) => {}
            }
        }
        effects
    }

    /// A serializable view of everything a renderer needs.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            screen: self.screen(),
            query: self.search.query(),
            mode: self.search.mode(),
            loading: self.search.is_loading(),
            progress: self.search.progress().is_visible().then(|| self.search.progress().value()),
            error: self.search.error(),
            notice: self.search.selection_notice(),
            results: self.search.results(),
            selected: self.selection.count(),
            capacity: self.selection.capacity(),
            detail: self.selection.render(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub screen: Screen,
    pub query: &'a str,
    pub mode: search::SearchMode,
    pub loading: bool,
    pub progress: Option<u8>,
    pub error: Option<&'a crate::banner::ErrorBanner>,
    pub notice: Option<&'a crate::banner::ErrorBanner>,
    pub results: &'a [osusume_api::AnimeRecord],
    pub selected: usize,
    pub capacity: usize,
    pub detail: DetailView,
}
