//! Selection aggregator: holds picked anime and renders the detail view.

use serde::{Deserialize, Serialize};

use osusume_api::AnimeRecord;

use crate::banner::ErrorBanner;

/// Recommendations allowed per week unless configured otherwise.
pub const WEEKLY_CAP: usize = 3;

/// How many picks one recommendation holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    Single,
    Weekly,
}

impl Cardinality {
    pub const ALL: [Cardinality; 2] = [Cardinality::Single, Cardinality::Weekly];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single Recommendation",
            Self::Weekly => "Weekly Recommendations",
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What [`SelectionAggregator::select`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Added,
    /// Single mode: the previous pick was swapped out.
    Replaced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionAggregator {
    cardinality: Cardinality,
    cap: usize,
    selected: Vec<AnimeRecord>,
}

impl Default for SelectionAggregator {
    fn default() -> Self {
        Self::new(Cardinality::Single)
    }
}

impl SelectionAggregator {
    pub fn new(cardinality: Cardinality) -> Self {
        Self::with_cap(cardinality, WEEKLY_CAP)
    }

    /// `cap` only applies in weekly mode.
    pub fn with_cap(cardinality: Cardinality, cap: usize) -> Self {
        Self {
            cardinality,
            cap: cap.max(1),
            selected: Vec::new(),
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn selected(&self) -> &[AnimeRecord] {
        &self.selected
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Maximum number of picks held at once.
    pub fn capacity(&self) -> usize {
        match self.cardinality {
            Cardinality::Single => 1,
            Cardinality::Weekly => self.cap,
        }
    }

    pub fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.count())
    }

    pub fn contains(&self, id: u64) -> bool {
        self.selected.iter().any(|r| r.id == id)
    }

    /// Record a pick.
    ///
    /// Single mode always accepts and replaces. Weekly mode rejects a pick
    /// past the cap or one already held.
    pub fn select(&mut self, record: AnimeRecord) -> Result<SelectOutcome, ErrorBanner> {
        match self.cardinality {
            Cardinality::Single => {
                let outcome = if self.selected.is_empty() {
                    SelectOutcome::Added
                } else {
                    SelectOutcome::Replaced
                };
                self.selected.clear();
                self.selected.push(record);
                Ok(outcome)
            }
            Cardinality::Weekly => {
                if self.contains(record.id) {
                    return Err(ErrorBanner::already_selected(&record.title));
                }
                if self.selected.len() >= self.cap {
                    tracing::debug!(cap = self.cap, "Weekly selection full");
                    return Err(ErrorBanner::selection_limit(self.cap));
                }
                self.selected.push(record);
                Ok(SelectOutcome::Added)
            }
        }
    }

    /// Drop a pick by id.
    pub fn remove(&mut self, id: u64) -> Option<AnimeRecord> {
        let index = self.selected.iter().position(|r| r.id == id)?;
        Some(self.selected.remove(index))
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn render(&self) -> DetailView {
        match (self.cardinality, self.selected.first()) {
            (_, None) => DetailView::Empty,
            (Cardinality::Single, Some(record)) => DetailView::Single(AnimeDetail::from(record)),
            (Cardinality::Weekly, Some(_)) => DetailView::WeeklyPlaceholder {
                count: self.count(),
                capacity: self.capacity(),
            },
        }
    }
}

// ── Detail view ───────────────────────────────────────────────────

pub const WEEKLY_PLACEHOLDER: &str = "Weekly recommendation feature coming soon...";

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DetailView {
    Empty,
    Single(AnimeDetail),
    WeeklyPlaceholder { count: usize, capacity: usize },
}

/// Display-ready fields of a single pick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimeDetail {
    pub id: u64,
    pub title: String,
    pub cover_image: Option<String>,
    pub description: String,
    pub rating: String,
    pub episodes: String,
    pub status: String,
    pub season: Option<String>,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
}

impl From<&AnimeRecord> for AnimeDetail {
    fn from(record: &AnimeRecord) -> Self {
        Self {
            id: record.id,
            title: record.display_title(),
            cover_image: record.cover_image.clone(),
            description: record.description.clone(),
            rating: record
                .average_score
                .map(|s| format!("{s}/100"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            episodes: record
                .episodes
                .map(|e| e.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status: record
                .status
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(humanize_status)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            season: record.season_label(),
            genres: record.genres.clone(),
            studios: record.studios.clone(),
        }
    }
}

/// `NOT_YET_RELEASED` → `Not Yet Released`; anything else passes through.
fn humanize_status(status: &str) -> String {
    if !status.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
        return status.to_string();
    }
    status
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let lower = w.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
