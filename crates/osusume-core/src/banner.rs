//! User-facing `{message, details}` notices.

use serde::{Deserialize, Serialize};

/// What a banner is reporting, for styling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Network,
    RateLimited,
    Generic,
    NoResults,
    SelectionRejected,
}

/// A structured notice shown above the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBanner {
    pub kind: BannerKind,
    pub message: String,
    pub details: String,
}

const RATE_LIMIT_MARKERS: &[&str] = &["rate limit", "too many requests", "http 429"];
const NETWORK_MARKERS: &[&str] = &["network", "connect", "timed out", "timeout", "dns"];

impl ErrorBanner {
    fn new(kind: BannerKind, message: &str, details: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.to_string(),
            details: details.into(),
        }
    }

    /// Turn a failed fetch into guidance by sniffing the error text.
    ///
    /// Rate limiting is checked first: a 429 is also an HTTP failure and
    /// would otherwise read as a connectivity problem.
    pub fn classify(error: &str) -> Self {
        let lower = error.to_lowercase();
        if RATE_LIMIT_MARKERS.iter().any(|m| lower.contains(m)) {
            Self::new(
                BannerKind::RateLimited,
                "Too many requests",
                "Please wait a moment before trying again.",
            )
        } else if NETWORK_MARKERS.iter().any(|m| lower.contains(m)) {
            Self::new(
                BannerKind::Network,
                "Network error occurred",
                "Please check your internet connection and try again.",
            )
        } else {
            let details = if error.trim().is_empty() {
                "Please try again later.".to_string()
            } else {
                error.trim().to_string()
            };
            Self::new(BannerKind::Generic, "An error occurred while searching", details)
        }
    }

    pub fn no_results_for(query: &str) -> Self {
        Self::new(
            BannerKind::NoResults,
            "No results found",
            format!("No anime found matching \"{query}\". Try a different search term."),
        )
    }

    pub fn no_random_results() -> Self {
        Self::new(BannerKind::NoResults, "No results found", "Try another random search")
    }

    pub fn selection_limit(cap: usize) -> Self {
        Self::new(
            BannerKind::SelectionRejected,
            "Selection limit reached",
            format!("You can only select up to {cap} anime for weekly recommendations"),
        )
    }

    pub fn already_selected(title: &str) -> Self {
        Self::new(
            BannerKind::SelectionRejected,
            "Already selected",
            format!("\"{title}\" is already in this week's recommendations"),
        )
    }

    /// A failure, as opposed to an informational notice.
    pub fn is_error(&self) -> bool {
        matches!(
            self.kind,
            BannerKind::Network | BannerKind::RateLimited | BannerKind::Generic
        )
    }
}

impl std::fmt::Display for ErrorBanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.details.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.message, self.details)
        }
    }
}
