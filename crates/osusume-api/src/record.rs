use serde::{Deserialize, Serialize};

/// Which catalog a record was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    AniList,
    Jikan,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AniList => write!(f, "AniList"),
            Self::Jikan => write!(f, "Jikan"),
        }
    }
}

/// A normalized anime entry, independent of the source catalog.
///
/// Enumerated fields (`season`, `status`, `source`, `format`) are passed
/// through exactly as the source reported them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeRecord {
    pub id: u64,
    /// Resolved display title. Empty only when the source had no title at all.
    pub title: String,
    /// Plain text, HTML stripped.
    pub description: String,
    pub cover_image: Option<String>,
    /// Dominant cover color (`#rrggbb`), decorative only.
    pub cover_color: Option<String>,
    pub banner_image: Option<String>,
    pub genres: Vec<String>,
    /// 0-100.
    pub average_score: Option<u32>,
    pub episodes: Option<u32>,
    /// Minutes per episode.
    pub duration: Option<u32>,
    pub season: Option<String>,
    pub season_year: Option<u32>,
    pub status: Option<String>,
    pub source: Option<String>,
    pub format: Option<String>,
    pub studios: Vec<String>,
    #[serde(default)]
    pub origin: Origin,
}

impl AnimeRecord {
    /// The title, or `#<id>` when no variant was available.
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            format!("#{}", self.id)
        } else {
            self.title.clone()
        }
    }

    /// Score on a 10-point scale.
    pub fn score_out_of_ten(&self) -> Option<f32> {
        self.average_score.map(|s| s as f32 / 10.0)
    }

    /// "Fall 2023", "2023", "Fall", or `None`.
    pub fn season_label(&self) -> Option<String> {
        let season = self.season.as_deref().map(title_case);
        match (season, self.season_year) {
            (Some(s), Some(y)) => Some(format!("{s} {y}")),
            (Some(s), None) => Some(s),
            (None, Some(y)) => Some(y.to_string()),
            (None, None) => None,
        }
    }
}

fn title_case(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        Some(first) => first.to_uppercase().to_string() + &c.as_str().to_lowercase(),
        None => String::new(),
    }
}
