use serde::Deserialize;

use crate::error::CatalogError;
use crate::normalize::{resolve_cover, resolve_title, sanitize_description};
use crate::record::{AnimeRecord, Origin};

// ── GraphQL response wrappers ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl<T> GraphQLResponse<T> {
    /// Unwrap `data`, turning a non-empty `errors` array into [`CatalogError::Api`].
    pub fn into_data(self) -> Result<T, CatalogError> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(CatalogError::Api(message));
        }
        self.data
            .ok_or_else(|| CatalogError::Parse("response carried neither data nor errors".into()))
    }
}

// ── Page queries ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(rename = "Page")]
    pub page: Option<PageData>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingPopularResponse {
    pub trending: Option<PageData>,
    pub popular: Option<PageData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub media: Vec<AniListMedia>,
}

impl PageData {
    pub fn into_records(self) -> Vec<AnimeRecord> {
        self.media.into_iter().map(AniListMedia::into_record).collect()
    }
}

// ── Media ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AniListMedia {
    pub id: u64,
    pub title: Option<AniListTitle>,
    pub description: Option<String>,
    pub cover_image: Option<CoverImage>,
    pub banner_image: Option<String>,
    pub genres: Option<Vec<String>>,
    pub average_score: Option<u32>,
    pub episodes: Option<u32>,
    pub duration: Option<u32>,
    pub season: Option<String>,
    pub season_year: Option<u32>,
    pub status: Option<String>,
    pub source: Option<String>,
    pub format: Option<String>,
    pub studios: Option<StudioConnection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AniListTitle {
    pub user_preferred: Option<String>,
    pub english: Option<String>,
    pub romaji: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    pub extra_large: Option<String>,
    pub large: Option<String>,
    pub medium: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudioConnection {
    pub nodes: Option<Vec<StudioNode>>,
}

#[derive(Debug, Deserialize)]
pub struct StudioNode {
    pub name: String,
}

// ── Conversions ──────────────────────────────────────────────────

impl AniListMedia {
    pub fn into_record(self) -> AnimeRecord {
        let title = self.title.unwrap_or_default();
        let cover = self.cover_image.unwrap_or_default();

        AnimeRecord {
            id: self.id,
            title: resolve_title(
                title.user_preferred.as_deref(),
                title.english.as_deref(),
                title.romaji.as_deref(),
                title.native.as_deref(),
            ),
            description: self
                .description
                .as_deref()
                .map(sanitize_description)
                .unwrap_or_default(),
            cover_image: resolve_cover(
                cover.extra_large.as_deref(),
                cover.large.as_deref(),
                cover.medium.as_deref(),
            ),
            cover_color: cover.color,
            banner_image: self.banner_image,
            genres: self.genres.unwrap_or_default(),
            average_score: self.average_score,
            episodes: self.episodes,
            duration: self.duration,
            season: self.season,
            season_year: self.season_year,
            status: self.status,
            source: self.source,
            format: self.format,
            studios: self
                .studios
                .and_then(|s| s.nodes)
                .map(|nodes| nodes.into_iter().map(|n| n.name).collect())
                .unwrap_or_default(),
            origin: Origin::AniList,
        }
    }
}
