use serde::Deserialize;

use crate::normalize::{first_non_empty, sanitize_description};
use crate::record::{AnimeRecord, Origin};

// ── Search / top responses ──────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JikanResponse {
    pub data: Option<Vec<JikanAnime>>,
}

#[derive(Debug, Deserialize)]
pub struct JikanAnime {
    pub mal_id: u64,
    pub title: Option<String>,
    pub title_english: Option<String>,
    pub synopsis: Option<String>,
    pub images: Option<JikanImages>,
    pub episodes: Option<u32>,
    pub score: Option<f32>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub year: Option<u32>,
    pub season: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub genres: Option<Vec<JikanNamed>>,
    pub studios: Option<Vec<JikanNamed>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JikanImages {
    pub jpg: Option<JikanImageSet>,
    pub webp: Option<JikanImageSet>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JikanImageSet {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JikanNamed {
    pub name: String,
}

// ── Conversions to the shared record ────────────────────────────

fn names(list: Option<Vec<JikanNamed>>) -> Vec<String> {
    list.map(|l| l.into_iter().map(|n| n.name).collect())
        .unwrap_or_default()
}

impl JikanAnime {
    /// Best-effort mapping; Jikan scores are 0-10 and become 0-100.
    pub fn into_record(self) -> AnimeRecord {
        let images = self.images.unwrap_or_default();
        let jpg = images.jpg.unwrap_or_default();
        let webp = images.webp.unwrap_or_default();

        let cover_image = first_non_empty([
            jpg.large_image_url.as_deref(),
            jpg.image_url.as_deref(),
            webp.large_image_url.as_deref(),
            webp.image_url.as_deref(),
        ])
        .map(str::to_string);
        let banner_image = first_non_empty([
            jpg.large_image_url.as_deref(),
            webp.large_image_url.as_deref(),
        ])
        .map(str::to_string);

        AnimeRecord {
            id: self.mal_id,
            title: first_non_empty([self.title.as_deref(), self.title_english.as_deref()])
                .map(str::to_string)
                .unwrap_or_default(),
            description: self
                .synopsis
                .as_deref()
                .map(sanitize_description)
                .unwrap_or_default(),
            cover_image,
            cover_color: None,
            banner_image,
            genres: names(self.genres),
            average_score: self.score.map(|s| (s * 10.0).round().clamp(0.0, 100.0) as u32),
            episodes: self.episodes,
            duration: None,
            season: self.season,
            season_year: self.year,
            status: self.status,
            source: self.source,
            format: self.media_type,
            studios: names(self.studios),
            origin: Origin::Jikan,
        }
    }
}
