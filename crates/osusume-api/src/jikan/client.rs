use reqwest::Client;
use url::Url;

use super::types::JikanResponse;
use crate::error::{body_excerpt, CatalogError};
use crate::record::AnimeRecord;
use crate::traits::FallbackSource;

pub const BASE_URL: &str = "https://api.jikan.moe/v4/";

/// Jikan caps `limit` at this value.
const MAX_LIMIT: u32 = 25;

/// Jikan (unofficial MyAnimeList) REST client, used as a fallback source.
#[derive(Debug, Clone)]
pub struct JikanClient {
    base_url: Url,
    http: Client,
}

impl JikanClient {
    pub fn new() -> Self {
        Self {
            base_url: Url::parse(BASE_URL).expect("built-in Jikan URL is valid"),
            http: Client::new(),
        }
    }

    /// Client for another Jikan-compatible deployment.
    pub fn with_base_url(base_url: &str) -> Result<Self, CatalogError> {
        // A missing trailing slash would make `join` drop the last segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| CatalogError::Parse(format!("invalid Jikan URL {base_url}: {e}")))?;
        Ok(Self {
            base_url,
            http: Client::new(),
        })
    }

    /// `anime?q=…` for a search, `top/anime` for an empty term.
    pub fn request_url(&self, term: &str, limit: u32) -> Result<Url, CatalogError> {
        let term = term.trim();
        let path = if term.is_empty() { "top/anime" } else { "anime" };
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            if !term.is_empty() {
                query.append_pair("q", term);
            }
            query.append_pair("limit", &limit.clamp(1, MAX_LIMIT).to_string());
        }
        Ok(url)
    }
}

impl Default for JikanClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackSource for JikanClient {
    async fn search(&self, term: &str, limit: u32) -> Result<Vec<AnimeRecord>, CatalogError> {
        let url = self.request_url(term, limit)?;
        tracing::debug!(%url, "Jikan request");

        let resp = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status_code, "Jikan API error");
            return Err(CatalogError::Http {
                status: status_code,
                message: body_excerpt(&body),
            });
        }

        let body: JikanResponse = resp
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut records: Vec<AnimeRecord> = body
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.into_record())
            .collect();
        records.truncate(limit as usize);
        Ok(records)
    }
}
