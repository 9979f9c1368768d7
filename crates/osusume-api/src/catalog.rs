//! The catalog facade the UI talks to.
//!
//! Wraps a primary [`CatalogService`] and an optional [`FallbackSource`].
//! One attempt per call: no caching, retry, or backoff.

use crate::anilist::AniListClient;
use crate::discovery::DiscoveryRoll;
use crate::error::CatalogError;
use crate::jikan::JikanClient;
use crate::record::AnimeRecord;
use crate::traits::{CatalogService, FallbackSource};
use crate::{DEFAULT_PAGE_SIZE, DEFAULT_TRENDING_LIMIT};

pub struct Catalog<P = AniListClient, F = JikanClient> {
    primary: P,
    fallback: Option<F>,
    page_size: u32,
    trending_limit: u32,
}

impl Catalog {
    /// AniList with a Jikan fallback, default page sizes.
    pub fn new() -> Self {
        Self::with_sources(AniListClient::new(), Some(JikanClient::new()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: CatalogService, F: FallbackSource> Catalog<P, F> {
    pub fn with_sources(primary: P, fallback: Option<F>) -> Self {
        Self {
            primary,
            fallback,
            page_size: DEFAULT_PAGE_SIZE,
            trending_limit: DEFAULT_TRENDING_LIMIT,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_trending_limit(mut self, limit: u32) -> Self {
        self.trending_limit = limit.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn trending_limit(&self) -> u32 {
        self.trending_limit
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Title search against the primary source.
    ///
    /// An empty result is `Ok(vec![])`; the caller decides how to present it.
    pub async fn search_by_text(&self, term: &str) -> Result<Vec<AnimeRecord>, CatalogError> {
        self.primary.search_by_text(term, self.page_size).await
    }

    /// Random discovery: a random genre and page, most popular first.
    pub async fn search_by_random_genre(
        &self,
    ) -> Result<(DiscoveryRoll, Vec<AnimeRecord>), CatalogError> {
        let roll = DiscoveryRoll::random();
        tracing::debug!(genre = %roll.genre, page = roll.page, "Random discovery");
        let records = self.search_by_genre(&roll).await?;
        Ok((roll, records))
    }

    pub async fn search_by_genre(
        &self,
        roll: &DiscoveryRoll,
    ) -> Result<Vec<AnimeRecord>, CatalogError> {
        self.primary.search_by_genre(roll, self.page_size).await
    }

    /// Trending then popular titles, without duplicates, at most `limit`.
    pub async fn fetch_trending_and_popular(
        &self,
        limit: u32,
    ) -> Result<Vec<AnimeRecord>, CatalogError> {
        self.primary.trending_and_popular(limit).await
    }

    /// Primary lookup, falling back to the secondary source when the primary
    /// fails or comes back empty.
    ///
    /// An empty `term` browses trending and popular titles. With no fallback
    /// configured the primary outcome is returned as is.
    pub async fn search_with_fallback(&self, term: &str) -> Result<Vec<AnimeRecord>, CatalogError> {
        let term = term.trim();
        let primary = if term.is_empty() {
            self.fetch_trending_and_popular(self.trending_limit).await
        } else {
            self.search_by_text(term).await
        };

        let Some(fallback) = &self.fallback else {
            return primary;
        };

        match primary {
            Ok(records) if !records.is_empty() => return Ok(records),
            Ok(_) => tracing::debug!(term, "Primary catalog empty, trying fallback"),
            Err(e) => tracing::warn!(term, error = %e, "Primary catalog failed, trying fallback"),
        }

        let limit = if term.is_empty() {
            self.trending_limit
        } else {
            self.page_size
        };
        match fallback.search(term, limit).await {
            Ok(records) if !records.is_empty() => Ok(records),
            Ok(_) => Err(CatalogError::DataUnavailable),
            Err(e) => {
                tracing::warn!(term, error = %e, "Fallback catalog failed");
                Err(CatalogError::DataUnavailable)
            }
        }
    }

    /// Like [`Self::search_with_fallback`], but `None` means no source had data.
    pub async fn fetch_with_fallback(&self, term: &str) -> Option<Vec<AnimeRecord>> {
        self.search_with_fallback(term)
            .await
            .ok()
            .filter(|records| !records.is_empty())
    }
}
