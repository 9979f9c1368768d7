//! Trait definitions for catalog sources.
//!
//! The primary source (AniList) implements [`CatalogService`]; secondary
//! sources used only when the primary fails implement [`FallbackSource`].
//! Futures are not required to be `Send` so the same clients run on the
//! browser's single-threaded executor.

use std::future::Future;

use crate::discovery::DiscoveryRoll;
use crate::error::CatalogError;
use crate::record::AnimeRecord;

/// A catalog able to answer every search the UI issues.
pub trait CatalogService {
    /// Search by title text, most popular first, at most `limit` records.
    fn search_by_text(
        &self,
        term: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<AnimeRecord>, CatalogError>>;

    /// One page of a genre's popularity ranking.
    fn search_by_genre(
        &self,
        roll: &DiscoveryRoll,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<AnimeRecord>, CatalogError>>;

    /// Trending titles followed by popular ones, de-duplicated by id.
    fn trending_and_popular(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<AnimeRecord>, CatalogError>>;
}

/// A best-effort secondary source.
pub trait FallbackSource {
    /// Search by text; an empty `term` means "top titles".
    fn search(
        &self,
        term: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<AnimeRecord>, CatalogError>>;
}
