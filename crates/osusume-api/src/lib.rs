//! Anime catalog client.
//!
//! Queries the AniList GraphQL API (with the Jikan REST API as a fallback)
//! and normalizes every response into a single [`AnimeRecord`] shape.

pub mod anilist;
pub mod catalog;
pub mod discovery;
pub mod error;
pub mod jikan;
pub mod normalize;
pub mod record;
pub mod traits;

#[cfg(test)]
mod test_server;

pub use catalog::Catalog;
pub use discovery::{DiscoveryRoll, GENRES};
pub use error::CatalogError;
pub use record::{AnimeRecord, Origin};
pub use traits::{CatalogService, FallbackSource};

/// Results per page for text and genre searches.
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Results returned by the browse (empty query) path.
pub const DEFAULT_TRENDING_LIMIT: u32 = 10;
