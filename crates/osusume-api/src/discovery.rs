use rand::Rng;
use serde::{Deserialize, Serialize};

/// Genres eligible for random discovery.
pub const GENRES: [&str; 13] = [
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Fantasy",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Slice of Life",
    "Sports",
    "Supernatural",
    "Thriller",
];

/// Highest page a discovery roll can land on.
pub const MAX_DISCOVERY_PAGE: u32 = 10;

/// A random `(genre, page)` pair for discovery searches.
///
/// The randomness is over popular genres and the first pages of their
/// popularity ranking, not over the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryRoll {
    pub genre: String,
    pub page: u32,
}

impl DiscoveryRoll {
    /// Pick a genre and a page uniformly at random.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let genre = GENRES[rng.gen_range(0..GENRES.len())];
        let page = rng.gen_range(1..=MAX_DISCOVERY_PAGE);
        Self {
            genre: genre.to_string(),
            page,
        }
    }

    /// Roll with the thread-local generator.
    pub fn random() -> Self {
        Self::roll(&mut rand::thread_rng())
    }

    /// Whether the pair lies inside the discovery space.
    pub fn is_valid(&self) -> bool {
        GENRES.contains(&self.genre.as_str()) && (1..=MAX_DISCOVERY_PAGE).contains(&self.page)
    }
}

impl std::fmt::Display for DiscoveryRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (page {})", self.genre, self.page)
    }
}
