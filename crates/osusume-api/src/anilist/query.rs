//! GraphQL documents sent to AniList.
//!
//! Field selections must match the provider schema exactly; the response
//! types in [`super::types`] mirror them.

/// Title search, most popular first.
pub const TEXT_SEARCH_QUERY: &str = r#"
query ($search: String, $perPage: Int) {
    Page(page: 1, perPage: $perPage) {
        media(search: $search, type: ANIME, sort: POPULARITY_DESC) {
            id
            title { userPreferred english romaji native }
            description
            coverImage { extraLarge large medium color }
            bannerImage
            genres
            averageScore
            episodes
            duration
            season
            seasonYear
            status
            source
            format
            studios { nodes { name } }
        }
    }
}
"#;

/// One page of a genre, most popular first.
pub const GENRE_QUERY: &str = r#"
query ($genre: String, $page: Int, $perPage: Int) {
    Page(page: $page, perPage: $perPage) {
        media(genre: $genre, type: ANIME, sort: POPULARITY_DESC) {
            id
            title { userPreferred english romaji native }
            description
            coverImage { extraLarge large medium color }
            bannerImage
            genres
            averageScore
            episodes
            duration
            season
            seasonYear
            status
            source
            format
            studios { nodes { name } }
        }
    }
}
"#;

/// Trending and popular rankings in one round trip.
pub const TRENDING_POPULAR_QUERY: &str = r#"
query ($perPage: Int) {
    trending: Page(page: 1, perPage: $perPage) {
        media(type: ANIME, sort: TRENDING_DESC) {
            id
            title { userPreferred english romaji native }
            description
            coverImage { extraLarge large medium color }
            bannerImage
            genres
            averageScore
            episodes
            duration
            season
            seasonYear
            status
            source
            format
            studios { nodes { name } }
        }
    }
    popular: Page(page: 1, perPage: $perPage) {
        media(type: ANIME, sort: POPULARITY_DESC) {
            id
            title { userPreferred english romaji native }
            description
            coverImage { extraLarge large medium color }
            bannerImage
            genres
            averageScore
            episodes
            duration
            season
            seasonYear
            status
            source
            format
            studios { nodes { name } }
        }
    }
}
"#;
