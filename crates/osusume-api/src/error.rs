use thiserror::Error;

/// Errors from the catalog sources.
///
/// `Network` and `Http` are transport failures; `Api` carries the messages a
/// well-formed GraphQL response reported in its `errors` array.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("network error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no data available from any catalog source")]
    DataUnavailable,
}

impl CatalogError {
    /// HTTP status code, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this is a transport-level failure (connection, DNS, timeout, non-2xx).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { .. })
    }
}

/// Longest response body excerpt kept in an `Http` error.
const BODY_EXCERPT_CHARS: usize = 200;

pub(crate) fn body_excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let mut excerpt: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
    excerpt.push('…');
    excerpt
}
