use thiserror::Error;

use osusume_core::{CoreError, ErrorBanner};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed search, already turned into user guidance.
    #[error("{0}")]
    Search(ErrorBanner),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
