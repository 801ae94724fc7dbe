use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while populating the catalog.
///
/// The type is `Clone` because a single initialization outcome is handed to
/// every caller waiting on the same fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid record at index {index}: {reason}")]
    Record { index: usize, reason: String },

    #[error("Catalog source returned no tracks")]
    Empty,

    #[error("Catalog fetch aborted: {0}")]
    Aborted(String),

    #[error("Timed out after {0:?} waiting for the catalog")]
    TimedOut(Duration),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network(err.to_string())
    }
}
