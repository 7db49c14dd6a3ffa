use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("lattice increment must be positive and finite, got {0}")]
    InvalidIncrement(f64),
}

/// Failure of a single land lookup. Never aborts a search.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupError {
    #[error("lookup timed out")]
    Timeout,
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("lookup service error: {0}")]
    Service(String),
}
