//! Search error types.

use thiserror::Error;

/// Errors raised while configuring a search.
///
/// Traversal and matching themselves cannot fail.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A traversal strategy name was not recognised.
    #[error("unknown traversal strategy: {0} (expected in-order or level-order)")]
    UnknownStrategy(String),
}

/// Convenience alias for search results.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
