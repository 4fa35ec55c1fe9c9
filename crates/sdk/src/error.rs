use thiserror::Error;

/// Errors surfaced by the explorer SDK.
///
/// Query translation itself never fails: malformed URL input degrades to
/// absent values. These errors come from argument parsing and from the fetch
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("fetching contracts failed: {0}")]
    Fetch(String),

    /// Fetch was superseded by a newer one before it completed.
    #[error("fetch cancelled")]
    Cancelled,
}
