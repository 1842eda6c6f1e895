//! Crate-wide error hierarchy for review-core.
//!
//! Most failure modes in this pipeline degrade to empty results by design
//! (see the crate docs); the error type therefore stays small. Cache write
//! failures are the notable exception: losing the ability to persist
//! results locally is not silently swallowed.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type ReviewResult<T> = Result<T, Error>;

/// Root error type for the review-core crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// Result cache (file I/O / JSON) failure.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result cache related errors.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
