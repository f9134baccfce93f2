use thiserror::Error;

/// Errors raised by a cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache backend failed.
    #[error("Cache backend error: {0}")]
    Backend(String),
}
