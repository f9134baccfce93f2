use thiserror::Error;

/// Errors that can occur while talking to a lock backend.
///
/// Failing to acquire a contended lock is not an error; providers report
/// that as `Ok(None)`.
#[derive(Debug, Error)]
pub enum LockError {
    /// The lock backend failed.
    #[error("Lock backend error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;
