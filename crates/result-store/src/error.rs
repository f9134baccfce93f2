use common::{PlanId, ResultId, UserId};
use thiserror::Error;

/// Errors that can occur when interacting with the result store.
#[derive(Debug, Error)]
pub enum ResultStoreError {
    /// A result with the same id already exists.
    #[error("Result {0} already exists")]
    DuplicateResult(ResultId),

    /// A non-Failed result already exists for the (plan, user) pair.
    #[error("An ongoing result already exists for plan {plan_id}, user {user_id}")]
    OngoingResultExists { plan_id: PlanId, user_id: UserId },

    /// The result to update was not found.
    #[error("Result not found: {0}")]
    ResultNotFound(ResultId),

    /// A stored status column did not parse.
    #[error("Invalid status in storage: {0}")]
    InvalidStatus(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for result-store operations.
pub type Result<T> = std::result::Result<T, ResultStoreError>;
