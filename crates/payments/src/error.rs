//! Payments error types.

use domain::{EventBusError, RefundError};
use thiserror::Error;

/// Errors that can occur while synchronizing refunds.
#[derive(Debug, Error)]
pub enum PaymentsError {
    /// The incoming snapshot failed reconciliation.
    #[error("Refund error: {0}")]
    Refund(#[from] RefundError),

    /// Event bus error.
    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),
}

/// Convenience type alias for payments results.
pub type Result<T> = std::result::Result<T, PaymentsError>;
