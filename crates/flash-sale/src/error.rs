//! Flash-sale error types.

use cache::CacheError;
use common::ResultId;
use domain::{DomainError, EventBusError};
use inventory::InventoryError;
use lock::LockError;
use result_store::ResultStoreError;
use thiserror::Error;

/// Errors that can occur during flash-sale orchestration.
///
/// Everything here is fatal to the current invocation and surfaces to the
/// delivery mechanism, whose redelivery policy is the retry mechanism. The
/// designed non-fatal outcomes (duplicate attempts, rollback failures) never
/// appear as errors.
#[derive(Debug, Error)]
pub enum FlashSaleError {
    /// The per-(plan, user) lock was not acquired within its bounded wait.
    #[error("Concurrent flash sale result creation ({key})")]
    ConcurrencyConflict { key: String },

    /// A result the order pipeline reported on does not exist.
    #[error("Flash sale result not found: {0}")]
    ResultNotFound(ResultId),

    /// Lock backend error.
    #[error("Lock error: {0}")]
    Lock(#[from] LockError),

    /// Result store error.
    #[error("Result store error: {0}")]
    ResultStore(#[from] ResultStoreError),

    /// Inventory backend error.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Cache backend error.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Event bus error.
    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),

    /// Domain error.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Convenience type alias for flash-sale results.
pub type Result<T> = std::result::Result<T, FlashSaleError>;
