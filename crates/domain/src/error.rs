//! Domain error types.

use common::ResultId;
use thiserror::Error;

use crate::flash_sale::FlashSaleResultStatus;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A flash-sale result was asked to transition from a terminal status.
    #[error("Invalid status transition for result {result_id}: {from} -> {to}")]
    InvalidStatusTransition {
        result_id: ResultId,
        from: FlashSaleResultStatus,
        to: FlashSaleResultStatus,
    },
}
