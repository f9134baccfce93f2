//! Payments-side synchronization.
//!
//! Refund records are owned by the external payment service, which announces
//! every change as an entity created/updated/deleted event. The synchronizer
//! keeps a local copy consistent by merging incoming snapshots and announces
//! completed refunds to the rest of the platform exactly once.

pub mod error;
pub mod repository;
pub mod synchronizer;

pub use error::PaymentsError;
pub use repository::{InMemoryRefundRepository, RefundRepository};
pub use synchronizer::RefundSynchronizer;
