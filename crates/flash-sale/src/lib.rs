//! Flash-sale orchestration.
//!
//! Many concurrent customers race for limited, time-boxed discounted
//! inventory; this crate guarantees each unit is sold at most once:
//!
//! 1. Order placement reserves a unit (atomic decrement) and publishes a
//!    result-creation event.
//! 2. The result handler serializes attempts per (plan, user) behind a
//!    distributed lock, detects duplicates against the durable store, and
//!    either creates the result and requests an order, or rolls the losing
//!    reservation back through the outbox.
//! 3. The outcome handler reconciles the result against what the order
//!    pipeline reports, rolling inventory back on failure.
//!
//! Delivery is at-least-once everywhere; every handler tolerates redelivery.

pub mod config;
pub mod error;
pub mod handler;
pub mod outbox;
pub mod outcome;
pub mod placement;
pub mod query;

pub use config::FlashSaleConfig;
pub use error::FlashSaleError;
pub use handler::{CreateFlashSaleResultHandler, Handled};
pub use outbox::{RollbackInstruction, RollbackOutbox};
pub use outcome::FlashSaleOrderOutcomeHandler;
pub use placement::{FlashSaleOrderPlacement, PlacementOutcome};
pub use query::CurrentResultQuery;
