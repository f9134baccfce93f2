//! Domain layer for the flash-sale platform.
//!
//! Contains the flash-sale plan and result entities, the event payloads
//! exchanged over the distributed event bus, and the refund reconciliation
//! model used by the payments synchronizer.

pub mod error;
pub mod event_bus;
pub mod flash_sale;
pub mod money;
pub mod refund;

pub use error::DomainError;
pub use event_bus::{DistributedEvent, DistributedEventBus, EventBusError, InMemoryEventBus};
pub use flash_sale::{
    CreateFlashSaleOrder, CreateFlashSaleResult, FlashSalePlan, FlashSaleResult,
    FlashSaleResultCompleted, FlashSaleResultSnapshot, FlashSaleResultStatus, PlanSnapshot,
};
pub use money::Money;
pub use refund::{
    MergeOutcome, OrderLineRefundInfo, Refund, RefundCompleted, RefundError, RefundItem,
    RefundItemOrderLine, RefundItemSnapshot, RefundSnapshot, merge_refund,
};
