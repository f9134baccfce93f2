//! Shared types used across the flash-sale platform crates.

pub mod extra;
pub mod types;

pub use extra::ExtraProperties;
pub use types::{
    OrderId, OrderLineId, PaymentId, PlanId, ProductId, ProductSkuId, RefundId, RefundItemId,
    ResultId, StoreId, TenantId, UserId,
};
