//! Refund entities and the reconciliation of externally-owned snapshots.
//!
//! Refund records are owned by the payment service; this platform keeps a
//! local copy in sync by merging incoming snapshots with [`merge_refund`].

mod merge;

use chrono::{DateTime, Utc};
use common::{
    OrderId, OrderLineId, PaymentId, RefundId, RefundItemId, StoreId, TenantId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;

pub use merge::{MergeOutcome, merge_refund};

/// Errors raised while reconciling refund snapshots.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefundError {
    /// An incoming refund item carried no store id.
    #[error("Store id not found on refund item {refund_item}")]
    StoreIdNotFound { refund_item: RefundItemId },

    /// An incoming refund item carried no order id.
    #[error("Order id not found on refund item {refund_item}")]
    OrderIdNotFound { refund_item: RefundItemId },
}

/// Local copy of a refund owned by the payment service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    /// External identity of the refund; the merge key.
    pub id: RefundId,

    /// The tenant the refund belongs to.
    pub tenant_id: Option<TenantId>,

    /// The payment the refund applies to.
    pub payment_id: PaymentId,

    /// When the refund completed, if it has.
    pub completed_time: Option<DateTime<Utc>>,

    /// Per-order refund items.
    pub items: Vec<RefundItem>,
}

impl Refund {
    /// Returns the item with the given id, if present.
    pub fn item(&self, id: RefundItemId) -> Option<&RefundItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// One refunded order inside a refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundItem {
    /// External identity of the item; the child merge key.
    pub id: RefundItemId,

    /// The store the refunded order belongs to.
    pub store_id: StoreId,

    /// The refunded order.
    pub order_id: OrderId,

    /// Total refunded amount for the item.
    pub amount: Money,

    /// Per-order-line refund breakdown.
    pub order_lines: Vec<RefundItemOrderLine>,
}

/// Refund breakdown for a single order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundItemOrderLine {
    /// The refunded order line.
    pub order_line_id: OrderLineId,

    /// Refunded quantity.
    pub quantity: u32,

    /// Refunded amount for the line.
    pub total_amount: Money,
}

/// Incoming refund snapshot as published by the payment service.
///
/// `store_id` and `order_id` arrive as optional because the upstream system
/// carries them as dynamic properties; the merge fails fast when either is
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundSnapshot {
    /// External identity of the refund.
    pub id: RefundId,

    /// The tenant the refund belongs to.
    pub tenant_id: Option<TenantId>,

    /// The payment the refund applies to.
    pub payment_id: PaymentId,

    /// When the refund completed, if it has.
    pub completed_time: Option<DateTime<Utc>>,

    /// Per-order refund items.
    pub items: Vec<RefundItemSnapshot>,
}

/// Incoming refund item snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundItemSnapshot {
    /// External identity of the item.
    pub id: RefundItemId,

    /// The store the refunded order belongs to; required, fails the merge
    /// when absent.
    pub store_id: Option<StoreId>,

    /// The refunded order; required, fails the merge when absent.
    pub order_id: Option<OrderId>,

    /// Total refunded amount for the item.
    pub amount: Money,

    /// Per-order-line refund breakdown.
    pub order_lines: Vec<OrderLineRefundInfo>,
}

/// Incoming per-order-line refund info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRefundInfo {
    /// The refunded order line.
    pub order_line_id: OrderLineId,

    /// Refunded quantity.
    pub quantity: u32,

    /// Refunded amount for the line.
    pub total_amount: Money,
}

/// Announces that a refund reached its completed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundCompleted {
    /// The tenant the refund belongs to.
    pub tenant_id: Option<TenantId>,

    /// The completed refund.
    pub refund: Refund,
}
