//! Flash-sale result entity.

use chrono::{DateTime, Utc};
use common::{OrderId, PlanId, ResultId, StoreId, TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Status of a flash-sale attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashSaleResultStatus {
    /// The attempt won its race and is waiting for the order pipeline.
    Pending,

    /// An order materialized for the attempt.
    Succeeded,

    /// The order pipeline rejected the attempt.
    Failed,
}

impl FlashSaleResultStatus {
    /// Returns the lowercase storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashSaleResultStatus::Pending => "pending",
            FlashSaleResultStatus::Succeeded => "succeeded",
            FlashSaleResultStatus::Failed => "failed",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(FlashSaleResultStatus::Pending),
            "succeeded" => Some(FlashSaleResultStatus::Succeeded),
            "failed" => Some(FlashSaleResultStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for FlashSaleResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record per (plan, user) flash-sale attempt.
///
/// The id is assigned by the initiating event, not at persistence time; it is
/// the idempotency key the whole pipeline de-duplicates on. At most one
/// non-Failed result may exist per (plan, user) pair; the orchestrator
/// enforces that under a distributed lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashSaleResult {
    id: ResultId,
    tenant_id: Option<TenantId>,
    store_id: StoreId,
    plan_id: PlanId,
    user_id: UserId,
    status: FlashSaleResultStatus,
    order_id: Option<OrderId>,
    reason: Option<String>,
    reduced_inventory_time: Option<DateTime<Utc>>,
}

impl FlashSaleResult {
    /// Creates a new pending result with the caller-supplied id.
    pub fn new(
        id: ResultId,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        plan_id: PlanId,
        user_id: UserId,
        reduced_inventory_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            tenant_id,
            store_id,
            plan_id,
            user_id,
            status: FlashSaleResultStatus::Pending,
            order_id: None,
            reason: None,
            reduced_inventory_time,
        }
    }

    /// Rebuilds a result from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ResultId,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        plan_id: PlanId,
        user_id: UserId,
        status: FlashSaleResultStatus,
        order_id: Option<OrderId>,
        reason: Option<String>,
        reduced_inventory_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            tenant_id,
            store_id,
            plan_id,
            user_id,
            status,
            order_id,
            reason,
            reduced_inventory_time,
        }
    }

    /// Returns the result id.
    pub fn id(&self) -> ResultId {
        self.id
    }

    /// Returns the tenant the attempt belongs to.
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Returns the store the plan belongs to.
    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    /// Returns the plan id.
    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    /// Returns the user who made the attempt.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the current status.
    pub fn status(&self) -> FlashSaleResultStatus {
        self.status
    }

    /// Returns the order created for the attempt, once one materialized.
    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    /// Returns the failure reason, if the attempt failed.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns when inventory was decremented for this attempt.
    pub fn reduced_inventory_time(&self) -> Option<DateTime<Utc>> {
        self.reduced_inventory_time
    }

    /// Marks the attempt as succeeded, recording the materialized order.
    pub fn succeed(&mut self, order_id: OrderId) -> Result<(), DomainError> {
        if self.status != FlashSaleResultStatus::Pending {
            return Err(DomainError::InvalidStatusTransition {
                result_id: self.id,
                from: self.status,
                to: FlashSaleResultStatus::Succeeded,
            });
        }
        self.status = FlashSaleResultStatus::Succeeded;
        self.order_id = Some(order_id);
        Ok(())
    }

    /// Marks the attempt as failed.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        if self.status != FlashSaleResultStatus::Pending {
            return Err(DomainError::InvalidStatusTransition {
                result_id: self.id,
                from: self.status,
                to: FlashSaleResultStatus::Failed,
            });
        }
        self.status = FlashSaleResultStatus::Failed;
        self.reason = Some(reason.into());
        Ok(())
    }

    /// Returns the snapshot DTO handed to caches and completion events.
    pub fn snapshot(&self) -> FlashSaleResultSnapshot {
        FlashSaleResultSnapshot {
            id: self.id,
            store_id: self.store_id,
            plan_id: self.plan_id,
            user_id: self.user_id,
            status: self.status,
            order_id: self.order_id,
            reason: self.reason.clone(),
            reduced_inventory_time: self.reduced_inventory_time,
        }
    }
}

/// Read-only view of a result, carried in caches and completion events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashSaleResultSnapshot {
    /// The result id.
    pub id: ResultId,

    /// The store the plan belongs to.
    pub store_id: StoreId,

    /// The plan id.
    pub plan_id: PlanId,

    /// The user who made the attempt.
    pub user_id: UserId,

    /// The status at snapshot time.
    pub status: FlashSaleResultStatus,

    /// The order created for the attempt, if any.
    pub order_id: Option<OrderId>,

    /// The failure reason, if any.
    pub reason: Option<String>,

    /// When inventory was decremented for this attempt.
    pub reduced_inventory_time: Option<DateTime<Utc>>,
}
