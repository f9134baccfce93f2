//! Repository contract for flash-sale results.

use async_trait::async_trait;
use common::{OrderId, PlanId, ResultId, StoreId, UserId};
use domain::{FlashSaleResult, FlashSaleResultStatus};

use crate::error::Result;

/// Filter for listing results.
///
/// Unset fields match everything; set fields are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct ResultListFilter {
    /// Restrict to one store.
    pub store_id: Option<StoreId>,

    /// Restrict to one plan.
    pub plan_id: Option<PlanId>,

    /// Restrict to one user.
    pub user_id: Option<UserId>,

    /// Restrict to one status.
    pub status: Option<FlashSaleResultStatus>,

    /// Restrict to the result holding one order.
    pub order_id: Option<OrderId>,
}

impl ResultListFilter {
    /// Creates a filter matching every result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to one store.
    pub fn store_id(mut self, store_id: StoreId) -> Self {
        self.store_id = Some(store_id);
        self
    }

    /// Restricts the filter to one plan.
    pub fn plan_id(mut self, plan_id: PlanId) -> Self {
        self.plan_id = Some(plan_id);
        self
    }

    /// Restricts the filter to one user.
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Restricts the filter to one status.
    pub fn status(mut self, status: FlashSaleResultStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the filter to the result holding one order.
    pub fn order_id(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Returns true when `result` matches the filter.
    pub fn matches(&self, result: &FlashSaleResult) -> bool {
        self.store_id.is_none_or(|id| result.store_id() == id)
            && self.plan_id.is_none_or(|id| result.plan_id() == id)
            && self.user_id.is_none_or(|id| result.user_id() == id)
            && self.status.is_none_or(|s| result.status() == s)
            && self.order_id.is_none_or(|id| result.order_id() == Some(id))
    }
}

/// Durable store of flash-sale results.
///
/// All implementations must be thread-safe (Send + Sync). Reads and writes
/// are individually atomic; cross-call exclusivity for one (plan, user) pair
/// is the orchestrator's job, via the distributed lock.
#[async_trait]
pub trait FlashSaleResultRepository: Send + Sync {
    /// Inserts a new result.
    ///
    /// Fails with `DuplicateResult` if the id is already stored and with
    /// `OngoingResultExists` if a non-Failed result already exists for the
    /// same (plan, user) pair.
    async fn insert(&self, result: &FlashSaleResult) -> Result<()>;

    /// Updates an existing result.
    ///
    /// Fails with `ResultNotFound` if the id is not stored.
    async fn update(&self, result: &FlashSaleResult) -> Result<()>;

    /// Finds a result by id.
    async fn find(&self, id: ResultId) -> Result<Option<FlashSaleResult>>;

    /// Finds the non-Failed result for a (plan, user) pair, if one exists.
    ///
    /// This is the duplicate-detection read the orchestrator runs inside its
    /// critical section.
    async fn find_ongoing(
        &self,
        plan_id: PlanId,
        user_id: UserId,
    ) -> Result<Option<FlashSaleResult>>;

    /// Lists results matching the filter.
    async fn list(&self, filter: &ResultListFilter) -> Result<Vec<FlashSaleResult>>;
}
