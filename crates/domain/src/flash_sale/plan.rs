//! Flash-sale plan entity and the denormalized snapshot carried in events.

use chrono::{DateTime, Utc};
use common::{PlanId, ProductId, ProductSkuId, StoreId};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A discount campaign for one (store, product, SKU) tuple.
///
/// The plan has a fixed inventory pool and a time window. Once announced it is
/// immutable except for remaining-inventory decrements, which are owned by the
/// inventory manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashSalePlan {
    id: PlanId,
    store_id: StoreId,
    product_id: ProductId,
    product_sku_id: ProductSkuId,
    begin_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    published: bool,
    total_inventory: u32,
    price: Money,
}

impl FlashSalePlan {
    /// Creates a new plan.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: PlanId,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
        begin_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        published: bool,
        total_inventory: u32,
        price: Money,
    ) -> Self {
        Self {
            id,
            store_id,
            product_id,
            product_sku_id,
            begin_time,
            end_time,
            published,
            total_inventory,
            price,
        }
    }

    /// Returns the plan id.
    pub fn id(&self) -> PlanId {
        self.id
    }

    /// Returns the store this plan belongs to.
    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    /// Returns the discounted product.
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Returns the discounted SKU.
    pub fn product_sku_id(&self) -> ProductSkuId {
        self.product_sku_id
    }

    /// Returns the start of the sale window.
    pub fn begin_time(&self) -> DateTime<Utc> {
        self.begin_time
    }

    /// Returns the end of the sale window (exclusive).
    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Returns whether the plan has been published.
    pub fn published(&self) -> bool {
        self.published
    }

    /// Returns the size of the inventory pool the plan was announced with.
    pub fn total_inventory(&self) -> u32 {
        self.total_inventory
    }

    /// Returns the discounted price.
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns true when the plan is published and `now` falls inside the
    /// sale window.
    pub fn is_in_progress(&self, now: DateTime<Utc>) -> bool {
        self.published && self.begin_time <= now && now < self.end_time
    }

    /// Returns the denormalized snapshot carried inside events.
    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            id: self.id,
            store_id: self.store_id,
            product_id: self.product_id,
            product_sku_id: self.product_sku_id,
        }
    }
}

/// Denormalized plan fields carried inside events.
///
/// Events carry these instead of the plan id alone so that handlers racing
/// inside the sale window never have to re-fetch the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// The plan id.
    pub id: PlanId,

    /// The store the plan belongs to.
    pub store_id: StoreId,

    /// The discounted product.
    pub product_id: ProductId,

    /// The discounted SKU.
    pub product_sku_id: ProductSkuId,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn plan_between(begin: DateTime<Utc>, end: DateTime<Utc>, published: bool) -> FlashSalePlan {
        FlashSalePlan::new(
            PlanId::new(),
            StoreId::new(),
            ProductId::new(),
            ProductSkuId::new(),
            begin,
            end,
            published,
            10,
            Money::from_cents(990),
        )
    }

    #[test]
    fn in_progress_inside_window() {
        let now = Utc::now();
        let plan = plan_between(now - Duration::hours(1), now + Duration::hours(1), true);
        assert!(plan.is_in_progress(now));
    }

    #[test]
    fn not_in_progress_before_window() {
        let now = Utc::now();
        let plan = plan_between(now + Duration::hours(1), now + Duration::hours(2), true);
        assert!(!plan.is_in_progress(now));
    }

    #[test]
    fn not_in_progress_after_window() {
        let now = Utc::now();
        let plan = plan_between(now - Duration::hours(2), now - Duration::hours(1), true);
        assert!(!plan.is_in_progress(now));
    }

    #[test]
    fn end_time_is_exclusive() {
        let now = Utc::now();
        let plan = plan_between(now - Duration::hours(1), now, true);
        assert!(!plan.is_in_progress(now));
    }

    #[test]
    fn unpublished_plan_is_never_in_progress() {
        let now = Utc::now();
        let plan = plan_between(now - Duration::hours(1), now + Duration::hours(1), false);
        assert!(!plan.is_in_progress(now));
    }

    #[test]
    fn snapshot_copies_denormalized_fields() {
        let now = Utc::now();
        let plan = plan_between(now, now + Duration::hours(1), true);
        let snapshot = plan.snapshot();

        assert_eq!(snapshot.id, plan.id());
        assert_eq!(snapshot.store_id, plan.store_id());
        assert_eq!(snapshot.product_id, plan.product_id());
        assert_eq!(snapshot.product_sku_id, plan.product_sku_id());
    }
}
