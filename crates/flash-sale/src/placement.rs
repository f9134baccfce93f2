//! Order placement: the pre-order step that reserves inventory and starts
//! the result pipeline.

use std::sync::Arc;

use chrono::Utc;
use common::{ExtraProperties, ResultId, TenantId, UserId};
use domain::{CreateFlashSaleResult, DistributedEvent, DistributedEventBus, FlashSalePlan};
use inventory::FlashSaleInventoryManager;
use uuid::Uuid;

use crate::error::Result;
use crate::outbox::{RollbackInstruction, RollbackOutbox};

/// Outcome of an order placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// A unit was reserved and the result-creation event published.
    Submitted {
        /// Identity assigned to the attempt; every follow-up event reuses it.
        result_id: ResultId,
    },

    /// The plan is unpublished or outside its sale window.
    PlanNotInProgress,

    /// No stock remained. A business-rule rejection, not a fault.
    InventoryNotEnough,
}

/// Places flash-sale orders: window check, reservation, result request.
pub struct FlashSaleOrderPlacement<B: DistributedEventBus> {
    inventory: Arc<FlashSaleInventoryManager>,
    bus: B,
    outbox: Arc<RollbackOutbox>,
}

impl<B: DistributedEventBus> FlashSaleOrderPlacement<B> {
    /// Creates a new placement service.
    pub fn new(
        inventory: Arc<FlashSaleInventoryManager>,
        bus: B,
        outbox: Arc<RollbackOutbox>,
    ) -> Self {
        Self {
            inventory,
            bus,
            outbox,
        }
    }

    /// Attempts to place a flash-sale order for `user_id`.
    ///
    /// On success one unit is reserved and a `CreateFlashSaleResult` event
    /// carrying a fresh result id is published; whether the attempt actually
    /// wins is decided later by the result handler.
    #[tracing::instrument(
        skip(self, plan, extra_properties),
        fields(plan_id = %plan.id(), user_id = %user_id)
    )]
    pub async fn place_order(
        &self,
        tenant_id: Option<TenantId>,
        plan: &FlashSalePlan,
        user_id: UserId,
        customer_remark: Option<String>,
        provider_name: &str,
        extra_properties: ExtraProperties,
    ) -> Result<PlacementOutcome> {
        let now = Utc::now();

        if !plan.is_in_progress(now) {
            metrics::counter!("flash_sale_placements_outside_window_total").increment(1);
            return Ok(PlacementOutcome::PlanNotInProgress);
        }

        let reserved = self
            .inventory
            .try_reserve(
                tenant_id,
                provider_name,
                plan.store_id(),
                plan.product_id(),
                plan.product_sku_id(),
                1,
            )
            .await?;
        if !reserved {
            metrics::counter!("flash_sale_placements_sold_out_total").increment(1);
            return Ok(PlacementOutcome::InventoryNotEnough);
        }

        let event = CreateFlashSaleResult {
            tenant_id,
            result_id: ResultId::new(),
            user_id,
            customer_remark,
            plan: plan.snapshot(),
            hash_token: Uuid::new_v4().simple().to_string(),
            reduced_inventory_time: Some(now),
            product_inventory_provider_name: provider_name.to_string(),
            extra_properties,
        };
        let result_id = event.result_id;
        let rollback = RollbackInstruction::for_result_event(&event);

        if let Err(error) = self
            .bus
            .publish(DistributedEvent::CreateFlashSaleResult(event))
            .await
        {
            // The reservation is orphaned without its event; restore it on
            // the outbox's retry policy before surfacing the failure.
            self.outbox.enqueue(rollback).await;
            return Err(error.into());
        }

        metrics::counter!("flash_sale_placements_submitted_total").increment(1);
        Ok(PlacementOutcome::Submitted { result_id })
    }
}
