//! Reconciliation of results against the order pipeline's outcome.

use std::sync::Arc;

use cache::{CacheItem, CurrentResultCache};
use common::{OrderId, ResultId};
use domain::{
    DistributedEvent, DistributedEventBus, FlashSaleResultCompleted, FlashSaleResultStatus,
};
use result_store::FlashSaleResultRepository;

use crate::error::{FlashSaleError, Result};
use crate::outbox::{RollbackInstruction, RollbackOutbox};

/// Applies the downstream order pipeline's outcome to a pending result.
///
/// The pipeline reports per result id (the identity it de-duplicated on), so
/// both callbacks are idempotent under redelivery.
pub struct FlashSaleOrderOutcomeHandler<R, C, B>
where
    R: FlashSaleResultRepository,
    C: CurrentResultCache,
    B: DistributedEventBus,
{
    repository: R,
    cache: C,
    bus: B,
    outbox: Arc<RollbackOutbox>,
}

impl<R, C, B> FlashSaleOrderOutcomeHandler<R, C, B>
where
    R: FlashSaleResultRepository,
    C: CurrentResultCache,
    B: DistributedEventBus,
{
    /// Creates a new outcome handler.
    pub fn new(repository: R, cache: C, bus: B, outbox: Arc<RollbackOutbox>) -> Self {
        Self {
            repository,
            cache,
            bus,
            outbox,
        }
    }

    /// Records that an order materialized for the attempt.
    ///
    /// Transitions the result to Succeeded, refreshes the cache and announces
    /// completion. Redelivery of the same outcome is a no-op.
    #[tracing::instrument(skip(self), fields(%result_id, %order_id))]
    pub async fn handle_order_created(&self, result_id: ResultId, order_id: OrderId) -> Result<()> {
        let Some(mut result) = self.repository.find(result_id).await? else {
            return Err(FlashSaleError::ResultNotFound(result_id));
        };

        if result.status() == FlashSaleResultStatus::Succeeded
            && result.order_id() == Some(order_id)
        {
            return Ok(());
        }

        result.succeed(order_id)?;
        self.repository.update(&result).await?;

        self.cache
            .set(
                result.plan_id(),
                result.user_id(),
                CacheItem {
                    tenant_id: result.tenant_id(),
                    result: result.snapshot(),
                },
            )
            .await?;

        self.bus
            .publish(DistributedEvent::FlashSaleResultCompleted(
                FlashSaleResultCompleted {
                    tenant_id: result.tenant_id(),
                    order_id,
                    result: result.snapshot(),
                },
            ))
            .await?;

        metrics::counter!("flash_sale_results_succeeded_total").increment(1);
        tracing::info!("flash sale result completed");
        Ok(())
    }

    /// Records that the order pipeline rejected the attempt.
    ///
    /// Transitions the result to Failed, refreshes the cache and hands the
    /// attempt's reservation to the rollback outbox. Redelivery of the same
    /// outcome is a no-op.
    #[tracing::instrument(skip(self, rollback), fields(%result_id))]
    pub async fn handle_order_creation_failed(
        &self,
        result_id: ResultId,
        reason: &str,
        rollback: RollbackInstruction,
    ) -> Result<()> {
        let Some(mut result) = self.repository.find(result_id).await? else {
            return Err(FlashSaleError::ResultNotFound(result_id));
        };

        if result.status() == FlashSaleResultStatus::Failed {
            return Ok(());
        }

        result.fail(reason)?;
        self.repository.update(&result).await?;

        self.cache
            .set(
                result.plan_id(),
                result.user_id(),
                CacheItem {
                    tenant_id: result.tenant_id(),
                    result: result.snapshot(),
                },
            )
            .await?;

        self.outbox.enqueue(rollback).await;

        metrics::counter!("flash_sale_results_failed_total").increment(1);
        tracing::warn!(reason, "flash sale order creation failed");
        Ok(())
    }
}
