//! Handler for external refund entity events.

use common::RefundId;
use domain::{
    DistributedEvent, DistributedEventBus, Refund, RefundCompleted, RefundSnapshot, merge_refund,
};

use crate::error::Result;
use crate::repository::RefundRepository;

/// Keeps the local refund copies in sync with the payment service.
///
/// Consumes the created/updated/deleted events the payment service publishes
/// for its refund entities. All three handlers are idempotent under
/// redelivery; the tenant travels on the snapshot, never in ambient state.
pub struct RefundSynchronizer<R, B>
where
    R: RefundRepository,
    B: DistributedEventBus,
{
    repository: R,
    bus: B,
}

impl<R, B> RefundSynchronizer<R, B>
where
    R: RefundRepository,
    B: DistributedEventBus,
{
    /// Creates a new synchronizer.
    pub fn new(repository: R, bus: B) -> Self {
        Self { repository, bus }
    }

    /// Handles a refund-created event.
    ///
    /// A snapshot already stored is a redelivery and is skipped.
    #[tracing::instrument(skip(self, snapshot), fields(refund_id = %snapshot.id))]
    pub async fn handle_created(&self, snapshot: &RefundSnapshot) -> Result<()> {
        if self.repository.find(snapshot.id).await?.is_some() {
            return Ok(());
        }

        let outcome = merge_refund(None, snapshot)?;
        self.repository.upsert(outcome.refund.clone()).await?;
        metrics::counter!("refunds_synchronized_total").increment(1);

        if outcome.completed {
            self.publish_completed(outcome.refund).await?;
        }
        Ok(())
    }

    /// Handles a refund-updated event.
    ///
    /// An update for a refund never seen is skipped; its created event may
    /// still be in flight, and redelivery converges the copies.
    #[tracing::instrument(skip(self, snapshot), fields(refund_id = %snapshot.id))]
    pub async fn handle_updated(&self, snapshot: &RefundSnapshot) -> Result<()> {
        let Some(existing) = self.repository.find(snapshot.id).await? else {
            tracing::debug!("update for a refund not yet synchronized, skipping");
            return Ok(());
        };

        let outcome = merge_refund(Some(&existing), snapshot)?;
        self.repository.upsert(outcome.refund.clone()).await?;

        if outcome.completed {
            self.publish_completed(outcome.refund).await?;
        }
        Ok(())
    }

    /// Handles a refund-deleted event.
    #[tracing::instrument(skip(self), fields(%refund_id))]
    pub async fn handle_deleted(&self, refund_id: RefundId) -> Result<()> {
        self.repository.remove(refund_id).await
    }

    async fn publish_completed(&self, refund: Refund) -> Result<()> {
        let tenant_id = refund.tenant_id;
        self.bus
            .publish(DistributedEvent::RefundCompleted(RefundCompleted {
                tenant_id,
                refund,
            }))
            .await?;
        metrics::counter!("refunds_completed_total").increment(1);
        Ok(())
    }
}
