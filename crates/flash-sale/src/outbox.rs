//! After-commit rollback queue.
//!
//! Compensating inventory rollbacks run outside the handler invocation that
//! requested them, on their own retry policy. A rollback that keeps failing
//! is abandoned with a warning; bounded inventory drift is an accepted,
//! monitored risk; it never violates the result invariant.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use common::{ProductId, ProductSkuId, StoreId, TenantId};
use domain::CreateFlashSaleResult;
use inventory::FlashSaleInventoryManager;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// A single compensating rollback: restore one reserved unit.
///
/// Built only from the losing event's own snapshot fields, so it can never
/// name anything but the pool that event reserved from.
#[derive(Debug, Clone)]
pub struct RollbackInstruction {
    /// The tenant the reservation belongs to.
    pub tenant_id: Option<TenantId>,

    /// The inventory provider holding the reserved unit.
    pub provider_name: String,

    /// The store the plan belongs to.
    pub store_id: StoreId,

    /// The discounted product.
    pub product_id: ProductId,

    /// The discounted SKU.
    pub product_sku_id: ProductSkuId,
}

impl RollbackInstruction {
    /// Builds the rollback for the reservation a result-creation event made.
    pub fn for_result_event(event: &CreateFlashSaleResult) -> Self {
        Self {
            tenant_id: event.tenant_id,
            provider_name: event.product_inventory_provider_name.clone(),
            store_id: event.plan.store_id,
            product_id: event.plan.product_id,
            product_sku_id: event.plan.product_sku_id,
        }
    }
}

#[derive(Debug)]
struct PendingRollback {
    instruction: RollbackInstruction,
    attempts: u32,
}

/// Queue of compensating rollbacks with a bounded per-task retry policy.
///
/// Enqueueing never blocks on inventory I/O; tasks run when
/// [`RollbackOutbox::process_pending`] drains the queue, decoupled from
/// whatever transaction requested them.
pub struct RollbackOutbox {
    pending: Mutex<VecDeque<PendingRollback>>,
    max_attempts: u32,
}

impl RollbackOutbox {
    /// Creates an outbox abandoning tasks after `max_attempts` tries.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Enqueues a compensating rollback.
    pub async fn enqueue(&self, instruction: RollbackInstruction) {
        self.pending.lock().await.push_back(PendingRollback {
            instruction,
            attempts: 0,
        });
    }

    /// Returns the number of queued tasks.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Runs one pass over the queued tasks, returning how many applied.
    ///
    /// Tasks that fail are requeued until their attempts run out; exhausted
    /// tasks are dropped with a warning.
    pub async fn process_pending(&self, inventory: &FlashSaleInventoryManager) -> usize {
        let batch: Vec<PendingRollback> = {
            let mut pending = self.pending.lock().await;
            pending.drain(..).collect()
        };

        let mut applied = 0;
        for mut task in batch {
            task.attempts += 1;

            let rolled_back = match inventory
                .try_roll_back(
                    task.instruction.tenant_id,
                    &task.instruction.provider_name,
                    task.instruction.store_id,
                    task.instruction.product_id,
                    task.instruction.product_sku_id,
                )
                .await
            {
                Ok(rolled_back) => rolled_back,
                Err(error) => {
                    tracing::warn!(%error, "inventory rollback errored");
                    false
                }
            };

            if rolled_back {
                applied += 1;
                metrics::counter!("inventory_rollbacks_total").increment(1);
            } else if task.attempts >= self.max_attempts {
                tracing::warn!(
                    provider_name = %task.instruction.provider_name,
                    store_id = %task.instruction.store_id,
                    product_sku_id = %task.instruction.product_sku_id,
                    attempts = task.attempts,
                    "failed to roll back flash sale inventory, giving up"
                );
                metrics::counter!("inventory_rollbacks_abandoned_total").increment(1);
            } else {
                self.pending.lock().await.push_back(task);
            }
        }

        applied
    }

    /// Spawns a worker that drains the queue on an interval.
    pub fn spawn_worker(
        self: Arc<Self>,
        inventory: Arc<FlashSaleInventoryManager>,
        interval: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.process_pending(&inventory).await;
            }
        })
    }
}
