//! Handler for `CreateFlashSaleResult` events.

use std::sync::Arc;

use cache::{CacheItem, CurrentResultCache};
use domain::{
    CreateFlashSaleOrder, CreateFlashSaleResult, DistributedEvent, DistributedEventBus,
    FlashSaleResult,
};
use lock::{LockProvider, result_creation_key};
use result_store::FlashSaleResultRepository;

use crate::config::FlashSaleConfig;
use crate::error::{FlashSaleError, Result};
use crate::outbox::{RollbackInstruction, RollbackOutbox};

/// How an invocation was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// First-seen attempt: a result was created and an order requested.
    Created,

    /// Redundant delivery or race loser: no result created, no order
    /// requested, losing reservation handed to the rollback outbox.
    Duplicate,
}

/// Orchestrates result creation for flash-sale attempts.
///
/// Consumes the result-creation event the placement step publishes after
/// reserving inventory. Attempts for the same (plan, user) pair are
/// serialized behind a distributed lock; inside the critical section the
/// durable store decides whether this delivery is the winner or a duplicate.
pub struct CreateFlashSaleResultHandler<L, R, C, B>
where
    L: LockProvider,
    R: FlashSaleResultRepository,
    C: CurrentResultCache,
    B: DistributedEventBus,
{
    lock: L,
    repository: R,
    cache: C,
    bus: B,
    outbox: Arc<RollbackOutbox>,
    config: FlashSaleConfig,
}

impl<L, R, C, B> CreateFlashSaleResultHandler<L, R, C, B>
where
    L: LockProvider,
    R: FlashSaleResultRepository,
    C: CurrentResultCache,
    B: DistributedEventBus,
{
    /// Creates a new handler.
    pub fn new(
        lock: L,
        repository: R,
        cache: C,
        bus: B,
        outbox: Arc<RollbackOutbox>,
        config: FlashSaleConfig,
    ) -> Self {
        Self {
            lock,
            repository,
            cache,
            bus,
            outbox,
            config,
        }
    }

    /// Handles one delivery of a result-creation event.
    ///
    /// Fails with [`FlashSaleError::ConcurrencyConflict`] when the lock is
    /// not acquired within its bounded wait; the bus's redelivery policy owns
    /// the retry. No side effects have happened at that point.
    #[tracing::instrument(
        skip(self, event),
        fields(plan_id = %event.plan.id, user_id = %event.user_id, result_id = %event.result_id)
    )]
    pub async fn handle(&self, event: &CreateFlashSaleResult) -> Result<Handled> {
        metrics::counter!("flash_sale_result_events_total").increment(1);
        let started = std::time::Instant::now();

        let key = result_creation_key(event.plan.id, event.user_id);
        let Some(_guard) = self.lock.try_acquire(&key, self.config.lock_timeout).await? else {
            metrics::counter!("flash_sale_lock_conflicts_total").increment(1);
            return Err(FlashSaleError::ConcurrencyConflict { key });
        };

        if let Some(ongoing) = self
            .repository
            .find_ongoing(event.plan.id, event.user_id)
            .await?
        {
            tracing::warn!(winner = %ongoing.id(), "duplicate flash sale result creation");
            metrics::counter!("flash_sale_duplicate_attempts_total").increment(1);

            // The cache must reflect the winning result, never this losing
            // delivery.
            self.cache
                .set(
                    event.plan.id,
                    event.user_id,
                    CacheItem {
                        tenant_id: ongoing.tenant_id(),
                        result: ongoing.snapshot(),
                    },
                )
                .await?;

            // This delivery's reservation lost the race; restore it after the
            // fact, on the outbox's own retry policy.
            self.outbox
                .enqueue(RollbackInstruction::for_result_event(event))
                .await;

            return Ok(Handled::Duplicate);
        }

        let result = FlashSaleResult::new(
            event.result_id,
            event.tenant_id,
            event.plan.store_id,
            event.plan.id,
            event.user_id,
            event.reduced_inventory_time,
        );
        let order = CreateFlashSaleOrder::for_result(event);

        // Publish before persisting: if the insert fails, a redelivery finds
        // no ongoing result and publishes again with the same result id, so
        // the order consumer can still de-duplicate. Persist-first would
        // instead drop the order on the floor.
        self.bus
            .publish(DistributedEvent::CreateFlashSaleOrder(order))
            .await?;
        self.repository.insert(&result).await?;

        self.cache
            .set(
                event.plan.id,
                event.user_id,
                CacheItem {
                    tenant_id: result.tenant_id(),
                    result: result.snapshot(),
                },
            )
            .await?;

        metrics::counter!("flash_sale_results_created_total").increment(1);
        metrics::histogram!("flash_sale_handle_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        Ok(Handled::Created)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cache::InMemoryCurrentResultCache;
    use chrono::Utc;
    use common::{PlanId, ProductId, ProductSkuId, ResultId, StoreId, TenantId, UserId};
    use domain::{InMemoryEventBus, PlanSnapshot};
    use lock::InMemoryLockProvider;
    use result_store::InMemoryResultRepository;

    use super::*;

    type TestHandler = CreateFlashSaleResultHandler<
        InMemoryLockProvider,
        InMemoryResultRepository,
        InMemoryCurrentResultCache,
        InMemoryEventBus,
    >;

    struct TestHarness {
        handler: TestHandler,
        lock: InMemoryLockProvider,
        repository: InMemoryResultRepository,
        cache: InMemoryCurrentResultCache,
        bus: InMemoryEventBus,
        outbox: Arc<RollbackOutbox>,
    }

    impl TestHarness {
        fn new() -> Self {
            Self::with_config(FlashSaleConfig::default())
        }

        fn with_config(config: FlashSaleConfig) -> Self {
            let lock = InMemoryLockProvider::new();
            let repository = InMemoryResultRepository::new();
            let cache = InMemoryCurrentResultCache::new();
            let bus = InMemoryEventBus::new();
            let outbox = Arc::new(RollbackOutbox::new(config.rollback_max_attempts));

            let handler = CreateFlashSaleResultHandler::new(
                lock.clone(),
                repository.clone(),
                cache.clone(),
                bus.clone(),
                Arc::clone(&outbox),
                config,
            );

            Self {
                handler,
                lock,
                repository,
                cache,
                bus,
                outbox,
            }
        }
    }

    fn event_for(plan_id: PlanId, user_id: UserId) -> CreateFlashSaleResult {
        CreateFlashSaleResult {
            tenant_id: Some(TenantId::new()),
            result_id: ResultId::new(),
            user_id,
            customer_remark: None,
            plan: PlanSnapshot {
                id: plan_id,
                store_id: StoreId::new(),
                product_id: ProductId::new(),
                product_sku_id: ProductSkuId::new(),
            },
            hash_token: "token".to_string(),
            reduced_inventory_time: Some(Utc::now()),
            product_inventory_provider_name: "default".to_string(),
            extra_properties: Default::default(),
        }
    }

    #[tokio::test]
    async fn first_seen_creates_result_and_requests_order() {
        let h = TestHarness::new();
        let event = event_for(PlanId::new(), UserId::new());

        let handled = h.handler.handle(&event).await.unwrap();

        assert_eq!(handled, Handled::Created);
        assert_eq!(h.bus.published_count("CreateFlashSaleOrder"), 1);
        assert_eq!(h.outbox.pending_count().await, 0);

        let stored = h.repository.find(event.result_id).await.unwrap().unwrap();
        assert_eq!(stored.id(), event.result_id);
        assert_eq!(stored.plan_id(), event.plan.id);
        assert_eq!(stored.user_id(), event.user_id);

        // The cache already reflects the new pending outcome.
        let cached = h
            .cache
            .get(event.plan.id, event.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.result.id, event.result_id);

        // Lock released: an unrelated acquisition of the same key succeeds.
        let key = result_creation_key(event.plan.id, event.user_id);
        assert!(
            h.lock
                .try_acquire(&key, Duration::ZERO)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn order_event_carries_the_attempt_identity() {
        let h = TestHarness::new();
        let mut event = event_for(PlanId::new(), UserId::new());
        event.customer_remark = Some("ring twice".to_string());
        event.extra_properties.set("coupon", "WELCOME10".into());

        h.handler.handle(&event).await.unwrap();

        let published = h.bus.published();
        let DistributedEvent::CreateFlashSaleOrder(order) = &published[0] else {
            panic!("expected an order-creation event");
        };
        assert_eq!(order.result_id, event.result_id);
        assert_eq!(order.plan, event.plan);
        assert_eq!(order.hash_token, event.hash_token);
        assert_eq!(order.customer_remark, event.customer_remark);
        assert_eq!(order.extra_properties, event.extra_properties);
    }

    #[tokio::test]
    async fn second_attempt_for_pair_takes_the_duplicate_path() {
        let h = TestHarness::new();
        let plan_id = PlanId::new();
        let user_id = UserId::new();

        let winner = event_for(plan_id, user_id);
        assert_eq!(h.handler.handle(&winner).await.unwrap(), Handled::Created);

        let mut loser = event_for(plan_id, user_id);
        loser.plan = winner.plan.clone();
        assert_eq!(h.handler.handle(&loser).await.unwrap(), Handled::Duplicate);

        // One result, one order request, one queued rollback.
        assert_eq!(h.repository.count().await, 1);
        assert_eq!(h.bus.published_count("CreateFlashSaleOrder"), 1);
        assert_eq!(h.outbox.pending_count().await, 1);

        // The cache reflects the winner, not the losing delivery.
        let cached = h.cache.get(plan_id, user_id).await.unwrap().unwrap();
        assert_eq!(cached.result.id, winner.result_id);
    }

    #[tokio::test]
    async fn redelivery_reuses_the_result_identity() {
        let h = TestHarness::new();
        let event = event_for(PlanId::new(), UserId::new());

        assert_eq!(h.handler.handle(&event).await.unwrap(), Handled::Created);
        assert_eq!(h.handler.handle(&event).await.unwrap(), Handled::Duplicate);

        // No second order request was published for the redelivery.
        assert_eq!(h.bus.published_count("CreateFlashSaleOrder"), 1);
        assert_eq!(h.repository.count().await, 1);

        let cached = h
            .cache
            .get(event.plan.id, event.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.result.id, event.result_id);
    }

    #[tokio::test]
    async fn lock_conflict_has_no_side_effects() {
        let config = FlashSaleConfig {
            lock_timeout: Duration::from_millis(20),
            ..FlashSaleConfig::default()
        };
        let h = TestHarness::with_config(config);
        let event = event_for(PlanId::new(), UserId::new());

        let key = result_creation_key(event.plan.id, event.user_id);
        let _held = h.lock.try_acquire(&key, Duration::ZERO).await.unwrap();

        let err = h.handler.handle(&event).await.unwrap_err();

        assert!(matches!(err, FlashSaleError::ConcurrencyConflict { .. }));
        assert_eq!(h.repository.count().await, 0);
        assert!(h.bus.published().is_empty());
        assert_eq!(h.outbox.pending_count().await, 0);
    }

    #[tokio::test]
    async fn failed_publish_leaves_no_result_behind() {
        let h = TestHarness::new();
        let event = event_for(PlanId::new(), UserId::new());
        h.bus.set_fail_next(true);

        let err = h.handler.handle(&event).await.unwrap_err();
        assert!(matches!(err, FlashSaleError::EventBus(_)));
        assert_eq!(h.repository.count().await, 0);

        // Redelivery succeeds with the same identity.
        assert_eq!(h.handler.handle(&event).await.unwrap(), Handled::Created);
        assert!(h.repository.find(event.result_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn failed_attempt_does_not_block_a_retry() {
        let h = TestHarness::new();
        let plan_id = PlanId::new();
        let user_id = UserId::new();

        let first = event_for(plan_id, user_id);
        h.handler.handle(&first).await.unwrap();

        // The order pipeline failed the attempt; the stored result is now
        // terminal-failed.
        let mut failed = h.repository.find(first.result_id).await.unwrap().unwrap();
        failed.fail("payment expired").unwrap();
        h.repository.update(&failed).await.unwrap();

        // A fresh attempt by the same user wins again.
        let mut second = event_for(plan_id, user_id);
        second.plan = first.plan.clone();
        assert_eq!(h.handler.handle(&second).await.unwrap(), Handled::Created);
        assert_eq!(h.bus.published_count("CreateFlashSaleOrder"), 2);
    }
}
