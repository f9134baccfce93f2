//! Client polling for the current attempt outcome.

use cache::{CacheItem, CurrentResultCache};
use common::{PlanId, UserId};
use domain::FlashSaleResultSnapshot;
use result_store::FlashSaleResultRepository;

use crate::error::Result;

/// Cache-first lookup of the latest known outcome for a (plan, user) pair.
///
/// Lets clients poll "has my attempt resolved" without contending on the
/// durable store or the distributed lock. The cache is best-effort: a miss
/// falls back to the repository and refills the cache.
pub struct CurrentResultQuery<R, C>
where
    R: FlashSaleResultRepository,
    C: CurrentResultCache,
{
    repository: R,
    cache: C,
}

impl<R, C> CurrentResultQuery<R, C>
where
    R: FlashSaleResultRepository,
    C: CurrentResultCache,
{
    /// Creates a new query service.
    pub fn new(repository: R, cache: C) -> Self {
        Self { repository, cache }
    }

    /// Returns the latest known outcome for a (plan, user) pair.
    #[tracing::instrument(skip(self), fields(%plan_id, %user_id))]
    pub async fn current(
        &self,
        plan_id: PlanId,
        user_id: UserId,
    ) -> Result<Option<FlashSaleResultSnapshot>> {
        if let Some(item) = self.cache.get(plan_id, user_id).await? {
            metrics::counter!("flash_sale_current_result_cache_hits_total").increment(1);
            return Ok(Some(item.result));
        }

        let Some(result) = self.repository.find_ongoing(plan_id, user_id).await? else {
            return Ok(None);
        };

        let snapshot = result.snapshot();
        self.cache
            .set(
                plan_id,
                user_id,
                CacheItem {
                    tenant_id: result.tenant_id(),
                    result: snapshot.clone(),
                },
            )
            .await?;

        Ok(Some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use cache::InMemoryCurrentResultCache;
    use chrono::Utc;
    use common::{ResultId, StoreId, TenantId};
    use domain::FlashSaleResult;
    use result_store::{FlashSaleResultRepository, InMemoryResultRepository};

    use super::*;

    fn pending(plan_id: PlanId, user_id: UserId) -> FlashSaleResult {
        FlashSaleResult::new(
            ResultId::new(),
            Some(TenantId::new()),
            StoreId::new(),
            plan_id,
            user_id,
            Some(Utc::now()),
        )
    }

    #[tokio::test]
    async fn unknown_pair_resolves_to_none() {
        let query = CurrentResultQuery::new(
            InMemoryResultRepository::new(),
            InMemoryCurrentResultCache::new(),
        );

        let current = query.current(PlanId::new(), UserId::new()).await.unwrap();
        assert!(current.is_none());
    }

    #[tokio::test]
    async fn repository_miss_refills_the_cache() {
        let repository = InMemoryResultRepository::new();
        let cache = InMemoryCurrentResultCache::new();
        let query = CurrentResultQuery::new(repository.clone(), cache.clone());

        let plan_id = PlanId::new();
        let user_id = UserId::new();
        let result = pending(plan_id, user_id);
        repository.insert(&result).await.unwrap();

        let current = query.current(plan_id, user_id).await.unwrap().unwrap();
        assert_eq!(current.id, result.id());

        // Now cached: visible even without the repository row.
        let cached = cache.get(plan_id, user_id).await.unwrap().unwrap();
        assert_eq!(cached.result.id, result.id());
    }

    #[tokio::test]
    async fn cache_hit_short_circuits_the_repository() {
        let repository = InMemoryResultRepository::new();
        let cache = InMemoryCurrentResultCache::new();
        let query = CurrentResultQuery::new(repository.clone(), cache.clone());

        let plan_id = PlanId::new();
        let user_id = UserId::new();
        let result = pending(plan_id, user_id);

        // Cached but never persisted; a stale cache is acceptable by design.
        cache
            .set(
                plan_id,
                user_id,
                CacheItem {
                    tenant_id: result.tenant_id(),
                    result: result.snapshot(),
                },
            )
            .await
            .unwrap();

        let current = query.current(plan_id, user_id).await.unwrap().unwrap();
        assert_eq!(current.id, result.id());
    }
}
