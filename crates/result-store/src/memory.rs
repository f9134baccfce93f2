//! In-memory result repository implementation for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{PlanId, ResultId, UserId};
use domain::{FlashSaleResult, FlashSaleResultStatus};
use tokio::sync::RwLock;

use crate::error::{Result, ResultStoreError};
use crate::repository::{FlashSaleResultRepository, ResultListFilter};

/// In-memory result repository.
///
/// Mirrors the Postgres implementation's constraints, including the backstop
/// uniqueness of ongoing results per (plan, user).
#[derive(Clone, Default)]
pub struct InMemoryResultRepository {
    results: Arc<RwLock<HashMap<ResultId, FlashSaleResult>>>,
}

impl InMemoryResultRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored results.
    pub async fn count(&self) -> usize {
        self.results.read().await.len()
    }
}

#[async_trait]
impl FlashSaleResultRepository for InMemoryResultRepository {
    async fn insert(&self, result: &FlashSaleResult) -> Result<()> {
        let mut results = self.results.write().await;

        if results.contains_key(&result.id()) {
            return Err(ResultStoreError::DuplicateResult(result.id()));
        }

        let ongoing_exists = results.values().any(|r| {
            r.plan_id() == result.plan_id()
                && r.user_id() == result.user_id()
                && r.status() != FlashSaleResultStatus::Failed
        });
        if result.status() != FlashSaleResultStatus::Failed && ongoing_exists {
            return Err(ResultStoreError::OngoingResultExists {
                plan_id: result.plan_id(),
                user_id: result.user_id(),
            });
        }

        results.insert(result.id(), result.clone());
        Ok(())
    }

    async fn update(&self, result: &FlashSaleResult) -> Result<()> {
        let mut results = self.results.write().await;

        if !results.contains_key(&result.id()) {
            return Err(ResultStoreError::ResultNotFound(result.id()));
        }

        results.insert(result.id(), result.clone());
        Ok(())
    }

    async fn find(&self, id: ResultId) -> Result<Option<FlashSaleResult>> {
        Ok(self.results.read().await.get(&id).cloned())
    }

    async fn find_ongoing(
        &self,
        plan_id: PlanId,
        user_id: UserId,
    ) -> Result<Option<FlashSaleResult>> {
        let results = self.results.read().await;
        Ok(results
            .values()
            .find(|r| {
                r.plan_id() == plan_id
                    && r.user_id() == user_id
                    && r.status() != FlashSaleResultStatus::Failed
            })
            .cloned())
    }

    async fn list(&self, filter: &ResultListFilter) -> Result<Vec<FlashSaleResult>> {
        let results = self.results.read().await;
        let mut matching: Vec<_> = results.values().filter(|r| filter.matches(r)).cloned().collect();
        matching.sort_by_key(|r| r.id());
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::{OrderId, StoreId, TenantId};

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
    async fn insert_and_find() {
        let repo = InMemoryResultRepository::new();
        let result = pending(PlanId::new(), UserId::new());

        repo.insert(&result).await.unwrap();

        let found = repo.find(result.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), result.id());
        assert_eq!(found.status(), FlashSaleResultStatus::Pending);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let repo = InMemoryResultRepository::new();
        let result = pending(PlanId::new(), UserId::new());

        repo.insert(&result).await.unwrap();
        let err = repo.insert(&result).await.unwrap_err();

        assert!(matches!(err, ResultStoreError::DuplicateResult(id) if id == result.id()));
    }

    #[tokio::test]
    async fn second_ongoing_result_for_pair_is_rejected() {
        let repo = InMemoryResultRepository::new();
        let plan_id = PlanId::new();
        let user_id = UserId::new();

        repo.insert(&pending(plan_id, user_id)).await.unwrap();
        let err = repo.insert(&pending(plan_id, user_id)).await.unwrap_err();

        assert!(matches!(err, ResultStoreError::OngoingResultExists { .. }));
    }

    #[tokio::test]
    async fn failed_result_does_not_block_a_new_attempt() {
        let repo = InMemoryResultRepository::new();
        let plan_id = PlanId::new();
        let user_id = UserId::new();

        let mut failed = pending(plan_id, user_id);
        failed.fail("payment expired").unwrap();
        repo.insert(&failed).await.unwrap();

        repo.insert(&pending(plan_id, user_id)).await.unwrap();
        assert_eq!(repo.count().await, 2);
    }

    #[tokio::test]
    async fn find_ongoing_skips_failed_results() {
        let repo = InMemoryResultRepository::new();
        let plan_id = PlanId::new();
        let user_id = UserId::new();

        let mut failed = pending(plan_id, user_id);
        failed.fail("payment expired").unwrap();
        repo.insert(&failed).await.unwrap();

        assert!(repo.find_ongoing(plan_id, user_id).await.unwrap().is_none());

        let winner = pending(plan_id, user_id);
        repo.insert(&winner).await.unwrap();

        let ongoing = repo.find_ongoing(plan_id, user_id).await.unwrap().unwrap();
        assert_eq!(ongoing.id(), winner.id());
    }

    #[tokio::test]
    async fn update_replaces_stored_state() {
        let repo = InMemoryResultRepository::new();
        let mut result = pending(PlanId::new(), UserId::new());
        repo.insert(&result).await.unwrap();

        let order_id = OrderId::new();
        result.succeed(order_id).unwrap();
        repo.update(&result).await.unwrap();

        let found = repo.find(result.id()).await.unwrap().unwrap();
        assert_eq!(found.status(), FlashSaleResultStatus::Succeeded);
        assert_eq!(found.order_id(), Some(order_id));
    }

    #[tokio::test]
    async fn update_of_unknown_result_is_rejected() {
        let repo = InMemoryResultRepository::new();
        let result = pending(PlanId::new(), UserId::new());

        let err = repo.update(&result).await.unwrap_err();
        assert!(matches!(err, ResultStoreError::ResultNotFound(id) if id == result.id()));
    }

    #[tokio::test]
    async fn list_applies_every_set_filter() {
        let repo = InMemoryResultRepository::new();
        let plan_id = PlanId::new();
        let user_id = UserId::new();
        let other_user = UserId::new();

        repo.insert(&pending(plan_id, user_id)).await.unwrap();
        repo.insert(&pending(plan_id, other_user)).await.unwrap();
        repo.insert(&pending(PlanId::new(), user_id)).await.unwrap();

        let by_plan = repo
            .list(&ResultListFilter::new().plan_id(plan_id))
            .await
            .unwrap();
        assert_eq!(by_plan.len(), 2);

        let by_plan_and_user = repo
            .list(&ResultListFilter::new().plan_id(plan_id).user_id(user_id))
            .await
            .unwrap();
        assert_eq!(by_plan_and_user.len(), 1);

        let by_status = repo
            .list(&ResultListFilter::new().status(FlashSaleResultStatus::Failed))
            .await
            .unwrap();
        assert!(by_status.is_empty());
    }
}
