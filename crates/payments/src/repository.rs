//! Local refund storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::RefundId;
use domain::Refund;
use tokio::sync::RwLock;

use crate::error::Result;

/// Store of the local refund copies, keyed by external refund id.
#[async_trait]
pub trait RefundRepository: Send + Sync {
    /// Finds a refund by its external id.
    async fn find(&self, id: RefundId) -> Result<Option<Refund>>;

    /// Inserts or replaces a refund.
    async fn upsert(&self, refund: Refund) -> Result<()>;

    /// Removes a refund if present.
    async fn remove(&self, id: RefundId) -> Result<()>;
}

/// In-memory refund repository.
#[derive(Clone, Default)]
pub struct InMemoryRefundRepository {
    refunds: Arc<RwLock<HashMap<RefundId, Refund>>>,
}

impl InMemoryRefundRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored refunds.
    pub async fn count(&self) -> usize {
        self.refunds.read().await.len()
    }
}

#[async_trait]
impl RefundRepository for InMemoryRefundRepository {
    async fn find(&self, id: RefundId) -> Result<Option<Refund>> {
        Ok(self.refunds.read().await.get(&id).cloned())
    }

    async fn upsert(&self, refund: Refund) -> Result<()> {
        self.refunds.write().await.insert(refund.id, refund);
        Ok(())
    }

    async fn remove(&self, id: RefundId) -> Result<()> {
        self.refunds.write().await.remove(&id);
        Ok(())
    }
}
