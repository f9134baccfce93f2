//! Best-effort cache of the latest known flash-sale attempt outcome.
//!
//! Keyed by (plan, user) so clients can poll "has my attempt resolved"
//! without contending on the durable store or the distributed lock. Entries
//! are last-write-wins, expire independently of the durable record, and are
//! safe to lose; the cache is never the source of truth.

pub mod error;
pub mod memory;

use async_trait::async_trait;
use common::{PlanId, TenantId, UserId};
use domain::FlashSaleResultSnapshot;

pub use error::CacheError;
pub use memory::InMemoryCurrentResultCache;

/// Cached view of the latest known outcome for a (plan, user) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheItem {
    /// The tenant the attempt belongs to.
    pub tenant_id: Option<TenantId>,

    /// Snapshot of the latest known result.
    pub result: FlashSaleResultSnapshot,
}

/// Process-wide or externally-shared current-result cache.
#[async_trait]
pub trait CurrentResultCache: Send + Sync {
    /// Stores the latest known outcome for a (plan, user) pair.
    async fn set(&self, plan_id: PlanId, user_id: UserId, item: CacheItem)
    -> Result<(), CacheError>;

    /// Returns the cached outcome for a (plan, user) pair, if present and
    /// not expired.
    async fn get(&self, plan_id: PlanId, user_id: UserId) -> Result<Option<CacheItem>, CacheError>;

    /// Drops the cached outcome for a (plan, user) pair.
    async fn remove(&self, plan_id: PlanId, user_id: UserId) -> Result<(), CacheError>;
}
