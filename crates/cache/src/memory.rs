//! In-memory current-result cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::{PlanId, UserId};
use tokio::sync::RwLock;

use crate::{CacheError, CacheItem, CurrentResultCache};

const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct Entry {
    item: CacheItem,
    expires_at: Instant,
}

/// In-memory cache with per-entry TTL.
///
/// Expired entries are dropped lazily on read; there is no background
/// sweeper, which keeps the implementation dependency-free and is enough for
/// a cache that is allowed to be stale or lost.
#[derive(Clone)]
pub struct InMemoryCurrentResultCache {
    entries: Arc<RwLock<HashMap<(PlanId, UserId), Entry>>>,
    ttl: Duration,
}

impl InMemoryCurrentResultCache {
    /// Creates a cache with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Creates a cache whose entries expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the number of entries, counting expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true when the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryCurrentResultCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CurrentResultCache for InMemoryCurrentResultCache {
    async fn set(
        &self,
        plan_id: PlanId,
        user_id: UserId,
        item: CacheItem,
    ) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.insert(
            (plan_id, user_id),
            Entry {
                item,
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, plan_id: PlanId, user_id: UserId) -> Result<Option<CacheItem>, CacheError> {
        {
            let entries = self.entries.read().await;
            match entries.get(&(plan_id, user_id)) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.item.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Entry expired: drop it under the write lock.
        let mut entries = self.entries.write().await;
        if entries
            .get(&(plan_id, user_id))
            .is_some_and(|e| e.expires_at <= Instant::now())
        {
            entries.remove(&(plan_id, user_id));
        }
        Ok(None)
    }

    async fn remove(&self, plan_id: PlanId, user_id: UserId) -> Result<(), CacheError> {
        self.entries.write().await.remove(&(plan_id, user_id));
        Ok(())
    }
}
