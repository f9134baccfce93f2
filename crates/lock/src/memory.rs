//! In-memory lock provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::Result;
use crate::provider::{LockGuard, LockProvider};

const DEFAULT_LEASE_TTL: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy)]
struct Lease {
    token: u64,
    expires_at: Instant,
}

/// In-memory lease provider.
///
/// Leases carry a TTL: a holder that never releases (crashed worker) loses
/// the lease on expiry and the key becomes acquirable again. Guards carry a
/// token so a stale guard dropped after expiry cannot release a successor's
/// lease.
#[derive(Clone)]
pub struct InMemoryLockProvider {
    leases: Arc<Mutex<HashMap<String, Lease>>>,
    tokens: Arc<AtomicU64>,
    lease_ttl: Duration,
    retry_interval: Duration,
}

impl InMemoryLockProvider {
    /// Creates a provider with the default lease TTL.
    pub fn new() -> Self {
        Self::with_lease_ttl(DEFAULT_LEASE_TTL)
    }

    /// Creates a provider whose leases expire after `lease_ttl`.
    pub fn with_lease_ttl(lease_ttl: Duration) -> Self {
        Self {
            leases: Arc::new(Mutex::new(HashMap::new())),
            tokens: Arc::new(AtomicU64::new(0)),
            lease_ttl,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    /// Returns the number of live (unexpired) leases.
    pub fn live_leases(&self) -> usize {
        let now = Instant::now();
        self.leases
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.expires_at > now)
            .count()
    }

    fn try_take(&self, key: &str) -> Option<LockGuard> {
        let mut leases = self.leases.lock().unwrap();
        let now = Instant::now();

        if leases.get(key).is_some_and(|l| l.expires_at > now) {
            return None;
        }

        let token = self.tokens.fetch_add(1, Ordering::Relaxed);
        leases.insert(
            key.to_string(),
            Lease {
                token,
                expires_at: now + self.lease_ttl,
            },
        );

        let leases = Arc::clone(&self.leases);
        let owned_key = key.to_string();
        Some(LockGuard::new(key, move || {
            let mut leases = leases.lock().unwrap();
            // Only release our own lease; an expired-and-reacquired key
            // belongs to someone else now.
            if leases.get(&owned_key).is_some_and(|l| l.token == token) {
                leases.remove(&owned_key);
            }
        }))
    }
}

impl Default for InMemoryLockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LockProvider for InMemoryLockProvider {
    async fn try_acquire(&self, key: &str, timeout: Duration) -> Result<Option<LockGuard>> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(guard) = self.try_take(key) {
                return Ok(Some(guard));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(self.retry_interval.min(deadline - now)).await;
        }
    }
}
