//! PostgreSQL advisory-lock provider.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use sqlx::{Connection, PgPool};

use crate::error::Result;
use crate::provider::{LockGuard, LockProvider};

const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Lease provider backed by PostgreSQL session-level advisory locks.
///
/// Each guard owns a dedicated connection for the lifetime of the lease; the
/// server releases every advisory lock a session holds when that session
/// ends, which doubles as crash fencing: a worker that dies takes its
/// connections (and locks) with it.
#[derive(Clone)]
pub struct PostgresLockProvider {
    pool: PgPool,
    retry_interval: Duration,
}

impl PostgresLockProvider {
    /// Creates a provider over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

#[async_trait]
impl LockProvider for PostgresLockProvider {
    async fn try_acquire(&self, key: &str, timeout: Duration) -> Result<Option<LockGuard>> {
        let lock_id = advisory_lock_id(key);
        let deadline = Instant::now() + timeout;

        loop {
            let mut pooled = self.pool.acquire().await?;

            let locked: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
                .bind(lock_id)
                .fetch_one(&mut *pooled)
                .await?;

            if locked {
                // Detach the connection from the pool: returning it while it
                // holds a session lock would leak the lock to the next
                // borrower. Closing the session on release drops the lock.
                let conn = pooled.detach();
                return Ok(Some(LockGuard::new(key, move || {
                    tokio::spawn(async move {
                        if let Err(error) = conn.close().await {
                            tracing::warn!(%error, "failed to close lock connection cleanly");
                        }
                    });
                })));
            }

            drop(pooled);

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(self.retry_interval.min(deadline - now)).await;
        }
    }
}

/// Maps a lock key to the 64-bit id space advisory locks use.
///
/// FNV-1a: stable across processes and platforms, which std's default hasher
/// does not guarantee.
fn advisory_lock_id(key: &str) -> i64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    for byte in key.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_lock_id_is_stable() {
        let key = "eshop-flash-sales-creating-result_a-b";
        assert_eq!(advisory_lock_id(key), advisory_lock_id(key));
    }

    #[test]
    fn advisory_lock_id_differs_per_key() {
        assert_ne!(advisory_lock_id("key-a"), advisory_lock_id("key-b"));
    }

    #[test]
    fn advisory_lock_id_matches_known_fnv_vector() {
        // FNV-1a of an empty input is the offset basis.
        assert_eq!(advisory_lock_id(""), 0xcbf2_9ce4_8422_2325_u64 as i64);
    }
}
