//! Lock provider trait and the RAII guard it hands out.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Provider of named, non-reentrant mutual-exclusion leases.
#[async_trait]
pub trait LockProvider: Send + Sync {
    /// Attempts to acquire the lease for `key`, waiting up to `timeout`.
    ///
    /// Returns `Ok(None)` when the lease could not be acquired within the
    /// bounded wait; contention is an expected outcome, not an error. The
    /// returned guard holds the lease until dropped.
    async fn try_acquire(&self, key: &str, timeout: Duration) -> Result<Option<LockGuard>>;
}

/// Scoped ownership of a named lease.
///
/// Releases the lease when dropped, on every exit path of the holding scope.
pub struct LockGuard {
    key: String,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl LockGuard {
    /// Creates a guard that runs `release` when dropped.
    pub fn new(key: impl Into<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            key: key.into(),
            release: Some(Box::new(release)),
        }
    }

    /// Returns the key this guard holds.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").field("key", &self.key).finish()
    }
}
