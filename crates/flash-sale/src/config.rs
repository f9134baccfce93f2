//! Orchestrator configuration loaded from environment variables.

use std::time::Duration;

/// Flash-sale configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `FLASH_SALE_LOCK_TIMEOUT_MS` — bounded wait for the per-(plan, user)
///   lock (default: `3000`)
/// - `FLASH_SALE_CACHE_TTL_SECS` — current-result cache entry lifetime
///   (default: `60`)
/// - `FLASH_SALE_ROLLBACK_MAX_ATTEMPTS` — retries before an inventory
///   rollback is abandoned (default: `3`)
#[derive(Debug, Clone)]
pub struct FlashSaleConfig {
    pub lock_timeout: Duration,
    pub cache_ttl: Duration,
    pub rollback_max_attempts: u32,
}

impl FlashSaleConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            lock_timeout: std::env::var("FLASH_SALE_LOCK_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.lock_timeout),
            cache_ttl: std::env::var("FLASH_SALE_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            rollback_max_attempts: std::env::var("FLASH_SALE_ROLLBACK_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rollback_max_attempts),
        }
    }
}

impl Default for FlashSaleConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_millis(3000),
            cache_ttl: Duration::from_secs(60),
            rollback_max_attempts: 3,
        }
    }
}
