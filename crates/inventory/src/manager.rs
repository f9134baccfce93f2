//! Provider registry dispatching on the provider name events carry.

use std::collections::HashMap;
use std::sync::Arc;

use common::{ProductId, ProductSkuId, StoreId, TenantId};

use crate::error::Result;
use crate::provider::ProductInventoryProvider;

/// Dispatches inventory operations to the named provider an event refers to.
///
/// Flash-sale events carry a `product_inventory_provider_name`; plans for
/// regular products and plans for externally-stocked products can use
/// different backends without the orchestrator knowing which is which.
pub struct FlashSaleInventoryManager {
    providers: HashMap<String, Arc<dyn ProductInventoryProvider>>,
}

impl FlashSaleInventoryManager {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Registers a provider under `name`, replacing any previous one.
    pub fn register(
        mut self,
        name: impl Into<String>,
        provider: Arc<dyn ProductInventoryProvider>,
    ) -> Self {
        self.providers.insert(name.into(), provider);
        self
    }

    /// Atomically reserves `quantity` units for a flash-sale attempt.
    ///
    /// Returns `Ok(false)` on insufficient stock or when `provider_name` is
    /// not registered.
    #[allow(clippy::too_many_arguments)]
    pub async fn try_reserve(
        &self,
        tenant_id: Option<TenantId>,
        provider_name: &str,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
        quantity: u32,
    ) -> Result<bool> {
        let Some(provider) = self.providers.get(provider_name) else {
            tracing::warn!(provider_name, "unknown inventory provider");
            return Ok(false);
        };

        provider
            .try_reduce(tenant_id, store_id, product_id, product_sku_id, quantity)
            .await
    }

    /// Atomically restores one previously reserved unit.
    ///
    /// Returns `Ok(false)` when the rollback cannot be applied (already
    /// rolled back, inventory record missing, or `provider_name` unknown);
    /// callers treat that as a soft failure.
    pub async fn try_roll_back(
        &self,
        tenant_id: Option<TenantId>,
        provider_name: &str,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
    ) -> Result<bool> {
        let Some(provider) = self.providers.get(provider_name) else {
            tracing::warn!(provider_name, "unknown inventory provider");
            return Ok(false);
        };

        provider
            .try_increase(tenant_id, store_id, product_id, product_sku_id, 1)
            .await
    }
}

impl Default for FlashSaleInventoryManager {
    fn default() -> Self {
        Self::new()
    }
}
