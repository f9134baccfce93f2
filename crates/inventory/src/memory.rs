//! In-memory inventory provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{ProductId, ProductSkuId, StoreId, TenantId};

use crate::error::Result;
use crate::provider::ProductInventoryProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SkuKey {
    tenant_id: Option<TenantId>,
    store_id: StoreId,
    product_id: ProductId,
    product_sku_id: ProductSkuId,
}

#[derive(Debug, Clone, Copy)]
struct StockRecord {
    available: u32,
    capacity: u32,
}

/// In-memory inventory provider.
///
/// The check-and-decrement happens under a single mutex guard, so concurrent
/// reservations for the same SKU can never oversell. Rollbacks are capped at
/// the seeded pool size: restoring a unit that was never reserved reports
/// `false` instead of inflating the pool.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryProvider {
    state: Arc<Mutex<HashMap<SkuKey, StockRecord>>>,
}

impl InMemoryInventoryProvider {
    /// Creates a provider with no stock records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the pool for a SKU, replacing any previous record.
    pub fn set_stock(
        &self,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
        quantity: u32,
    ) {
        let key = SkuKey {
            tenant_id,
            store_id,
            product_id,
            product_sku_id,
        };
        self.state.lock().unwrap().insert(
            key,
            StockRecord {
                available: quantity,
                capacity: quantity,
            },
        );
    }

    /// Returns the available quantity for a SKU, if a record exists.
    pub fn available(
        &self,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
    ) -> Option<u32> {
        let key = SkuKey {
            tenant_id,
            store_id,
            product_id,
            product_sku_id,
        };
        self.state.lock().unwrap().get(&key).map(|r| r.available)
    }
}

#[async_trait]
impl ProductInventoryProvider for InMemoryInventoryProvider {
    async fn try_reduce(
        &self,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
        quantity: u32,
    ) -> Result<bool> {
        let key = SkuKey {
            tenant_id,
            store_id,
            product_id,
            product_sku_id,
        };
        let mut state = self.state.lock().unwrap();

        let Some(record) = state.get_mut(&key) else {
            return Ok(false);
        };
        if record.available < quantity {
            return Ok(false);
        }
        record.available -= quantity;
        Ok(true)
    }

    async fn try_increase(
        &self,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
        quantity: u32,
    ) -> Result<bool> {
        let key = SkuKey {
            tenant_id,
            store_id,
            product_id,
            product_sku_id,
        };
        let mut state = self.state.lock().unwrap();

        let Some(record) = state.get_mut(&key) else {
            return Ok(false);
        };
        if record.available + quantity > record.capacity {
            return Ok(false);
        }
        record.available += quantity;
        Ok(true)
    }
}
