//! Inventory provider contract.

use async_trait::async_trait;
use common::{ProductId, ProductSkuId, StoreId, TenantId};

use crate::error::Result;

/// A named backend holding per-SKU inventory counters.
///
/// Implementations must be safe under concurrent callers for the same SKU:
/// both operations are conditional writes that either fully apply or report
/// `false`, never a partial or oversold state.
#[async_trait]
pub trait ProductInventoryProvider: Send + Sync {
    /// Atomically decrements available quantity if sufficient stock remains.
    ///
    /// Returns `Ok(false)` on insufficient stock, a business outcome rather than
    /// an error.
    async fn try_reduce(
        &self,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
        quantity: u32,
    ) -> Result<bool>;

    /// Atomically restores previously reserved units.
    ///
    /// Returns `Ok(false)` when the restore cannot be applied: the counter
    /// is already at its announced pool size, or the SKU is unknown. Callers
    /// treat that as a soft failure.
    async fn try_increase(
        &self,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
        quantity: u32,
    ) -> Result<bool>;
}
