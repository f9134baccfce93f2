//! PostgreSQL inventory provider.

use async_trait::async_trait;
use common::{ProductId, ProductSkuId, StoreId, TenantId};
use sqlx::PgPool;

use crate::error::Result;
use crate::provider::ProductInventoryProvider;

/// Inventory provider backed by the `product_inventories` table.
///
/// Both operations are single conditional UPDATE statements; the row lock the
/// database takes for the update is what serializes concurrent callers, so
/// there is no read-then-write window to race through. `rows_affected == 0`
/// means the condition did not hold (insufficient stock, already at capacity,
/// or no such SKU).
#[derive(Clone)]
pub struct PostgresInventoryProvider {
    pool: PgPool,
}

impl PostgresInventoryProvider {
    /// Creates a provider over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Seeds the pool for a SKU, replacing any previous record.
    pub async fn set_stock(
        &self,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
        quantity: u32,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO product_inventories (tenant_id, store_id, product_id, product_sku_id, quantity, capacity)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (store_id, product_id, product_sku_id) DO UPDATE
            SET quantity = EXCLUDED.quantity, capacity = EXCLUDED.capacity
            "#,
        )
        .bind(tenant_id.map(|t| t.as_uuid()))
        .bind(store_id.as_uuid())
        .bind(product_id.as_uuid())
        .bind(product_sku_id.as_uuid())
        .bind(i64::from(quantity))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ProductInventoryProvider for PostgresInventoryProvider {
    async fn try_reduce(
        &self,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
        quantity: u32,
    ) -> Result<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE product_inventories
            SET quantity = quantity - $1
            WHERE tenant_id IS NOT DISTINCT FROM $2
              AND store_id = $3
              AND product_id = $4
              AND product_sku_id = $5
              AND quantity >= $1
            "#,
        )
        .bind(i64::from(quantity))
        .bind(tenant_id.map(|t| t.as_uuid()))
        .bind(store_id.as_uuid())
        .bind(product_id.as_uuid())
        .bind(product_sku_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(updated.rows_affected() == 1)
    }

    async fn try_increase(
        &self,
        tenant_id: Option<TenantId>,
        store_id: StoreId,
        product_id: ProductId,
        product_sku_id: ProductSkuId,
        quantity: u32,
    ) -> Result<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE product_inventories
            SET quantity = quantity + $1
            WHERE tenant_id IS NOT DISTINCT FROM $2
              AND store_id = $3
              AND product_id = $4
              AND product_sku_id = $5
              AND quantity + $1 <= capacity
            "#,
        )
        .bind(i64::from(quantity))
        .bind(tenant_id.map(|t| t.as_uuid()))
        .bind(store_id.as_uuid())
        .bind(product_id.as_uuid())
        .bind(product_sku_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(updated.rows_affected() == 1)
    }
}
