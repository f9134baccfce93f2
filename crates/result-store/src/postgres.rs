//! PostgreSQL result repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, PlanId, ResultId, StoreId, TenantId, UserId};
use domain::{FlashSaleResult, FlashSaleResultStatus};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::{Result, ResultStoreError};
use crate::repository::{FlashSaleResultRepository, ResultListFilter};

const ONGOING_INDEX: &str = "uq_flash_sale_results_ongoing";

/// PostgreSQL-backed result repository.
///
/// The `flash_sale_results` table carries a partial unique index over
/// `(plan_id, user_id) WHERE status <> 'failed'`: a storage-level backstop
/// for the one-ongoing-result invariant the orchestrator enforces under its
/// lock.
#[derive(Clone)]
pub struct PostgresResultRepository {
    pool: PgPool,
}

impl PostgresResultRepository {
    /// Creates a new PostgreSQL result repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_result(row: PgRow) -> Result<FlashSaleResult> {
        let status_text: String = row.try_get("status")?;
        let status = FlashSaleResultStatus::parse(&status_text)
            .ok_or_else(|| ResultStoreError::InvalidStatus(status_text))?;

        Ok(FlashSaleResult::restore(
            ResultId::from_uuid(row.try_get::<Uuid, _>("id")?),
            row.try_get::<Option<Uuid>, _>("tenant_id")?
                .map(TenantId::from_uuid),
            StoreId::from_uuid(row.try_get::<Uuid, _>("store_id")?),
            PlanId::from_uuid(row.try_get::<Uuid, _>("plan_id")?),
            UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            status,
            row.try_get::<Option<Uuid>, _>("order_id")?
                .map(OrderId::from_uuid),
            row.try_get::<Option<String>, _>("reason")?,
            row.try_get::<Option<DateTime<Utc>>, _>("reduced_inventory_time")?,
        ))
    }
}

#[async_trait]
impl FlashSaleResultRepository for PostgresResultRepository {
    async fn insert(&self, result: &FlashSaleResult) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO flash_sale_results
                (id, tenant_id, store_id, plan_id, user_id, status, order_id, reason, reduced_inventory_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(result.id().as_uuid())
        .bind(result.tenant_id().map(|t| t.as_uuid()))
        .bind(result.store_id().as_uuid())
        .bind(result.plan_id().as_uuid())
        .bind(result.user_id().as_uuid())
        .bind(result.status().as_str())
        .bind(result.order_id().map(|o| o.as_uuid()))
        .bind(result.reason())
        .bind(result.reduced_inventory_time())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("flash_sale_results_pkey") {
                    return ResultStoreError::DuplicateResult(result.id());
                }
                if db_err.constraint() == Some(ONGOING_INDEX) {
                    return ResultStoreError::OngoingResultExists {
                        plan_id: result.plan_id(),
                        user_id: result.user_id(),
                    };
                }
            }
            ResultStoreError::Database(e)
        })?;

        Ok(())
    }

    async fn update(&self, result: &FlashSaleResult) -> Result<()> {
        let updated = sqlx::query(
            r#"
            UPDATE flash_sale_results
            SET status = $2, order_id = $3, reason = $4, reduced_inventory_time = $5
            WHERE id = $1
            "#,
        )
        .bind(result.id().as_uuid())
        .bind(result.status().as_str())
        .bind(result.order_id().map(|o| o.as_uuid()))
        .bind(result.reason())
        .bind(result.reduced_inventory_time())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(ResultStoreError::ResultNotFound(result.id()));
        }
        Ok(())
    }

    async fn find(&self, id: ResultId) -> Result<Option<FlashSaleResult>> {
        let row = sqlx::query(
            r#"
            SELECT id, tenant_id, store_id, plan_id, user_id, status, order_id, reason, reduced_inventory_time
            FROM flash_sale_results
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_result).transpose()
    }

    async fn find_ongoing(
        &self,
        plan_id: PlanId,
        user_id: UserId,
    ) -> Result<Option<FlashSaleResult>> {
        let row = sqlx::query(
            r#"
            SELECT id, tenant_id, store_id, plan_id, user_id, status, order_id, reason, reduced_inventory_time
            FROM flash_sale_results
            WHERE plan_id = $1 AND user_id = $2 AND status <> 'failed'
            "#,
        )
        .bind(plan_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_result).transpose()
    }

    async fn list(&self, filter: &ResultListFilter) -> Result<Vec<FlashSaleResult>> {
        let rows = sqlx::query(
            r#"
            SELECT id, tenant_id, store_id, plan_id, user_id, status, order_id, reason, reduced_inventory_time
            FROM flash_sale_results
            WHERE ($1::uuid IS NULL OR store_id = $1)
              AND ($2::uuid IS NULL OR plan_id = $2)
              AND ($3::uuid IS NULL OR user_id = $3)
              AND ($4::text IS NULL OR status = $4)
              AND ($5::uuid IS NULL OR order_id = $5)
            ORDER BY id
            "#,
        )
        .bind(filter.store_id.map(|s| s.as_uuid()))
        .bind(filter.plan_id.map(|p| p.as_uuid()))
        .bind(filter.user_id.map(|u| u.as_uuid()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.order_id.map(|o| o.as_uuid()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_result).collect()
    }
}
