//! Event payloads exchanged over the distributed event bus.

use chrono::{DateTime, Utc};
use common::{ExtraProperties, OrderId, ResultId, TenantId, UserId};
use serde::{Deserialize, Serialize};

use super::plan::PlanSnapshot;
use super::result::FlashSaleResultSnapshot;

/// Requests creation of a flash-sale result for one (plan, user) attempt.
///
/// Published by the order-placement step after it reserved a unit of
/// inventory. Delivery is at-least-once; the handler must tolerate
/// redelivery and concurrent duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFlashSaleResult {
    /// The tenant the attempt belongs to.
    pub tenant_id: Option<TenantId>,

    /// Identity of the attempt, assigned here and reused on every follow-up
    /// event so that downstream consumers can de-duplicate.
    pub result_id: ResultId,

    /// The user who made the attempt.
    pub user_id: UserId,

    /// Free-form remark the customer attached to the order.
    pub customer_remark: Option<String>,

    /// Denormalized plan fields, carried to avoid re-fetching the plan
    /// during the race window.
    pub plan: PlanSnapshot,

    /// Opaque token the order pipeline uses to validate the attempt.
    pub hash_token: String,

    /// When inventory was decremented for this attempt.
    pub reduced_inventory_time: Option<DateTime<Utc>>,

    /// Which inventory provider holds the reserved unit.
    pub product_inventory_provider_name: String,

    /// Pass-through extension data for downstream consumers.
    #[serde(default)]
    pub extra_properties: ExtraProperties,
}

/// Requests creation of an order for a winning flash-sale attempt.
///
/// Consumed by the order-creation pipeline, which de-duplicates on
/// `result_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFlashSaleOrder {
    /// The tenant the attempt belongs to.
    pub tenant_id: Option<TenantId>,

    /// Identity of the attempt, copied verbatim from the result-creation
    /// event.
    pub result_id: ResultId,

    /// The user who made the attempt.
    pub user_id: UserId,

    /// Free-form remark the customer attached to the order.
    pub customer_remark: Option<String>,

    /// Denormalized plan fields.
    pub plan: PlanSnapshot,

    /// Opaque token the order pipeline uses to validate the attempt.
    pub hash_token: String,

    /// Pass-through extension data copied from the result-creation event.
    #[serde(default)]
    pub extra_properties: ExtraProperties,
}

impl CreateFlashSaleOrder {
    /// Builds the order-creation request for a result-creation event,
    /// carrying the same identifiers and pass-through data.
    pub fn for_result(event: &CreateFlashSaleResult) -> Self {
        Self {
            tenant_id: event.tenant_id,
            result_id: event.result_id,
            user_id: event.user_id,
            customer_remark: event.customer_remark.clone(),
            plan: event.plan.clone(),
            hash_token: event.hash_token.clone(),
            extra_properties: event.extra_properties.clone(),
        }
    }
}

/// Announces that a result reached a terminal successful state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashSaleResultCompleted {
    /// The tenant the attempt belongs to.
    pub tenant_id: Option<TenantId>,

    /// The order that materialized for the attempt.
    pub order_id: OrderId,

    /// Snapshot of the completed result.
    pub result: FlashSaleResultSnapshot,
}

#[cfg(test)]
mod tests {
    use common::{PlanId, ProductId, ProductSkuId, StoreId};

    use super::*;

    fn create_result_event() -> CreateFlashSaleResult {
        let mut extra = ExtraProperties::new();
        extra.set("coupon", serde_json::json!("WELCOME10"));

        CreateFlashSaleResult {
            tenant_id: Some(TenantId::new()),
            result_id: ResultId::new(),
            user_id: UserId::new(),
            customer_remark: Some("leave at the door".to_string()),
            plan: PlanSnapshot {
                id: PlanId::new(),
                store_id: StoreId::new(),
                product_id: ProductId::new(),
                product_sku_id: ProductSkuId::new(),
            },
            hash_token: "token-1".to_string(),
            reduced_inventory_time: Some(Utc::now()),
            product_inventory_provider_name: "default".to_string(),
            extra_properties: extra,
        }
    }

    #[test]
    fn order_event_reuses_result_identity() {
        let event = create_result_event();
        let order = CreateFlashSaleOrder::for_result(&event);

        assert_eq!(order.result_id, event.result_id);
        assert_eq!(order.user_id, event.user_id);
        assert_eq!(order.plan, event.plan);
        assert_eq!(order.hash_token, event.hash_token);
        assert_eq!(order.extra_properties, event.extra_properties);
    }

    #[test]
    fn event_serialization_roundtrip() {
        let event = create_result_event();
        let json = serde_json::to_string(&event).unwrap();
        let back: CreateFlashSaleResult = serde_json::from_str(&json).unwrap();

        assert_eq!(back.result_id, event.result_id);
        assert_eq!(back.plan, event.plan);
        assert_eq!(back.extra_properties, event.extra_properties);
    }
}
