//! Distributed event bus contract.
//!
//! The platform publishes events to an external at-least-once bus; consumers
//! must tolerate redelivery. Only the publishing side is modeled here; the
//! delivery mechanism (and its redelivery/backoff policy) is the bus's.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

use crate::flash_sale::{CreateFlashSaleOrder, CreateFlashSaleResult, FlashSaleResultCompleted};
use crate::refund::RefundCompleted;

/// Events published by the platform.
#[derive(Debug, Clone)]
pub enum DistributedEvent {
    /// A reserved attempt requests result creation.
    CreateFlashSaleResult(CreateFlashSaleResult),

    /// A winning attempt requests order creation.
    CreateFlashSaleOrder(CreateFlashSaleOrder),

    /// A result reached its terminal successful state.
    FlashSaleResultCompleted(FlashSaleResultCompleted),

    /// A refund reached its completed state.
    RefundCompleted(RefundCompleted),
}

impl DistributedEvent {
    /// Returns the event type name used for routing and logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            DistributedEvent::CreateFlashSaleResult(_) => "CreateFlashSaleResult",
            DistributedEvent::CreateFlashSaleOrder(_) => "CreateFlashSaleOrder",
            DistributedEvent::FlashSaleResultCompleted(_) => "FlashSaleResultCompleted",
            DistributedEvent::RefundCompleted(_) => "RefundCompleted",
        }
    }
}

/// Errors raised when publishing to the bus.
#[derive(Debug, Error)]
pub enum EventBusError {
    /// The bus rejected or failed to accept the event.
    #[error("Event publishing failed: {0}")]
    PublishingFailed(String),
}

/// Publishing side of the distributed event bus.
#[async_trait]
pub trait DistributedEventBus: Send + Sync {
    /// Publishes an event to the bus.
    async fn publish(&self, event: DistributedEvent) -> Result<(), EventBusError>;
}

#[derive(Debug, Default)]
struct InMemoryEventBusState {
    published: Vec<DistributedEvent>,
    fail_next: bool,
}

/// In-memory event bus that records published events, for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventBus {
    state: Arc<Mutex<InMemoryEventBusState>>,
}

impl InMemoryEventBus {
    /// Creates a new in-memory event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the bus to fail the next publish call.
    pub fn set_fail_next(&self, fail: bool) {
        self.state.lock().unwrap().fail_next = fail;
    }

    /// Returns all events published so far.
    pub fn published(&self) -> Vec<DistributedEvent> {
        self.state.lock().unwrap().published.clone()
    }

    /// Returns the number of published events of the given type.
    pub fn published_count(&self, event_type: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .published
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }
}

#[async_trait]
impl DistributedEventBus for InMemoryEventBus {
    async fn publish(&self, event: DistributedEvent) -> Result<(), EventBusError> {
        let mut state = self.state.lock().unwrap();

        if state.fail_next {
            state.fail_next = false;
            return Err(EventBusError::PublishingFailed(
                "simulated bus failure".to_string(),
            ));
        }

        state.published.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use common::{PlanId, ProductId, ProductSkuId, ResultId, StoreId, TenantId, UserId};

    use crate::flash_sale::PlanSnapshot;

    use super::*;

    fn order_event() -> DistributedEvent {
        DistributedEvent::CreateFlashSaleOrder(CreateFlashSaleOrder {
            tenant_id: Some(TenantId::new()),
            result_id: ResultId::new(),
            user_id: UserId::new(),
            customer_remark: None,
            plan: PlanSnapshot {
                id: PlanId::new(),
                store_id: StoreId::new(),
                product_id: ProductId::new(),
                product_sku_id: ProductSkuId::new(),
            },
            hash_token: "token".to_string(),
            extra_properties: Default::default(),
        })
    }

    #[tokio::test]
    async fn publish_records_events() {
        let bus = InMemoryEventBus::new();

        bus.publish(order_event()).await.unwrap();
        bus.publish(order_event()).await.unwrap();

        assert_eq!(bus.published().len(), 2);
        assert_eq!(bus.published_count("CreateFlashSaleOrder"), 2);
        assert_eq!(bus.published_count("CreateFlashSaleResult"), 0);
    }

    #[tokio::test]
    async fn fail_next_fails_once() {
        let bus = InMemoryEventBus::new();
        bus.set_fail_next(true);

        assert!(bus.publish(order_event()).await.is_err());
        assert!(bus.publish(order_event()).await.is_ok());
        assert_eq!(bus.published().len(), 1);
    }
}
