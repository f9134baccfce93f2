//! Inventory reservation and rollback.
//!
//! The inventory counter is the authoritative source of remaining-quantity
//! truth for a flash sale. Decrements are conditional and atomic at the
//! storage layer (the classic oversell-prevention primitive), and rollbacks
//! restore previously reserved units without ever exceeding the announced
//! pool.

pub mod error;
pub mod manager;
pub mod memory;
pub mod postgres;
pub mod provider;

pub use error::InventoryError;
pub use manager::FlashSaleInventoryManager;
pub use memory::InMemoryInventoryProvider;
pub use postgres::PostgresInventoryProvider;
pub use provider::ProductInventoryProvider;
