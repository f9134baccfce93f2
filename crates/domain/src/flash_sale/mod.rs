//! Flash-sale plan and result entities plus the events that drive them.

mod events;
mod plan;
mod result;

pub use events::{CreateFlashSaleOrder, CreateFlashSaleResult, FlashSaleResultCompleted};
pub use plan::{FlashSalePlan, PlanSnapshot};
pub use result::{FlashSaleResult, FlashSaleResultSnapshot, FlashSaleResultStatus};
