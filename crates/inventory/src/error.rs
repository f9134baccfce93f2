use thiserror::Error;

/// Errors that can occur while talking to an inventory backend.
///
/// Insufficient stock and inapplicable rollbacks are not errors; providers
/// report those as `Ok(false)`.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The inventory backend failed.
    #[error("Inventory backend error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
