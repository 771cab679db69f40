//! Inventory domain errors

use core_kernel::{MoneyError, PortError};
use thiserror::Error;

/// Errors that can occur in the inventory domain
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Product with the given ID was not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Input rejected before anything was persisted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A sale movement would take stock below zero
    #[error("Insufficient stock for product {product_id}: requested {requested}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
    },

    /// Another product already uses the SKU
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store failed
    #[error("Storage error: {0}")]
    Storage(#[source] PortError),
}

impl InventoryError {
    /// Creates a ProductNotFound error from any ID type
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        InventoryError::ProductNotFound(id.to_string())
    }

    /// Creates an InvalidInput error with a message
    pub fn invalid(message: impl Into<String>) -> Self {
        InventoryError::InvalidInput(message.into())
    }
}

impl From<PortError> for InventoryError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { id, .. } => InventoryError::ProductNotFound(id),
            PortError::Validation { message, .. } => InventoryError::InvalidInput(message),
            PortError::Conflict { message } => InventoryError::Conflict(message),
            PortError::InsufficientStock { product_id, requested } => {
                InventoryError::InsufficientStock { product_id, requested }
            }
            other => InventoryError::Storage(other),
        }
    }
}

impl From<MoneyError> for InventoryError {
    fn from(err: MoneyError) -> Self {
        InventoryError::InvalidInput(err.to_string())
    }
}
