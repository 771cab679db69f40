//! Billing domain errors

use core_kernel::{MoneyError, PortError};
use domain_inventory::InventoryError;
use domain_party::PartyError;
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// A referenced product, customer, supplier or sale does not exist
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// Request rejected before persistence
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A conditional stock decrement failed
    #[error("Insufficient stock for product {product_id}: requested {requested}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
    },

    /// Unique constraint violated (for example a reused invoice number)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store failed
    #[error("Storage error: {0}")]
    Storage(#[source] PortError),
}

impl BillingError {
    pub fn not_found(entity_type: impl Into<String>, id: impl std::fmt::Display) -> Self {
        BillingError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        BillingError::InvalidInput(message.into())
    }
}

impl From<PortError> for BillingError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => BillingError::NotFound { entity_type, id },
            PortError::Validation { message, .. } => BillingError::InvalidInput(message),
            PortError::Conflict { message } => BillingError::Conflict(message),
            PortError::InsufficientStock { product_id, requested } => {
                BillingError::InsufficientStock { product_id, requested }
            }
            other => BillingError::Storage(other),
        }
    }
}

impl From<MoneyError> for BillingError {
    fn from(err: MoneyError) -> Self {
        BillingError::InvalidInput(err.to_string())
    }
}

impl From<InventoryError> for BillingError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotFound(id) => BillingError::not_found("Product", id),
            InventoryError::InvalidInput(message) => BillingError::InvalidInput(message),
            InventoryError::InsufficientStock { product_id, requested } => {
                BillingError::InsufficientStock { product_id, requested }
            }
            InventoryError::Conflict(message) => BillingError::Conflict(message),
            InventoryError::Storage(source) => BillingError::Storage(source),
        }
    }
}

impl From<PartyError> for BillingError {
    fn from(err: PartyError) -> Self {
        match err {
            PartyError::NotFound { entity_type, id } => BillingError::NotFound { entity_type, id },
            PartyError::InvalidData(message) | PartyError::ValidationFailed(message) => {
                BillingError::InvalidInput(message)
            }
            PartyError::Conflict(message) => BillingError::Conflict(message),
            PartyError::Storage(source) => BillingError::Storage(source),
        }
    }
}
