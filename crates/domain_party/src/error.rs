//! Party domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur in the party domain
#[derive(Debug, Error)]
pub enum PartyError {
    /// Customer or supplier with the given ID was not found
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// Invalid party data provided
    #[error("Invalid party data: {0}")]
    InvalidData(String),

    /// Party validation failed
    #[error("Party validation failed: {0}")]
    ValidationFailed(String),

    /// Unique constraint or similar conflict in the store
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store failed
    #[error("Storage error: {0}")]
    Storage(#[source] PortError),
}

impl PartyError {
    pub fn customer_not_found(id: impl std::fmt::Display) -> Self {
        PartyError::NotFound {
            entity_type: "Customer".to_string(),
            id: id.to_string(),
        }
    }

    pub fn supplier_not_found(id: impl std::fmt::Display) -> Self {
        PartyError::NotFound {
            entity_type: "Supplier".to_string(),
            id: id.to_string(),
        }
    }

    /// Creates an InvalidData error with a message
    pub fn invalid(message: impl Into<String>) -> Self {
        PartyError::InvalidData(message.into())
    }

    /// Creates a ValidationFailed error from validation errors
    pub fn validation_failed(errors: Vec<String>) -> Self {
        PartyError::ValidationFailed(errors.join("; "))
    }
}

impl From<PortError> for PartyError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => PartyError::NotFound { entity_type, id },
            PortError::Validation { message, .. } => PartyError::InvalidData(message),
            PortError::Conflict { message } => PartyError::Conflict(message),
            other => PartyError::Storage(other),
        }
    }
}
