//! API error handling
//!
//! Domain errors are mapped to status codes here. Internal failures are
//! logged in full and answered with a generic message.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_billing::BillingError;
use domain_inventory::InventoryError;
use domain_party::PartyError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg),
            ApiError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            BillingError::InvalidInput(msg) => ApiError::BadRequest(msg),
            BillingError::InsufficientStock { .. } => ApiError::BadRequest(err.to_string()),
            BillingError::Conflict(msg) => ApiError::Conflict(msg),
            BillingError::Storage(source) => ApiError::Internal(source.to_string()),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotFound(_) => ApiError::NotFound(err.to_string()),
            InventoryError::InvalidInput(msg) => ApiError::BadRequest(msg),
            InventoryError::InsufficientStock { .. } => ApiError::BadRequest(err.to_string()),
            InventoryError::Conflict(msg) => ApiError::Conflict(msg),
            InventoryError::Storage(source) => ApiError::Internal(source.to_string()),
        }
    }
}

impl From<PartyError> for ApiError {
    fn from(err: PartyError) -> Self {
        match err {
            PartyError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PartyError::InvalidData(msg) | PartyError::ValidationFailed(msg) => ApiError::BadRequest(msg),
            PartyError::Conflict(msg) => ApiError::Conflict(msg),
            PartyError::Storage(source) => ApiError::Internal(source.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::PortError;

    fn status(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_billing_errors_map_to_status() {
        assert_eq!(status(BillingError::not_found("Product", "x")), StatusCode::NOT_FOUND);
        assert_eq!(status(BillingError::invalid("bad")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(BillingError::InsufficientStock {
                product_id: "p".to_string(),
                requested: 3
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(BillingError::Conflict("dup".to_string())), StatusCode::CONFLICT);
        assert_eq!(
            status(BillingError::Storage(PortError::internal("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_party_and_inventory_errors_map_to_status() {
        assert_eq!(status(PartyError::customer_not_found("c")), StatusCode::NOT_FOUND);
        assert_eq!(status(InventoryError::Conflict("sku".to_string())), StatusCode::CONFLICT);
        assert_eq!(status(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ApiError::Forbidden("no".to_string())), StatusCode::FORBIDDEN);
    }
}
