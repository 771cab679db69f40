//! Port plumbing shared by the domain crates
//!
//! Each domain declares its storage needs as an `#[async_trait]` port
//! (`CatalogPort`, `PartyPort`, `SalesPort`, ...). The PostgreSQL store in
//! `infra_db` and the in-memory store behind the `mock` features implement
//! them; services only ever hold `Arc<dyn Port>`.
//!
//! ```text
//!   SalesService ── PaymentService ── InventoryService ── PartyService
//!         │               │                  │                 │
//!         ▼               ▼                  ▼                 ▼
//!     SalesPort      PaymentsPort        CatalogPort        PartyPort
//!         ▲               ▲                  ▲                 ▲
//!         └───── PostgresBackOffice / InMemoryBackOffice ──────┘
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a store, before a domain gives it meaning
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid data: {message}")]
    Validation { message: String },

    /// Unique key taken (SKU, invoice number)
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// A conditional stock decrement matched no row
    #[error("Insufficient stock for product {product_id}: requested {requested}")]
    InsufficientStock { product_id: String, requested: i64 },

    #[error("Store unavailable: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation { message: message.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict { message: message.into() }
    }

    pub fn insufficient_stock(product_id: impl fmt::Display, requested: i64) -> Self {
        PortError::InsufficientStock {
            product_id: product_id.to_string(),
            requested,
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Worth retrying once the pool recovers
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Connection { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker for every port trait; ports live behind `Arc<dyn ...>` in handlers
pub trait DomainPort: Send + Sync + 'static {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Unhealthy,
}

/// Outcome of a store readiness probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    pub fn healthy(adapter_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: Utc::now(),
        }
    }

    pub fn unhealthy(adapter_id: impl Into<String>, latency_ms: u64, message: impl Into<String>) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(message.into()),
            checked_at: Utc::now(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity() {
        let error = PortError::not_found("Product", "PRD-123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert_eq!(error.to_string(), "Product PRD-123 not found");
    }

    #[test]
    fn test_only_connection_errors_are_transient() {
        assert!(PortError::connection("pool closed").is_transient());
        assert!(!PortError::validation("bad quantity").is_transient());
        assert!(!PortError::insufficient_stock("PRD-1", 5).is_transient());
    }

    #[test]
    fn test_health_readiness() {
        assert!(HealthCheckResult::healthy("postgres", 3).is_ready());

        let down = HealthCheckResult::unhealthy("postgres", 30_000, "pool timed out");
        assert!(!down.is_ready());
        assert_eq!(down.message.as_deref(), Some("pool timed out"));
    }
}
