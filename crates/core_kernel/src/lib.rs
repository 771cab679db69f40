//! Core Kernel - Foundational types shared by the back-office domains
//!
//! This crate provides the building blocks used across all domain modules:
//! - Money and GST rate types with exact decimal arithmetic
//! - Strongly-typed entity identifiers
//! - Port error type and marker traits for the adapter layer

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, GstRate, MoneyError};
pub use identifiers::{
    ProductId, InventoryTransactionId, CustomerId, SupplierId,
    SaleId, PaymentId, UserId,
};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
