//! Test Utilities Crate
//!
//! Shared test infrastructure for the back-office workspace.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for products, customers and suppliers
//! - `builders`: Builders for products, sale requests and payment requests
//! - `database`: PostgreSQL testcontainer management
//! - `assertions`: Assertion helpers for invoices and balances
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
