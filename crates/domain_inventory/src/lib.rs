//! Inventory Domain
//!
//! Product catalog and stock control for the shop:
//!
//! - **Products**: catalog entries with prices, GST rate and a signed stock level
//! - **Stock movements**: purchase, sale and adjustment, each leaving an
//!   immutable `InventoryTransaction`
//! - **Oversell policy**: whether invoice posting may take stock negative
//!
//! Manual sale movements never take stock below zero. Invoice posting lives
//! in `domain_billing` and consults `OversellPolicy` instead.

pub mod product;
pub mod stock;
pub mod error;
pub mod ports;
pub mod service;

pub use product::{Product, NewProduct, ProductUpdate, ProductQuery, DEFAULT_UNIT, DEFAULT_GST_PERCENT};
pub use stock::{StockMovement, StockMovementType, InventoryTransaction, OversellPolicy};
pub use error::InventoryError;
pub use ports::CatalogPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockCatalogPort;
pub use service::{InventoryService, StockMovementRequest};
