//! Domain Adapters
//!
//! [`PostgresBackOffice`] implements every domain port on one connection
//! pool, translating between domain types and repository rows.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::{create_pool, DatabaseConfig, PostgresBackOffice};
//! use domain_billing::{BackOfficeServices, PostingOptions};
//!
//! let pool = create_pool(DatabaseConfig::new(url)).await?;
//! let store = Arc::new(PostgresBackOffice::new(pool));
//! let services = BackOfficeServices::new(store, PostingOptions::default(), 10);
//! ```

mod mapping;
pub mod postgres;

pub use postgres::PostgresBackOffice;
