//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the back office using SQLx.
//!
//! # Architecture
//!
//! - `repositories`: SQL and row types, one repository per aggregate
//! - `adapters`: [`PostgresBackOffice`], which implements every domain port
//!   on top of the repositories
//!
//! Postings are single transactions. Stock and balances are changed with
//! in-place increments so concurrent postings never lose an update.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresBackOffice};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/backoffice")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresBackOffice::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::PostgresBackOffice;
