//! Repository implementations
//!
//! Repositories own the SQL and work in database row types. Posting
//! operations open their own transaction; the shared helpers that take a
//! `&mut PgConnection` are the building blocks those transactions use.

pub mod types;
pub mod catalog;
pub mod party;
pub mod sales;
pub mod payments;
pub mod reports;

pub use catalog::CatalogRepository;
pub use party::PartyRepository;
pub use sales::SalesRepository;
pub use payments::PaymentsRepository;
pub use reports::ReportsRepository;
