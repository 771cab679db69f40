//! Request handlers, one module per resource

pub mod health;
pub mod auth;
pub mod products;
pub mod inventory;
pub mod customers;
pub mod suppliers;
pub mod sales;
pub mod payments;
pub mod reports;
