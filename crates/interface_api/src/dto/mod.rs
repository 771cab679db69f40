//! Request and response bodies
//!
//! The wire format is camelCase JSON. Amounts travel as decimal strings on
//! the way out and are accepted as strings or numbers on the way in.

pub mod product;
pub mod party;
pub mod sale;
pub mod payment;
pub mod report;
