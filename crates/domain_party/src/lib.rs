//! Party Management Domain
//!
//! Customers and suppliers of the shop, each carrying a running balance:
//!
//! - **Customer.outstanding_balance**: what the customer owes; raised by
//!   invoices and outgoing refunds, lowered by incoming payments
//! - **Supplier.account_balance**: raised by incoming payments, lowered by
//!   outgoing payments
//!
//! Payments address either kind through the tagged [`Counterparty`]
//! reference. Balances are only ever changed by the posting workflows in
//! `domain_billing`; this crate's updates touch contact details only.

pub mod customer;
pub mod supplier;
pub mod counterparty;
pub mod error;
pub mod validation;
pub mod ports;
pub mod service;

pub use customer::{Customer, NewCustomer, CustomerUpdate};
pub use supplier::{Supplier, NewSupplier, SupplierUpdate};
pub use counterparty::{Counterparty, CounterpartyKind, CounterpartySummary};
pub use error::PartyError;
pub use validation::{PartyValidator, ValidationResult};
pub use ports::PartyPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockPartyPort;
pub use service::PartyService;
