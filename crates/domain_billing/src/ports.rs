//! Billing Domain Ports
//!
//! The posting ports are where atomicity lives. An adapter must perform
//! every side effect of a posting inside one unit of work:
//!
//! - `SalesPort::post_sale`: allocate the invoice number, insert the sale,
//!   raise the customer balance, decrement stock
//! - `PaymentsPort::post_payment`: insert the payment, apply the signed
//!   balance change
//!
//! Balance and stock changes are in-place increments, never
//! read-modify-write in application code.

use async_trait::async_trait;

use core_kernel::{CustomerId, DomainPort, HealthCheckable, Money, PortError, SaleId, SupplierId};
use domain_inventory::{OversellPolicy, Product};

use crate::invoice::{Sale, SaleDraft};
use crate::ledger::LedgerTotals;
use crate::numbering::InvoiceNumbering;
use crate::payment::Payment;
use crate::reports::{EntityCounts, MonthlySales, PaymentTotal, PendingAggregate};

/// Settings that apply to every invoice posting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingOptions {
    pub numbering: InvoiceNumbering,
    pub oversell: OversellPolicy,
}

/// Port for invoice persistence
#[async_trait]
pub trait SalesPort: DomainPort + HealthCheckable {
    /// Numbers and persists a draft and applies its side effects atomically
    ///
    /// # Errors
    ///
    /// - `PortError::NotFound` if the customer or a product vanished
    /// - `PortError::InsufficientStock` if `options.oversell` rejects a line
    /// - `PortError::Conflict` if the invoice number is already taken
    ///
    /// On any error nothing is written.
    async fn post_sale(&self, draft: SaleDraft, options: &PostingOptions) -> Result<Sale, PortError>;

    async fn get_sale(&self, id: SaleId) -> Result<Sale, PortError>;

    /// Lists sales newest first
    async fn list_sales(&self, limit: Option<u32>) -> Result<Vec<Sale>, PortError>;

    async fn count_sales(&self) -> Result<i64, PortError>;
}

/// Port for payment persistence
#[async_trait]
pub trait PaymentsPort: DomainPort + HealthCheckable {
    /// Persists a payment and applies its balance change atomically
    ///
    /// Returns `PortError::NotFound` without writing anything when the
    /// counterparty does not exist.
    async fn post_payment(&self, payment: Payment) -> Result<Payment, PortError>;

    /// Lists payments by payment date, newest first
    async fn list_payments(&self, limit: Option<u32>) -> Result<Vec<Payment>, PortError>;
}

/// Port for read-only aggregations
#[async_trait]
pub trait ReportsPort: DomainPort + HealthCheckable {
    async fn entity_counts(&self) -> Result<EntityCounts, PortError>;

    /// Products with `stock < threshold`, lowest stock first
    async fn low_stock_products(&self, threshold: i64, limit: u32) -> Result<Vec<Product>, PortError>;

    /// Open invoice totals per customer, largest total first
    async fn pending_by_customer(&self) -> Result<Vec<PendingAggregate>, PortError>;

    async fn sales_total(&self) -> Result<Money, PortError>;

    /// Payment totals grouped by direction; directions with no payments are omitted
    async fn payment_totals(&self) -> Result<Vec<PaymentTotal>, PortError>;

    /// Sales totals per calendar month of sale date, oldest first
    async fn monthly_sales(&self, limit: u32) -> Result<Vec<MonthlySales>, PortError>;

    async fn customer_ledger_totals(&self, id: CustomerId) -> Result<LedgerTotals, PortError>;

    async fn supplier_ledger_totals(&self, id: SupplierId) -> Result<LedgerTotals, PortError>;
}
