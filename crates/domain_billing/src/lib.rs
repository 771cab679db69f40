//! Billing Domain
//!
//! Invoicing and money movement for the shop:
//!
//! - **Invoices**: priced lines with per-line GST, numbered from a
//!   per-prefix counter (`AGRO-0001`, `AGRO-0002`, ...)
//! - **Payments**: incoming and outgoing, applied to a customer or
//!   supplier balance through a fixed sign table
//! - **Reports**: dashboard counts, pending receivables, monthly sales
//! - **Reconciliation**: recomputes a stored balance from history
//!
//! # Posting
//!
//! Posting a sale allocates the invoice number, records the sale, raises
//! the customer's balance and decrements stock as one unit of work. If any
//! step fails nothing is written.
//!
//! ```rust,ignore
//! use domain_billing::{BackOfficeServices, PostingOptions, SaleRequest, LineRequest};
//!
//! let services = BackOfficeServices::new(store, PostingOptions::default(), 10);
//! let sale = services.sales.create_sale(SaleRequest {
//!     customer_id: Some(customer.id),
//!     items: vec![LineRequest { product_id, quantity: 3, rate: None, gst_rate: None }],
//!     ..Default::default()
//! }, None).await?;
//! assert_eq!(sale.invoice_number, "AGRO-0001");
//! ```

pub mod invoice;
pub mod numbering;
pub mod payment;
pub mod ledger;
pub mod reports;
pub mod error;
pub mod ports;
pub mod services;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use invoice::{LineRequest, PaymentStatus, Sale, SaleDraft, SaleLine, SaleRequest, SaleView};
pub use numbering::{InvoiceNumbering, DEFAULT_MIN_DIGITS, DEFAULT_PREFIX};
pub use payment::{balance_delta, Payment, PaymentDirection, PaymentMethod, PaymentRequest, PaymentView};
pub use ledger::{LedgerTotals, Reconciliation};
pub use reports::{
    DashboardSummary, EntityCounts, MonthlySales, PaymentTotal, PendingAggregate, PendingCustomer,
    ReportsOverview,
};
pub use error::BillingError;
pub use ports::{PaymentsPort, PostingOptions, ReportsPort, SalesPort};
pub use services::{BackOfficeServices, BackOfficeStore, PaymentService, ReportService, SalesService};
#[cfg(any(test, feature = "mock"))]
pub use mock::InMemoryBackOffice;
