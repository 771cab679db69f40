//! Read models for the dashboard and reports

use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, Money};
use domain_inventory::Product;
use domain_party::Customer;

use crate::invoice::SaleView;
use crate::payment::PaymentDirection;

/// Number of low-stock products shown on the dashboard
pub const LOW_STOCK_LIMIT: u32 = 5;

/// Number of recent sales shown on the overview
pub const RECENT_SALES_LIMIT: u32 = 5;

/// Number of month buckets returned by the monthly sales report
pub const MONTHLY_SALES_LIMIT: u32 = 12;

/// Row counts of the main tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub products: i64,
    pub sales: i64,
    pub customers: i64,
    pub suppliers: i64,
}

/// Open invoice totals for one customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAggregate {
    pub customer_id: CustomerId,
    pub total_pending: Money,
    pub invoice_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub counts: EntityCounts,
    pub low_stock: Vec<Product>,
    /// Σ totals of pending/partial invoices that name a customer
    pub pending_total: Money,
    /// Distinct customers with pending/partial invoices
    pub pending_customers: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTotal {
    pub direction: PaymentDirection,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportsOverview {
    pub sales_total: Money,
    pub payment_totals: Vec<PaymentTotal>,
    pub product_count: i64,
    pub recent_sales: Vec<SaleView>,
}

/// Sales total for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub year: i32,
    pub month: u32,
    pub total: Money,
}

/// A customer with open invoices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCustomer {
    pub customer: Customer,
    pub total_pending: Money,
    pub invoice_count: i64,
}
