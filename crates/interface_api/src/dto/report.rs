//! Dashboard and report DTOs

use serde::Serialize;

use core_kernel::Money;
use domain_billing::{DashboardSummary, MonthlySales, PaymentDirection, PaymentTotal, ReportsOverview};

use super::product::ProductResponse;
use super::sale::SaleResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub product_count: i64,
    pub sale_count: i64,
    pub customer_count: i64,
    pub supplier_count: i64,
    pub pending_payments_total: Money,
    /// Distinct customers with open invoices
    pub pending_payments_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: String,
    pub stats: DashboardStats,
    pub low_stock: Vec<ProductResponse>,
}

impl DashboardResponse {
    pub fn new(user: String, summary: DashboardSummary) -> Self {
        Self {
            user,
            stats: DashboardStats {
                product_count: summary.counts.products,
                sale_count: summary.counts.sales,
                customer_count: summary.counts.customers,
                supplier_count: summary.counts.suppliers,
                pending_payments_total: summary.pending_total,
                pending_payments_count: summary.pending_customers,
            },
            low_stock: summary.low_stock.into_iter().map(ProductResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTotalResponse {
    #[serde(rename = "type")]
    pub direction: PaymentDirection,
    pub total: Money,
}

impl From<PaymentTotal> for PaymentTotalResponse {
    fn from(total: PaymentTotal) -> Self {
        Self {
            direction: total.direction,
            total: total.total,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub sales_total: Money,
    pub payments_total: Vec<PaymentTotalResponse>,
    pub product_count: i64,
    pub recent_sales: Vec<SaleResponse>,
}

impl From<ReportsOverview> for OverviewResponse {
    fn from(overview: ReportsOverview) -> Self {
        Self {
            sales_total: overview.sales_total,
            payments_total: overview
                .payment_totals
                .into_iter()
                .map(PaymentTotalResponse::from)
                .collect(),
            product_count: overview.product_count,
            recent_sales: overview.recent_sales.into_iter().map(SaleResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalesResponse {
    pub year: i32,
    pub month: u32,
    pub total: Money,
}

impl From<MonthlySales> for MonthlySalesResponse {
    fn from(row: MonthlySales) -> Self {
        Self {
            year: row.year,
            month: row.month,
            total: row.total,
        }
    }
}
