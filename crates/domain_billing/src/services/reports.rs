//! Dashboard, reports and ledger reconciliation

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{instrument, warn};

use core_kernel::{CustomerId, SupplierId};
use domain_party::PartyPort;

use crate::error::BillingError;
use crate::ledger::Reconciliation;
use crate::ports::{ReportsPort, SalesPort};
use crate::services::with_customers;
use crate::reports::{
    DashboardSummary, MonthlySales, PendingCustomer, ReportsOverview, LOW_STOCK_LIMIT,
    MONTHLY_SALES_LIMIT, RECENT_SALES_LIMIT,
};

/// Read-only aggregations over the back office
#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportsPort>,
    sales: Arc<dyn SalesPort>,
    parties: Arc<dyn PartyPort>,
    low_stock_threshold: i64,
}

impl ReportService {
    pub fn new(
        reports: Arc<dyn ReportsPort>,
        sales: Arc<dyn SalesPort>,
        parties: Arc<dyn PartyPort>,
        low_stock_threshold: i64,
    ) -> Self {
        Self {
            reports,
            sales,
            parties,
            low_stock_threshold,
        }
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardSummary, BillingError> {
        let counts = self.reports.entity_counts().await?;
        let low_stock = self
            .reports
            .low_stock_products(self.low_stock_threshold, LOW_STOCK_LIMIT)
            .await?;
        let pending = self.reports.pending_by_customer().await?;

        Ok(DashboardSummary {
            counts,
            low_stock,
            pending_total: pending.iter().map(|p| p.total_pending).sum(),
            pending_customers: pending.len() as i64,
        })
    }

    #[instrument(skip(self))]
    pub async fn overview(&self) -> Result<ReportsOverview, BillingError> {
        let sales_total = self.reports.sales_total().await?;
        let payment_totals = self.reports.payment_totals().await?;
        let counts = self.reports.entity_counts().await?;
        let recent = self.sales.list_sales(Some(RECENT_SALES_LIMIT)).await?;
        let recent_sales = with_customers(self.parties.as_ref(), recent).await?;

        Ok(ReportsOverview {
            sales_total,
            payment_totals,
            product_count: counts.products,
            recent_sales,
        })
    }

    pub async fn sales_by_month(&self) -> Result<Vec<MonthlySales>, BillingError> {
        Ok(self.reports.monthly_sales(MONTHLY_SALES_LIMIT).await?)
    }

    /// Customers with open invoices, largest amount pending first
    ///
    /// Invoices whose customer has since been deleted are left out.
    #[instrument(skip(self))]
    pub async fn pending_by_customer(&self) -> Result<Vec<PendingCustomer>, BillingError> {
        let aggregates = self.reports.pending_by_customer().await?;
        if aggregates.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<CustomerId> = aggregates.iter().map(|a| a.customer_id).collect();
        let customers: HashMap<CustomerId, _> = self
            .parties
            .find_customers_by_ids(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut pending: Vec<PendingCustomer> = aggregates
            .into_iter()
            .filter_map(|aggregate| {
                customers.get(&aggregate.customer_id).map(|customer| PendingCustomer {
                    customer: customer.clone(),
                    total_pending: aggregate.total_pending,
                    invoice_count: aggregate.invoice_count,
                })
            })
            .collect();
        pending.sort_by(|a, b| b.total_pending.cmp(&a.total_pending));
        Ok(pending)
    }

    /// Recomputes a customer's balance from history
    #[instrument(skip(self))]
    pub async fn reconcile_customer(&self, id: CustomerId) -> Result<Reconciliation, BillingError> {
        let customer = self.parties.get_customer(id).await?;
        let totals = self.reports.customer_ledger_totals(id).await?;
        let report = Reconciliation::for_customer(&customer, totals);
        log_drift(&report);
        Ok(report)
    }

    /// Recomputes a supplier's balance from history
    #[instrument(skip(self))]
    pub async fn reconcile_supplier(&self, id: SupplierId) -> Result<Reconciliation, BillingError> {
        let supplier = self.parties.get_supplier(id).await?;
        let totals = self.reports.supplier_ledger_totals(id).await?;
        let report = Reconciliation::for_supplier(&supplier, totals);
        log_drift(&report);
        Ok(report)
    }
}

fn log_drift(report: &Reconciliation) {
    if !report.is_consistent() {
        warn!(
            counterparty = %report.counterparty,
            stored = %report.stored_balance,
            recomputed = %report.recomputed_balance,
            "Ledger drift detected"
        );
    }
}
