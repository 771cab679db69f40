//! Invoice posting workflow

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use core_kernel::{CustomerId, SaleId, UserId};
use domain_inventory::CatalogPort;
use domain_party::{CounterpartySummary, PartyPort};

use crate::error::BillingError;
use crate::invoice::{Sale, SaleDraft, SaleRequest, SaleView};
use crate::ports::{PostingOptions, SalesPort};

/// Posts and reads invoices
#[derive(Clone)]
pub struct SalesService {
    sales: Arc<dyn SalesPort>,
    catalog: Arc<dyn CatalogPort>,
    parties: Arc<dyn PartyPort>,
    options: PostingOptions,
}

impl SalesService {
    pub fn new(
        sales: Arc<dyn SalesPort>,
        catalog: Arc<dyn CatalogPort>,
        parties: Arc<dyn PartyPort>,
        options: PostingOptions,
    ) -> Self {
        Self {
            sales,
            catalog,
            parties,
            options,
        }
    }

    pub fn options(&self) -> &PostingOptions {
        &self.options
    }

    /// Posts a sale
    ///
    /// Products are resolved in one batch, then [`SaleDraft::build`]
    /// validates the request and computes every amount before the store is
    /// asked to commit. Numbering, the sale row, the
    /// customer balance and the stock decrements then succeed or fail
    /// together.
    ///
    /// # Errors
    ///
    /// - `BillingError::InvalidInput` for a malformed request
    /// - `BillingError::NotFound` for an unknown product or customer
    /// - `BillingError::InsufficientStock` when oversell is rejected
    #[instrument(skip(self, request), fields(items = request.items.len(), customer = ?request.customer_id))]
    pub async fn create_sale(
        &self,
        request: SaleRequest,
        actor: Option<UserId>,
    ) -> Result<Sale, BillingError> {
        let product_ids = request.product_ids();
        let products = self.catalog.find_products_by_ids(&product_ids).await?;
        let draft = SaleDraft::build(request, &products, actor)?;

        let sale = match self.sales.post_sale(draft, &self.options).await {
            Ok(sale) => sale,
            Err(e) => {
                let err = BillingError::from(e);
                if matches!(err, BillingError::InsufficientStock { .. }) {
                    warn!(error = %err, "Sale rejected");
                }
                return Err(err);
            }
        };

        info!(
            invoice_number = %sale.invoice_number,
            subtotal = %sale.subtotal,
            gst_total = %sale.gst_total,
            total = %sale.total,
            "Sale posted"
        );
        Ok(sale)
    }

    pub async fn get_sale(&self, id: SaleId) -> Result<Sale, BillingError> {
        Ok(self.sales.get_sale(id).await?)
    }

    /// Lists all sales newest first, with customers resolved in one lookup
    pub async fn list_sales(&self) -> Result<Vec<SaleView>, BillingError> {
        let sales = self.sales.list_sales(None).await?;
        with_customers(self.parties.as_ref(), sales).await
    }
}

/// Pairs each sale with a summary of its customer
pub(crate) async fn with_customers(
    parties: &dyn PartyPort,
    sales: Vec<Sale>,
) -> Result<Vec<SaleView>, BillingError> {
    let ids: HashSet<CustomerId> = sales.iter().filter_map(|sale| sale.customer_id).collect();
    let mut customers: HashMap<CustomerId, CounterpartySummary> = HashMap::new();
    if !ids.is_empty() {
        let ids: Vec<CustomerId> = ids.into_iter().collect();
        for customer in parties.find_customers_by_ids(&ids).await? {
            customers.insert(customer.id, CounterpartySummary::from(&customer));
        }
    }

    Ok(sales
        .into_iter()
        .map(|sale| SaleView {
            customer: sale.customer_id.and_then(|id| customers.get(&id).cloned()),
            sale,
        })
        .collect())
}
