//! Sales invoices and line-item GST computation
//!
//! Posting an invoice is split in two: [`SaleDraft::build`] is pure and
//! computes every amount from the resolved products; the `SalesPort` then
//! numbers and persists the draft and applies its side effects in one
//! transaction. Rates are copied into each line so later catalog edits
//! never change an issued invoice.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, GstRate, Money, ProductId, SaleId, UserId};
use domain_inventory::Product;
use domain_party::CounterpartySummary;

use crate::error::BillingError;

/// Settlement state of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Partial,
}

impl PaymentStatus {
    /// Pending and partial invoices still carry money owed
    pub fn is_open(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Partial)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Partial => "partial",
        }
    }
}

/// One requested invoice line, before pricing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Overrides the product's sale price
    pub rate: Option<Money>,
    /// Overrides the product's GST rate
    pub gst_rate: Option<GstRate>,
}

/// A request to post a sale
#[derive(Debug, Clone, Default)]
pub struct SaleRequest {
    pub customer_id: Option<CustomerId>,
    pub items: Vec<LineRequest>,
    pub payment_status: Option<PaymentStatus>,
    pub sale_date: Option<DateTime<Utc>>,
}

impl SaleRequest {
    /// Checks the shape of the request without touching any store
    ///
    /// # Errors
    ///
    /// `BillingError::InvalidInput` for an empty item list, a non-positive
    /// quantity or a negative rate override
    pub fn validate(&self) -> Result<(), BillingError> {
        if self.items.is_empty() {
            return Err(BillingError::invalid("a sale needs at least one item"));
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.quantity <= 0 {
                return Err(BillingError::invalid(format!(
                    "item {}: quantity must be greater than zero",
                    index + 1
                )));
            }
            if let Some(rate) = item.rate {
                rate.require_non_negative("rate")
                    .map_err(|e| BillingError::invalid(format!("item {}: {}", index + 1, e)))?;
            }
        }
        Ok(())
    }

    /// Distinct product ids referenced by the request, in first-seen order
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items
            .iter()
            .map(|item| item.product_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// A priced invoice line, frozen at posting time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: ProductId,
    /// Product name at posting time
    pub product_name: String,
    pub quantity: i64,
    pub rate: Money,
    pub gst_rate: GstRate,
    pub gst_amount: Money,
    pub line_total: Money,
}

impl SaleLine {
    /// Prices a line from its product
    ///
    /// `base = rate × quantity`, `gst = base × gst_rate / 100`,
    /// `line_total = base + gst`. No rounding is applied.
    pub fn price(request: &LineRequest, product: &Product) -> Result<Self, BillingError> {
        let rate = request.rate.unwrap_or(product.sale_price);
        let gst_rate = request.gst_rate.unwrap_or(product.gst_rate);
        let base = rate.checked_times(request.quantity)?;
        let gst_amount = gst_rate.apply(base)?;
        let line_total = base.checked_add(&gst_amount)?;

        Ok(Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: request.quantity,
            rate,
            gst_rate,
            gst_amount,
            line_total,
        })
    }

    /// Taxable amount of the line
    pub fn base(&self) -> Money {
        self.rate.times(self.quantity)
    }
}

/// A fully priced sale waiting for its invoice number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    pub customer_id: Option<CustomerId>,
    pub items: Vec<SaleLine>,
    pub subtotal: Money,
    pub gst_total: Money,
    pub total: Money,
    pub payment_status: PaymentStatus,
    pub sale_date: DateTime<Utc>,
    pub created_by: Option<UserId>,
    decrements: BTreeMap<ProductId, i64>,
}

impl SaleDraft {
    /// Prices every line against the resolved products and totals the sale
    ///
    /// # Errors
    ///
    /// - `BillingError::InvalidInput` if the request is malformed or an
    ///   amount or per-product quantity overflows
    /// - `BillingError::NotFound` if any line names a product not in `products`
    pub fn build(
        request: SaleRequest,
        products: &[Product],
        created_by: Option<UserId>,
    ) -> Result<Self, BillingError> {
        request.validate()?;

        let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();
        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let product = by_id
                .get(&line.product_id)
                .ok_or_else(|| BillingError::not_found("Product", line.product_id))?;
            items.push(SaleLine::price(line, product)?);
        }

        let subtotal = Money::checked_sum(items.iter().map(SaleLine::base))?;
        let gst_total = Money::checked_sum(items.iter().map(|l| l.gst_amount))?;
        let total = subtotal.checked_add(&gst_total)?;
        let decrements = sum_quantities(&items)?;

        Ok(Self {
            customer_id: request.customer_id,
            items,
            subtotal,
            gst_total,
            total,
            payment_status: request.payment_status.unwrap_or_default(),
            sale_date: request.sale_date.unwrap_or_else(Utc::now),
            created_by,
            decrements,
        })
    }

    /// Quantity to remove per product, ordered by product id
    ///
    /// Repeated products are summed so each stock row is touched once. The
    /// order is the row-lock order used by every posting.
    pub fn stock_decrements(&self) -> &BTreeMap<ProductId, i64> {
        &self.decrements
    }

    /// Attaches identity and invoice number, producing the immutable sale
    pub fn into_sale(self, id: SaleId, invoice_number: String, created_at: DateTime<Utc>) -> Sale {
        Sale {
            id,
            invoice_number,
            customer_id: self.customer_id,
            items: self.items,
            subtotal: self.subtotal,
            gst_total: self.gst_total,
            total: self.total,
            payment_status: self.payment_status,
            sale_date: self.sale_date,
            created_by: self.created_by,
            created_at,
        }
    }
}

/// A posted invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub invoice_number: String,
    pub customer_id: Option<CustomerId>,
    pub items: Vec<SaleLine>,
    pub subtotal: Money,
    pub gst_total: Money,
    pub total: Money,
    pub payment_status: PaymentStatus,
    pub sale_date: DateTime<Utc>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Checks `total = subtotal + gst_total` and both sums against the lines
    pub fn totals_consistent(&self) -> bool {
        let subtotal = Money::checked_sum(self.items.iter().map(SaleLine::base));
        let gst_total = Money::checked_sum(self.items.iter().map(|l| l.gst_amount));
        subtotal == Ok(self.subtotal)
            && gst_total == Ok(self.gst_total)
            && self.subtotal.checked_add(&self.gst_total) == Ok(self.total)
    }
}

/// A posted invoice together with its resolved customer
///
/// `customer` is `None` for walk-in sales and for customers since deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleView {
    pub sale: Sale,
    pub customer: Option<CounterpartySummary>,
}

fn sum_quantities(items: &[SaleLine]) -> Result<BTreeMap<ProductId, i64>, BillingError> {
    let mut decrements: BTreeMap<ProductId, i64> = BTreeMap::new();
    for item in items {
        let total = decrements.entry(item.product_id).or_insert(0);
        *total = total.checked_add(item.quantity).ok_or_else(|| {
            BillingError::invalid(format!(
                "total quantity of product {} is too large",
                item.product_id
            ))
        })?;
    }
    Ok(decrements)
}
