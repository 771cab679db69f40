//! Product catalog entries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{GstRate, Money, ProductId, SupplierId};

use crate::error::InventoryError;
use crate::stock::{OversellPolicy, StockMovement};

/// Unit used when none is given
pub const DEFAULT_UNIT: &str = "kg";

/// GST percentage used when none is given
pub const DEFAULT_GST_PERCENT: i64 = 5;

/// A product in the catalog
///
/// The SKU is the business identity and is unique across the catalog.
/// Stock is a signed integer: invoice posting may oversell when allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub unit: String,
    pub description: Option<String>,
    pub cost_price: Money,
    pub sale_price: Money,
    pub gst_rate: GstRate,
    pub stock: i64,
    /// Display-only link to the usual supplier
    pub supplier_id: Option<SupplierId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns true when stock is strictly below the threshold
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock < threshold
    }

    /// Applies a manual stock movement, enforcing the zero floor for sales
    ///
    /// # Errors
    ///
    /// `InventoryError::InsufficientStock` if a sale movement exceeds the
    /// current stock; the product is left untouched.
    pub fn apply_movement(&mut self, movement: &StockMovement) -> Result<(), InventoryError> {
        if movement.movement_type.is_outbound() && self.stock < movement.quantity {
            return Err(InventoryError::InsufficientStock {
                product_id: self.id.to_string(),
                requested: movement.quantity,
            });
        }
        self.stock = self
            .stock
            .checked_add(movement.delta())
            .ok_or_else(|| InventoryError::invalid("stock quantity out of range"))?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Removes stock for an invoice line under the given oversell policy
    pub fn remove_for_sale(
        &mut self,
        quantity: i64,
        policy: OversellPolicy,
    ) -> Result<(), InventoryError> {
        if policy == OversellPolicy::Reject && self.stock < quantity {
            return Err(InventoryError::InsufficientStock {
                product_id: self.id.to_string(),
                requested: quantity,
            });
        }
        self.stock = self
            .stock
            .checked_sub(quantity)
            .ok_or_else(|| InventoryError::invalid("stock quantity out of range"))?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Merges an update into this product
    pub fn apply_update(&mut self, update: ProductUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(sku) = update.sku {
            self.sku = sku;
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(cost_price) = update.cost_price {
            self.cost_price = cost_price;
        }
        if let Some(sale_price) = update.sale_price {
            self.sale_price = sale_price;
        }
        if let Some(gst_rate) = update.gst_rate {
            self.gst_rate = gst_rate;
        }
        if let Some(supplier_id) = update.supplier_id {
            self.supplier_id = Some(supplier_id);
        }
        self.updated_at = Utc::now();
    }
}

/// Data for a new catalog entry; omitted fields take catalog defaults
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub cost_price: Option<Money>,
    pub sale_price: Option<Money>,
    pub gst_rate: Option<GstRate>,
    pub stock: Option<i64>,
    pub supplier_id: Option<SupplierId>,
}

impl NewProduct {
    /// Validates the request and builds the product with a fresh id
    ///
    /// # Errors
    ///
    /// `InventoryError::InvalidInput` for a blank name or SKU, or negative prices
    pub fn into_product(self) -> Result<Product, InventoryError> {
        let name = required_text(self.name, "name")?;
        let sku = required_text(self.sku, "sku")?;
        let cost_price = self.cost_price.unwrap_or(Money::ZERO).require_non_negative("cost price")?;
        let sale_price = self.sale_price.unwrap_or(Money::ZERO).require_non_negative("sale price")?;
        let gst_rate = match self.gst_rate {
            Some(rate) => rate,
            None => GstRate::from_percentage(Decimal::from(DEFAULT_GST_PERCENT))?,
        };
        let now = Utc::now();

        Ok(Product {
            id: ProductId::new_v7(),
            name,
            sku,
            category: self.category,
            unit: self.unit.filter(|u| !u.trim().is_empty()).unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            description: self.description,
            cost_price,
            sale_price,
            gst_rate,
            stock: self.stock.unwrap_or(0),
            supplier_id: self.supplier_id,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of catalog fields
///
/// Stock is absent here: it only changes through stock movements and
/// invoice posting.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub cost_price: Option<Money>,
    pub sale_price: Option<Money>,
    pub gst_rate: Option<GstRate>,
    pub supplier_id: Option<SupplierId>,
}

impl ProductUpdate {
    /// Rejects blank identifiers and negative prices
    pub fn validate(&self) -> Result<(), InventoryError> {
        if let Some(name) = &self.name {
            required_text(name.clone(), "name")?;
        }
        if let Some(sku) = &self.sku {
            required_text(sku.clone(), "sku")?;
        }
        if let Some(cost_price) = self.cost_price {
            cost_price.require_non_negative("cost price")?;
        }
        if let Some(sale_price) = self.sale_price {
            sale_price.require_non_negative("sale price")?;
        }
        Ok(())
    }
}

/// Catalog listing filter
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
}

impl ProductQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }

    /// Returns true if the product passes this filter
    pub fn matches(&self, product: &Product) -> bool {
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                product.name.to_lowercase().contains(&term.to_lowercase())
            }
            _ => true,
        }
    }
}

fn required_text(value: String, field: &str) -> Result<String, InventoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::invalid(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}
