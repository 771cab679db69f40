//! Product and stock DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{GstRate, Money, ProductId, SupplierId};
use domain_inventory::{
    InventoryTransaction, NewProduct, Product, ProductUpdate, StockMovementRequest, StockMovementType,
};

#[derive(Debug, Deserialize)]
pub struct ProductSearch {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub cost_price: Option<Money>,
    pub sale_price: Option<Money>,
    pub gst_rate: Option<GstRate>,
    pub stock: Option<i64>,
    pub supplier: Option<Uuid>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct {
            name: request.name,
            sku: request.sku,
            category: request.category,
            unit: request.unit,
            description: request.description,
            cost_price: request.cost_price,
            sale_price: request.sale_price,
            gst_rate: request.gst_rate,
            stock: request.stock,
            supplier_id: request.supplier.map(SupplierId::from_uuid),
        }
    }
}

/// Partial update; stock is not accepted here
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub sku: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub cost_price: Option<Money>,
    pub sale_price: Option<Money>,
    pub gst_rate: Option<GstRate>,
    pub supplier: Option<Uuid>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: request.name,
            sku: request.sku,
            category: request.category,
            unit: request.unit,
            description: request.description,
            cost_price: request.cost_price,
            sale_price: request.sale_price,
            gst_rate: request.gst_rate,
            supplier_id: request.supplier.map(SupplierId::from_uuid),
        }
    }
}

/// Body of `POST /api/products/{id}/adjust`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockRequest {
    #[serde(rename = "type")]
    pub movement_type: StockMovementType,
    #[validate(range(min = 1))]
    pub quantity: i64,
    pub unit_cost: Option<Money>,
    pub note: Option<String>,
}

impl From<AdjustStockRequest> for StockMovementRequest {
    fn from(request: AdjustStockRequest) -> Self {
        StockMovementRequest {
            movement_type: request.movement_type,
            quantity: request.quantity,
            unit_cost: request.unit_cost,
            note: request.note,
        }
    }
}

/// Body of `POST /api/inventory`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogInventoryRequest {
    pub product_id: Uuid,
    #[serde(rename = "type")]
    pub movement_type: StockMovementType,
    #[validate(range(min = 1))]
    pub quantity: i64,
    pub unit_cost: Option<Money>,
    pub note: Option<String>,
}

impl LogInventoryRequest {
    pub fn into_parts(self) -> (ProductId, StockMovementRequest) {
        (
            ProductId::from_uuid(self.product_id),
            StockMovementRequest {
                movement_type: self.movement_type,
                quantity: self.quantity,
                unit_cost: self.unit_cost,
                note: self.note,
            },
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub unit: String,
    pub description: Option<String>,
    pub cost_price: Money,
    pub sale_price: Money,
    pub gst_rate: GstRate,
    pub stock: i64,
    pub supplier: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: *product.id.as_uuid(),
            name: product.name,
            sku: product.sku,
            category: product.category,
            unit: product.unit,
            description: product.description,
            cost_price: product.cost_price,
            sale_price: product.sale_price,
            gst_rate: product.gst_rate,
            stock: product.stock,
            supplier: product.supplier_id.map(|id| *id.as_uuid()),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransactionResponse {
    pub id: Uuid,
    pub product: Uuid,
    #[serde(rename = "type")]
    pub movement_type: StockMovementType,
    pub quantity: i64,
    pub unit_cost: Money,
    pub note: Option<String>,
    pub created_by: Option<Uuid>,
    pub transaction_date: DateTime<Utc>,
}

impl From<InventoryTransaction> for InventoryTransactionResponse {
    fn from(tx: InventoryTransaction) -> Self {
        Self {
            id: *tx.id.as_uuid(),
            product: *tx.product_id.as_uuid(),
            movement_type: tx.movement_type,
            quantity: tx.quantity,
            unit_cost: tx.unit_cost,
            note: tx.note,
            created_by: tx.created_by.map(|id| *id.as_uuid()),
            transaction_date: tx.transaction_date,
        }
    }
}
