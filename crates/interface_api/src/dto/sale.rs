//! Invoice DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{CustomerId, GstRate, Money, ProductId};
use domain_billing::{LineRequest, PaymentStatus, Sale, SaleLine, SaleRequest, SaleView};

use super::party::CounterpartyResponse;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i64,
    /// Overrides the product's sale price
    pub rate: Option<Money>,
    /// Overrides the product's GST rate
    pub gst_rate: Option<GstRate>,
}

/// Body of `POST /api/sales`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub items: Vec<SaleItemRequest>,
    pub payment_status: Option<PaymentStatus>,
    pub sale_date: Option<DateTime<Utc>>,
}

impl From<CreateSaleRequest> for SaleRequest {
    fn from(request: CreateSaleRequest) -> Self {
        SaleRequest {
            customer_id: request.customer_id.map(CustomerId::from_uuid),
            items: request
                .items
                .into_iter()
                .map(|item| LineRequest {
                    product_id: ProductId::from_uuid(item.product_id),
                    quantity: item.quantity,
                    rate: item.rate,
                    gst_rate: item.gst_rate,
                })
                .collect(),
            payment_status: request.payment_status,
            sale_date: request.sale_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemResponse {
    pub product: Uuid,
    pub product_name: String,
    pub quantity: i64,
    pub rate: Money,
    pub gst_rate: GstRate,
    pub gst_amount: Money,
    pub total: Money,
}

impl From<SaleLine> for SaleItemResponse {
    fn from(line: SaleLine) -> Self {
        Self {
            product: *line.product_id.as_uuid(),
            product_name: line.product_name,
            quantity: line.quantity,
            rate: line.rate,
            gst_rate: line.gst_rate,
            gst_amount: line.gst_amount,
            total: line.line_total,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: Uuid,
    pub invoice_number: String,
    pub customer_id: Option<Uuid>,
    /// Filled in on listings; `null` on a freshly posted or fetched invoice
    pub customer: Option<CounterpartyResponse>,
    pub items: Vec<SaleItemResponse>,
    pub subtotal: Money,
    pub gst_total: Money,
    pub total: Money,
    pub payment_status: PaymentStatus,
    pub sale_date: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        Self {
            id: *sale.id.as_uuid(),
            invoice_number: sale.invoice_number,
            customer_id: sale.customer_id.map(|id| *id.as_uuid()),
            customer: None,
            items: sale.items.into_iter().map(SaleItemResponse::from).collect(),
            subtotal: sale.subtotal,
            gst_total: sale.gst_total,
            total: sale.total,
            payment_status: sale.payment_status,
            sale_date: sale.sale_date,
            created_by: sale.created_by.map(|id| *id.as_uuid()),
            created_at: sale.created_at,
        }
    }
}

impl From<SaleView> for SaleResponse {
    fn from(view: SaleView) -> Self {
        Self {
            customer: view.customer.map(CounterpartyResponse::from),
            ..SaleResponse::from(view.sale)
        }
    }
}
