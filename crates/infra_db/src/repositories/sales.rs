//! Sales repository
//!
//! Invoice posting runs in one transaction that touches rows in a fixed
//! order: product stock (by ascending id), the customer balance, the
//! invoice counter, then the sale and its lines. Every posting path takes
//! row locks in that order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use domain_billing::InvoiceNumbering;

use crate::error::DatabaseError;
use crate::repositories::catalog::decrement_stock;
use crate::repositories::party::apply_balance_delta;
use crate::repositories::types::{DbCounterpartyKind, DbPaymentStatus};

const SALE_COLUMNS: &str = "id, invoice_number, customer_id, subtotal, gst_total, total, \
     payment_status, sale_date, created_by, created_at";

const ITEM_COLUMNS: &str =
    "sale_id, line_no, product_id, product_name, quantity, rate, gst_rate, gst_amount, line_total";

/// Repository for invoices
#[derive(Debug, Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Numbers and records a sale with all of its side effects
    ///
    /// `decrements` must be ordered by product id. With `enforce_floor`
    /// a line that would take stock below zero aborts the posting.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::NotFound` for a missing customer or product
    /// - `DatabaseError::InsufficientStock` when the floor is enforced
    /// - `DatabaseError::DuplicateEntry` if the invoice number is taken
    ///
    /// Nothing is written on error.
    pub async fn post_sale(
        &self,
        sale: &NewSale,
        items: &[SaleItemRow],
        decrements: &[(Uuid, i64)],
        numbering: &InvoiceNumbering,
        enforce_floor: bool,
    ) -> Result<SaleRow, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        for (product_id, quantity) in decrements {
            decrement_stock(&mut tx, *product_id, *quantity, enforce_floor).await?;
        }

        if let Some(customer_id) = sale.customer_id {
            apply_balance_delta(&mut tx, DbCounterpartyKind::Customer, customer_id, sale.total).await?;
        }

        let invoice_number = allocate_invoice_number(&mut tx, numbering).await?;

        let sql = format!(
            "INSERT INTO sales ({SALE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now()) \
             RETURNING {SALE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(sale.id)
            .bind(&invoice_number)
            .bind(sale.customer_id)
            .bind(sale.subtotal)
            .bind(sale.gst_total)
            .bind(sale.total)
            .bind(sale.payment_status)
            .bind(sale.sale_date)
            .bind(sale.created_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::DuplicateEntry(_) => {
                    DatabaseError::duplicate("Sale", "invoice number", &invoice_number)
                }
                other => other,
            })?;

        for item in items {
            let sql = format!(
                "INSERT INTO sale_items ({ITEM_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
            );
            sqlx::query(&sql)
                .bind(row.id)
                .bind(item.line_no)
                .bind(item.product_id)
                .bind(&item.product_name)
                .bind(item.quantity)
                .bind(item.rate)
                .bind(item.gst_rate)
                .bind(item.gst_amount)
                .bind(item.line_total)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!(invoice_number = %row.invoice_number, "Sale committed");
        Ok(row)
    }

    pub async fn get(&self, id: Uuid) -> Result<(SaleRow, Vec<SaleItemRow>), DatabaseError> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = $1");
        let sale = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Sale", id))?;

        let sql = format!("SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = $1 ORDER BY line_no");
        let items = sqlx::query_as::<_, SaleItemRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok((sale, items))
    }

    /// Lists sales newest first, each with its lines
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<(SaleRow, Vec<SaleItemRow>)>, DatabaseError> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY sale_date DESC, created_at DESC LIMIT $1"
        );
        let sales = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = sales.iter().map(|s| s.id).collect();
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = ANY($1) ORDER BY sale_id, line_no"
        );
        let mut items_by_sale: HashMap<Uuid, Vec<SaleItemRow>> = HashMap::new();
        for item in sqlx::query_as::<_, SaleItemRow>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?
        {
            items_by_sale.entry(item.sale_id).or_default().push(item);
        }

        Ok(sales
            .into_iter()
            .map(|sale| {
                let items = items_by_sale.remove(&sale.id).unwrap_or_default();
                (sale, items)
            })
            .collect())
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?)
    }
}

/// Allocates the next invoice number for the numbering's prefix
///
/// The counter row is created on first use, seeded so the first number is
/// one past the count of existing sales.
async fn allocate_invoice_number(
    conn: &mut PgConnection,
    numbering: &InvoiceNumbering,
) -> Result<String, DatabaseError> {
    let sequence: i64 = sqlx::query_scalar(
        "INSERT INTO invoice_sequences (prefix, last_value) \
         VALUES ($1, (SELECT COUNT(*) FROM sales) + 1) \
         ON CONFLICT (prefix) DO UPDATE SET last_value = invoice_sequences.last_value + 1 \
         RETURNING last_value",
    )
    .bind(numbering.prefix())
    .fetch_one(&mut *conn)
    .await?;
    Ok(numbering.format(sequence))
}

// ============================================================================
// Row types
// ============================================================================

/// A sale to insert; the invoice number is allocated on insert
#[derive(Debug, Clone)]
pub struct NewSale {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub subtotal: Decimal,
    pub gst_total: Decimal,
    pub total: Decimal,
    pub payment_status: DbPaymentStatus,
    pub sale_date: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

/// Database row for a sale
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SaleRow {
    pub id: Uuid,
    pub invoice_number: String,
    pub customer_id: Option<Uuid>,
    pub subtotal: Decimal,
    pub gst_total: Decimal,
    pub total: Decimal,
    pub payment_status: DbPaymentStatus,
    pub sale_date: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Database row for an invoice line
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SaleItemRow {
    pub sale_id: Uuid,
    pub line_no: i32,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i64,
    pub rate: Decimal,
    pub gst_rate: Decimal,
    pub gst_amount: Decimal,
    pub line_total: Decimal,
}
