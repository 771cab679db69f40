//! Read-only aggregate queries

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repositories::catalog::ProductRow;
use crate::repositories::types::DbPaymentDirection;

/// Repository for dashboard, report and reconciliation queries
#[derive(Debug, Clone)]
pub struct ReportsRepository {
    pool: PgPool,
}

impl ReportsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn entity_counts(&self) -> Result<EntityCountsRow, DatabaseError> {
        Ok(sqlx::query_as::<_, EntityCountsRow>(
            "SELECT \
                 (SELECT COUNT(*) FROM products) AS products, \
                 (SELECT COUNT(*) FROM sales) AS sales, \
                 (SELECT COUNT(*) FROM customers) AS customers, \
                 (SELECT COUNT(*) FROM suppliers) AS suppliers",
        )
        .fetch_one(&self.pool)
        .await?)
    }

    /// Products with `stock < threshold`, lowest stock first
    pub async fn low_stock(&self, threshold: i64, limit: i64) -> Result<Vec<ProductRow>, DatabaseError> {
        Ok(sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, sku, category, unit, description, cost_price, sale_price, \
                    gst_rate, stock, supplier_id, created_at, updated_at \
             FROM products WHERE stock < $1 ORDER BY stock, name LIMIT $2",
        )
        .bind(threshold)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Pending and partial invoice totals per customer, largest first
    pub async fn pending_by_customer(&self) -> Result<Vec<PendingRow>, DatabaseError> {
        Ok(sqlx::query_as::<_, PendingRow>(
            "SELECT customer_id, SUM(total) AS total_pending, COUNT(*) AS invoice_count \
             FROM sales \
             WHERE customer_id IS NOT NULL AND payment_status IN ('pending', 'partial') \
             GROUP BY customer_id \
             ORDER BY total_pending DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn sales_total(&self) -> Result<Decimal, DatabaseError> {
        Ok(sqlx::query_scalar("SELECT COALESCE(SUM(total), 0) FROM sales")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Payment totals per direction, in enum order
    pub async fn payment_totals(&self) -> Result<Vec<PaymentTotalRow>, DatabaseError> {
        Ok(sqlx::query_as::<_, PaymentTotalRow>(
            "SELECT direction, SUM(amount) AS total FROM payments GROUP BY direction ORDER BY direction",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Sales totals per UTC calendar month, oldest first
    pub async fn monthly_sales(&self, limit: i64) -> Result<Vec<MonthlySalesRow>, DatabaseError> {
        Ok(sqlx::query_as::<_, MonthlySalesRow>(
            "SELECT EXTRACT(YEAR FROM sale_date AT TIME ZONE 'UTC')::int AS year, \
                    EXTRACT(MONTH FROM sale_date AT TIME ZONE 'UTC')::int AS month, \
                    SUM(total) AS total \
             FROM sales \
             GROUP BY 1, 2 \
             ORDER BY 1, 2 \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Billed, received and paid-out totals for a customer
    pub async fn customer_ledger(&self, customer_id: Uuid) -> Result<LedgerRow, DatabaseError> {
        Ok(sqlx::query_as::<_, LedgerRow>(
            "SELECT \
                 (SELECT COALESCE(SUM(total), 0) FROM sales WHERE customer_id = $1) AS billed, \
                 (SELECT COALESCE(SUM(amount), 0) FROM payments \
                     WHERE counterparty_kind = 'customer' AND counterparty_id = $1 \
                       AND direction = 'incoming') AS received, \
                 (SELECT COALESCE(SUM(amount), 0) FROM payments \
                     WHERE counterparty_kind = 'customer' AND counterparty_id = $1 \
                       AND direction = 'outgoing') AS paid_out",
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?)
    }

    /// Received and paid-out totals for a supplier; `billed` is always zero
    pub async fn supplier_ledger(&self, supplier_id: Uuid) -> Result<LedgerRow, DatabaseError> {
        Ok(sqlx::query_as::<_, LedgerRow>(
            "SELECT \
                 0::numeric AS billed, \
                 (SELECT COALESCE(SUM(amount), 0) FROM payments \
                     WHERE counterparty_kind = 'supplier' AND counterparty_id = $1 \
                       AND direction = 'incoming') AS received, \
                 (SELECT COALESCE(SUM(amount), 0) FROM payments \
                     WHERE counterparty_kind = 'supplier' AND counterparty_id = $1 \
                       AND direction = 'outgoing') AS paid_out",
        )
        .bind(supplier_id)
        .fetch_one(&self.pool)
        .await?)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct EntityCountsRow {
    pub products: i64,
    pub sales: i64,
    pub customers: i64,
    pub suppliers: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingRow {
    pub customer_id: Uuid,
    pub total_pending: Decimal,
    pub invoice_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentTotalRow {
    pub direction: DbPaymentDirection,
    pub total: Decimal,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthlySalesRow {
    pub year: i32,
    pub month: i32,
    pub total: Decimal,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LedgerRow {
    pub billed: Decimal,
    pub received: Decimal,
    pub paid_out: Decimal,
}
