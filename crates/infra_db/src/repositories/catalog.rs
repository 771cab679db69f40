//! Catalog repository
//!
//! Products and the inventory audit trail. Stock only changes through
//! in-place `stock = stock ± n` updates; the movement and its audit row are
//! written in one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repositories::types::DbStockMovementType;

const PRODUCT_COLUMNS: &str = "id, name, sku, category, unit, description, cost_price, sale_price, \
     gst_rate, stock, supplier_id, created_at, updated_at";

const TRANSACTION_COLUMNS: &str =
    "id, product_id, movement_type, quantity, unit_cost, note, created_by, transaction_date";

/// Repository for products and inventory transactions
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a product
    ///
    /// # Errors
    ///
    /// `DatabaseError::DuplicateEntry` when the SKU is taken
    pub async fn insert(&self, product: &ProductRow) -> Result<ProductRow, DatabaseError> {
        let sql = format!(
            "INSERT INTO products ({PRODUCT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.sku)
            .bind(&product.category)
            .bind(&product.unit)
            .bind(&product.description)
            .bind(product.cost_price)
            .bind(product.sale_price)
            .bind(product.gst_rate)
            .bind(product.stock)
            .bind(product.supplier_id)
            .bind(product.created_at)
            .bind(product.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| sku_conflict(e, &product.sku))
    }

    pub async fn get(&self, id: Uuid) -> Result<ProductRow, DatabaseError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Product", id))
    }

    /// Lists products ordered by name, optionally filtered by a
    /// case-insensitive substring of the name
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<ProductRow>, DatabaseError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE $1::text IS NULL OR strpos(lower(name), lower($1)) > 0 \
             ORDER BY name"
        );
        Ok(sqlx::query_as::<_, ProductRow>(&sql)
            .bind(search)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Applies the non-null fields of `changes`
    pub async fn update(&self, id: Uuid, changes: &ProductChanges) -> Result<ProductRow, DatabaseError> {
        let sql = format!(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 sku = COALESCE($3, sku), \
                 category = COALESCE($4, category), \
                 unit = COALESCE($5, unit), \
                 description = COALESCE($6, description), \
                 cost_price = COALESCE($7, cost_price), \
                 sale_price = COALESCE($8, sale_price), \
                 gst_rate = COALESCE($9, gst_rate), \
                 supplier_id = COALESCE($10, supplier_id), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let sku = changes.sku.clone().unwrap_or_default();
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.sku)
            .bind(&changes.category)
            .bind(&changes.unit)
            .bind(&changes.description)
            .bind(changes.cost_price)
            .bind(changes.sale_price)
            .bind(changes.gst_rate)
            .bind(changes.supplier_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| sku_conflict(e, &sku))?
            .ok_or_else(|| DatabaseError::not_found("Product", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Product", id));
        }
        Ok(())
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ProductRow>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
        Ok(sqlx::query_as::<_, ProductRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Applies a stock delta and appends its audit row atomically
    ///
    /// Sale movements only match while `stock >= quantity`.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::NotFound` if the product does not exist
    /// - `DatabaseError::InsufficientStock` if a sale would overdraw
    pub async fn apply_movement(
        &self,
        movement: &NewInventoryTransaction,
    ) -> Result<(ProductRow, InventoryTransactionRow), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let product = if movement.movement_type == DbStockMovementType::Sale {
            decrement_stock(&mut tx, movement.product_id, movement.quantity, true).await?
        } else {
            increment_stock(&mut tx, movement.product_id, movement.quantity).await?
        };

        let sql = format!(
            "INSERT INTO inventory_transactions \
                 (id, product_id, movement_type, quantity, unit_cost, note, created_by, transaction_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, now()) \
             RETURNING {TRANSACTION_COLUMNS}"
        );
        let transaction = sqlx::query_as::<_, InventoryTransactionRow>(&sql)
            .bind(movement.id)
            .bind(movement.product_id)
            .bind(movement.movement_type)
            .bind(movement.quantity)
            .bind(movement.unit_cost)
            .bind(&movement.note)
            .bind(movement.created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(product_id = %movement.product_id, stock = product.stock, "Stock movement applied");
        Ok((product, transaction))
    }

    /// Lists inventory transactions newest first
    pub async fn list_transactions(&self, limit: Option<i64>) -> Result<Vec<InventoryTransactionRow>, DatabaseError> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM inventory_transactions \
             ORDER BY transaction_date DESC LIMIT $1"
        );
        Ok(sqlx::query_as::<_, InventoryTransactionRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }
}

/// Adds to a product's stock in place
pub(crate) async fn increment_stock(
    conn: &mut PgConnection,
    product_id: Uuid,
    quantity: i64,
) -> Result<ProductRow, DatabaseError> {
    let sql = format!(
        "UPDATE products SET stock = stock + $2, updated_at = now() \
         WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    );
    sqlx::query_as::<_, ProductRow>(&sql)
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Product", product_id))
}

/// Removes from a product's stock in place
///
/// With `enforce_floor` the update only matches while `stock >= quantity`;
/// a miss is then told apart from a missing product.
pub(crate) async fn decrement_stock(
    conn: &mut PgConnection,
    product_id: Uuid,
    quantity: i64,
    enforce_floor: bool,
) -> Result<ProductRow, DatabaseError> {
    let sql = format!(
        "UPDATE products SET stock = stock - $2, updated_at = now() \
         WHERE id = $1 AND (NOT $3 OR stock >= $2) RETURNING {PRODUCT_COLUMNS}"
    );
    let updated = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(product_id)
        .bind(quantity)
        .bind(enforce_floor)
        .fetch_optional(&mut *conn)
        .await?;

    match updated {
        Some(row) => Ok(row),
        None => {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&mut *conn)
                .await?;
            if exists {
                Err(DatabaseError::InsufficientStock {
                    product_id: product_id.to_string(),
                    requested: quantity,
                })
            } else {
                Err(DatabaseError::not_found("Product", product_id))
            }
        }
    }
}

fn sku_conflict(error: sqlx::Error, sku: &str) -> DatabaseError {
    match DatabaseError::from(error) {
        DatabaseError::DuplicateEntry(_) => DatabaseError::duplicate("Product", "sku", sku),
        other => other,
    }
}

// ============================================================================
// Row types
// ============================================================================

/// Database row for a product
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub unit: String,
    pub description: Option<String>,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    pub gst_rate: Decimal,
    pub stock: i64,
    pub supplier_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog fields to overwrite; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub cost_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub gst_rate: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
}

/// Input for a stock movement
#[derive(Debug, Clone)]
pub struct NewInventoryTransaction {
    pub id: Uuid,
    pub product_id: Uuid,
    pub movement_type: DbStockMovementType,
    pub quantity: i64,
    pub unit_cost: Decimal,
    pub note: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Database row for an inventory transaction
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InventoryTransactionRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub movement_type: DbStockMovementType,
    pub quantity: i64,
    pub unit_cost: Decimal,
    pub note: Option<String>,
    pub created_by: Option<Uuid>,
    pub transaction_date: DateTime<Utc>,
}
