//! Party repository implementation
//!
//! Customers and suppliers. Balances are read here but only written by the
//! posting repositories, always as `balance = balance + $delta`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repositories::types::DbCounterpartyKind;

const CUSTOMER_COLUMNS: &str =
    "id, name, email, phone, address, gst_number, outstanding_balance, tags, created_at, updated_at";

const SUPPLIER_COLUMNS: &str = "id, name, contact_person, email, phone, address, gst_number, \
     account_balance, notes, created_at, updated_at";

/// Repository for customers and suppliers
#[derive(Debug, Clone)]
pub struct PartyRepository {
    pool: PgPool,
}

impl PartyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------------
    // Customers
    // ------------------------------------------------------------------------

    pub async fn insert_customer(&self, customer: &CustomerRow) -> Result<CustomerRow, DatabaseError> {
        let sql = format!(
            "INSERT INTO customers ({CUSTOMER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(customer.id)
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(&customer.phone)
            .bind(&customer.address)
            .bind(&customer.gst_number)
            .bind(customer.outstanding_balance)
            .bind(&customer.tags)
            .bind(customer.created_at)
            .bind(customer.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<CustomerRow, DatabaseError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Customer", id))
    }

    pub async fn list_customers(&self) -> Result<Vec<CustomerRow>, DatabaseError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name");
        Ok(sqlx::query_as::<_, CustomerRow>(&sql).fetch_all(&self.pool).await?)
    }

    /// Applies the non-null fields of `changes`; the balance is untouched
    pub async fn update_customer(
        &self,
        id: Uuid,
        changes: &CustomerChanges,
    ) -> Result<CustomerRow, DatabaseError> {
        let sql = format!(
            "UPDATE customers SET \
                 name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 phone = COALESCE($4, phone), \
                 address = COALESCE($5, address), \
                 gst_number = COALESCE($6, gst_number), \
                 tags = COALESCE($7, tags), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.email)
            .bind(&changes.phone)
            .bind(&changes.address)
            .bind(&changes.gst_number)
            .bind(&changes.tags)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Customer", id))
    }

    pub async fn delete_customer(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Customer", id));
        }
        Ok(())
    }

    pub async fn find_customers_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CustomerRow>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ANY($1)");
        Ok(sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    // ------------------------------------------------------------------------
    // Suppliers
    // ------------------------------------------------------------------------

    pub async fn insert_supplier(&self, supplier: &SupplierRow) -> Result<SupplierRow, DatabaseError> {
        let sql = format!(
            "INSERT INTO suppliers ({SUPPLIER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {SUPPLIER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, SupplierRow>(&sql)
            .bind(supplier.id)
            .bind(&supplier.name)
            .bind(&supplier.contact_person)
            .bind(&supplier.email)
            .bind(&supplier.phone)
            .bind(&supplier.address)
            .bind(&supplier.gst_number)
            .bind(supplier.account_balance)
            .bind(&supplier.notes)
            .bind(supplier.created_at)
            .bind(supplier.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn get_supplier(&self, id: Uuid) -> Result<SupplierRow, DatabaseError> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1");
        sqlx::query_as::<_, SupplierRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Supplier", id))
    }

    pub async fn list_suppliers(&self) -> Result<Vec<SupplierRow>, DatabaseError> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY name");
        Ok(sqlx::query_as::<_, SupplierRow>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn update_supplier(
        &self,
        id: Uuid,
        changes: &SupplierChanges,
    ) -> Result<SupplierRow, DatabaseError> {
        let sql = format!(
            "UPDATE suppliers SET \
                 name = COALESCE($2, name), \
                 contact_person = COALESCE($3, contact_person), \
                 email = COALESCE($4, email), \
                 phone = COALESCE($5, phone), \
                 address = COALESCE($6, address), \
                 gst_number = COALESCE($7, gst_number), \
                 notes = COALESCE($8, notes), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {SUPPLIER_COLUMNS}"
        );
        sqlx::query_as::<_, SupplierRow>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.contact_person)
            .bind(&changes.email)
            .bind(&changes.phone)
            .bind(&changes.address)
            .bind(&changes.gst_number)
            .bind(&changes.notes)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Supplier", id))
    }

    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Supplier", id));
        }
        Ok(())
    }

    pub async fn find_suppliers_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SupplierRow>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ANY($1)");
        Ok(sqlx::query_as::<_, SupplierRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }
}

/// Adds `delta` to a customer's or supplier's running balance in place
///
/// # Errors
///
/// `DatabaseError::NotFound` when no such counterparty exists
pub(crate) async fn apply_balance_delta(
    conn: &mut PgConnection,
    kind: DbCounterpartyKind,
    id: Uuid,
    delta: Decimal,
) -> Result<(), DatabaseError> {
    let (sql, entity) = match kind {
        DbCounterpartyKind::Customer => (
            "UPDATE customers SET outstanding_balance = outstanding_balance + $1, updated_at = now() \
             WHERE id = $2",
            "Customer",
        ),
        DbCounterpartyKind::Supplier => (
            "UPDATE suppliers SET account_balance = account_balance + $1, updated_at = now() \
             WHERE id = $2",
            "Supplier",
        ),
    };
    let result = sqlx::query(sql)
        .bind(delta)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found(entity, id));
    }
    Ok(())
}

// ============================================================================
// Row types
// ============================================================================

/// Database row for a customer
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub outstanding_balance: Decimal,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact fields to overwrite on a customer
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Database row for a supplier
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SupplierRow {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub account_balance: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact fields to overwrite on a supplier
#[derive(Debug, Clone, Default)]
pub struct SupplierChanges {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub notes: Option<String>,
}
