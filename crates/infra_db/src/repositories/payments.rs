//! Payments repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repositories::party::apply_balance_delta;
use crate::repositories::types::{DbCounterpartyKind, DbPaymentDirection, DbPaymentMethod};

const PAYMENT_COLUMNS: &str = "id, direction, counterparty_kind, counterparty_id, method, amount, \
     reference, notes, payment_date, created_by, created_at";

/// Repository for payments
#[derive(Debug, Clone)]
pub struct PaymentsRepository {
    pool: PgPool,
}

impl PaymentsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a payment and applies `balance_delta` to its counterparty
    /// in one transaction
    ///
    /// # Errors
    ///
    /// `DatabaseError::NotFound` if the counterparty does not exist; no
    /// payment row is written in that case.
    pub async fn post(&self, payment: &PaymentRow, balance_delta: Decimal) -> Result<PaymentRow, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        apply_balance_delta(&mut tx, payment.counterparty_kind, payment.counterparty_id, balance_delta).await?;

        let sql = format!(
            "INSERT INTO payments ({PAYMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {PAYMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(payment.id)
            .bind(payment.direction)
            .bind(payment.counterparty_kind)
            .bind(payment.counterparty_id)
            .bind(payment.method)
            .bind(payment.amount)
            .bind(&payment.reference)
            .bind(&payment.notes)
            .bind(payment.payment_date)
            .bind(payment.created_by)
            .bind(payment.created_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Lists payments by payment date, newest first
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<PaymentRow>, DatabaseError> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             ORDER BY payment_date DESC, created_at DESC LIMIT $1"
        );
        Ok(sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }
}

/// Database row for a payment
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub direction: DbPaymentDirection,
    pub counterparty_kind: DbCounterpartyKind,
    pub counterparty_id: Uuid,
    pub method: DbPaymentMethod,
    pub amount: Decimal,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
