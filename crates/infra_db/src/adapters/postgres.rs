//! PostgreSQL adapter for all back-office ports

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    CustomerId, DomainPort, HealthCheckResult, HealthCheckable, Money, PortError,
    ProductId, SaleId, SupplierId,
};
use domain_billing::{
    EntityCounts, LedgerTotals, MonthlySales, Payment, PaymentTotal, PaymentsPort,
    PendingAggregate, PostingOptions, ReportsPort, Sale, SaleDraft, SalesPort,
};
use domain_inventory::{
    CatalogPort, InventoryTransaction, OversellPolicy, Product, ProductQuery, ProductUpdate,
    StockMovement,
};
use domain_party::{Customer, CustomerUpdate, PartyPort, Supplier, SupplierUpdate};

use crate::adapters::mapping::*;
use crate::repositories::reports::LedgerRow;
use crate::repositories::{
    CatalogRepository, PartyRepository, PaymentsRepository, ReportsRepository, SalesRepository,
};

const ADAPTER_ID: &str = "postgres-back-office";

/// PostgreSQL-backed implementation of every back-office port
///
/// Postings (`post_sale`, `post_payment`, `apply_stock_movement`) each run
/// in a single database transaction.
#[derive(Debug, Clone)]
pub struct PostgresBackOffice {
    pool: PgPool,
    catalog: CatalogRepository,
    parties: PartyRepository,
    sales: SalesRepository,
    payments: PaymentsRepository,
    reports: ReportsRepository,
}

impl PostgresBackOffice {
    pub fn new(pool: PgPool) -> Self {
        Self {
            catalog: CatalogRepository::new(pool.clone()),
            parties: PartyRepository::new(pool.clone()),
            sales: SalesRepository::new(pool.clone()),
            payments: PaymentsRepository::new(pool.clone()),
            reports: ReportsRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn uuids<T: Copy>(ids: &[T], as_uuid: impl Fn(T) -> Uuid) -> Vec<Uuid> {
    ids.iter().copied().map(as_uuid).collect()
}

fn limit(limit: Option<u32>) -> Option<i64> {
    limit.map(i64::from)
}

fn ledger_totals(row: LedgerRow) -> LedgerTotals {
    LedgerTotals {
        billed: Money::new(row.billed),
        received: Money::new(row.received),
        paid_out: Money::new(row.paid_out),
    }
}

impl DomainPort for PostgresBackOffice {}

#[async_trait]
impl HealthCheckable for PostgresBackOffice {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e)),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[async_trait]
impl CatalogPort for PostgresBackOffice {
    #[instrument(skip(self, product), fields(sku = %product.sku))]
    async fn create_product(&self, product: Product) -> Result<Product, PortError> {
        let row = self.catalog.insert(&product_to_row(&product)).await?;
        row_to_product(row)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, PortError> {
        row_to_product(self.catalog.get(*id.as_uuid()).await?)
    }

    async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>, PortError> {
        rows_to_products(self.catalog.list(query.search.as_deref()).await?)
    }

    #[instrument(skip(self, update), fields(product_id = %id))]
    async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, PortError> {
        let row = self.catalog.update(*id.as_uuid(), &product_changes(update)).await?;
        row_to_product(row)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), PortError> {
        Ok(self.catalog.delete(*id.as_uuid()).await?)
    }

    async fn find_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, PortError> {
        let ids = uuids(ids, |id| *id.as_uuid());
        rows_to_products(self.catalog.find_by_ids(&ids).await?)
    }

    #[instrument(skip(self, movement), fields(product_id = %movement.product_id))]
    async fn apply_stock_movement(
        &self,
        movement: StockMovement,
    ) -> Result<(Product, InventoryTransaction), PortError> {
        let (product, transaction) = self.catalog.apply_movement(&movement_to_row(&movement)).await?;
        Ok((row_to_product(product)?, row_to_transaction(transaction)))
    }

    async fn list_inventory_transactions(
        &self,
        limit_to: Option<u32>,
    ) -> Result<Vec<InventoryTransaction>, PortError> {
        let rows = self.catalog.list_transactions(limit(limit_to)).await?;
        Ok(rows.into_iter().map(row_to_transaction).collect())
    }
}

// ============================================================================
// Parties
// ============================================================================

#[async_trait]
impl PartyPort for PostgresBackOffice {
    async fn create_customer(&self, customer: Customer) -> Result<Customer, PortError> {
        Ok(row_to_customer(self.parties.insert_customer(&customer_to_row(&customer)).await?))
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Customer, PortError> {
        Ok(row_to_customer(self.parties.get_customer(*id.as_uuid()).await?))
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, PortError> {
        Ok(self
            .parties
            .list_customers()
            .await?
            .into_iter()
            .map(row_to_customer)
            .collect())
    }

    async fn update_customer(&self, id: CustomerId, update: CustomerUpdate) -> Result<Customer, PortError> {
        let row = self
            .parties
            .update_customer(*id.as_uuid(), &customer_changes(update))
            .await?;
        Ok(row_to_customer(row))
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), PortError> {
        Ok(self.parties.delete_customer(*id.as_uuid()).await?)
    }

    async fn find_customers_by_ids(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, PortError> {
        let ids = uuids(ids, |id| *id.as_uuid());
        Ok(self
            .parties
            .find_customers_by_ids(&ids)
            .await?
            .into_iter()
            .map(row_to_customer)
            .collect())
    }

    async fn create_supplier(&self, supplier: Supplier) -> Result<Supplier, PortError> {
        Ok(row_to_supplier(self.parties.insert_supplier(&supplier_to_row(&supplier)).await?))
    }

    async fn get_supplier(&self, id: SupplierId) -> Result<Supplier, PortError> {
        Ok(row_to_supplier(self.parties.get_supplier(*id.as_uuid()).await?))
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, PortError> {
        Ok(self
            .parties
            .list_suppliers()
            .await?
            .into_iter()
            .map(row_to_supplier)
            .collect())
    }

    async fn update_supplier(&self, id: SupplierId, update: SupplierUpdate) -> Result<Supplier, PortError> {
        let row = self
            .parties
            .update_supplier(*id.as_uuid(), &supplier_changes(update))
            .await?;
        Ok(row_to_supplier(row))
    }

    async fn delete_supplier(&self, id: SupplierId) -> Result<(), PortError> {
        Ok(self.parties.delete_supplier(*id.as_uuid()).await?)
    }

    async fn find_suppliers_by_ids(&self, ids: &[SupplierId]) -> Result<Vec<Supplier>, PortError> {
        let ids = uuids(ids, |id| *id.as_uuid());
        Ok(self
            .parties
            .find_suppliers_by_ids(&ids)
            .await?
            .into_iter()
            .map(row_to_supplier)
            .collect())
    }
}

// ============================================================================
// Sales
// ============================================================================

#[async_trait]
impl SalesPort for PostgresBackOffice {
    #[instrument(skip(self, draft, options), fields(lines = draft.items.len()))]
    async fn post_sale(&self, draft: SaleDraft, options: &PostingOptions) -> Result<Sale, PortError> {
        let id = SaleId::new_v7();
        let (new_sale, items) = draft_to_rows(id, &draft);
        let decrements: Vec<(Uuid, i64)> = draft
            .stock_decrements()
            .iter()
            .map(|(product_id, quantity)| (*product_id.as_uuid(), *quantity))
            .collect();
        let enforce_floor = options.oversell == OversellPolicy::Reject;

        let row = self
            .sales
            .post_sale(&new_sale, &items, &decrements, &options.numbering, enforce_floor)
            .await?;
        debug!(invoice_number = %row.invoice_number, "Sale persisted");

        Ok(draft.into_sale(id, row.invoice_number, row.created_at))
    }

    async fn get_sale(&self, id: SaleId) -> Result<Sale, PortError> {
        let (row, items) = self.sales.get(*id.as_uuid()).await?;
        rows_to_sale(row, items)
    }

    async fn list_sales(&self, limit_to: Option<u32>) -> Result<Vec<Sale>, PortError> {
        self.sales
            .list(limit(limit_to))
            .await?
            .into_iter()
            .map(|(row, items)| rows_to_sale(row, items))
            .collect()
    }

    async fn count_sales(&self) -> Result<i64, PortError> {
        Ok(self.sales.count().await?)
    }
}

// ============================================================================
// Payments
// ============================================================================

#[async_trait]
impl PaymentsPort for PostgresBackOffice {
    #[instrument(skip(self, payment), fields(counterparty = %payment.counterparty))]
    async fn post_payment(&self, payment: Payment) -> Result<Payment, PortError> {
        let row = self
            .payments
            .post(&payment_to_row(&payment), payment.balance_delta().amount())
            .await?;
        Ok(row_to_payment(row))
    }

    async fn list_payments(&self, limit_to: Option<u32>) -> Result<Vec<Payment>, PortError> {
        Ok(self
            .payments
            .list(limit(limit_to))
            .await?
            .into_iter()
            .map(row_to_payment)
            .collect())
    }
}

// ============================================================================
// Reports
// ============================================================================

#[async_trait]
impl ReportsPort for PostgresBackOffice {
    async fn entity_counts(&self) -> Result<EntityCounts, PortError> {
        let row = self.reports.entity_counts().await?;
        Ok(EntityCounts {
            products: row.products,
            sales: row.sales,
            customers: row.customers,
            suppliers: row.suppliers,
        })
    }

    async fn low_stock_products(&self, threshold: i64, limit_to: u32) -> Result<Vec<Product>, PortError> {
        rows_to_products(self.reports.low_stock(threshold, i64::from(limit_to)).await?)
    }

    async fn pending_by_customer(&self) -> Result<Vec<PendingAggregate>, PortError> {
        Ok(self
            .reports
            .pending_by_customer()
            .await?
            .into_iter()
            .map(|row| PendingAggregate {
                customer_id: CustomerId::from_uuid(row.customer_id),
                total_pending: Money::new(row.total_pending),
                invoice_count: row.invoice_count,
            })
            .collect())
    }

    async fn sales_total(&self) -> Result<Money, PortError> {
        Ok(Money::new(self.reports.sales_total().await?))
    }

    async fn payment_totals(&self) -> Result<Vec<PaymentTotal>, PortError> {
        Ok(self
            .reports
            .payment_totals()
            .await?
            .into_iter()
            .map(|row| PaymentTotal {
                direction: row.direction.into(),
                total: Money::new(row.total),
            })
            .collect())
    }

    async fn monthly_sales(&self, limit_to: u32) -> Result<Vec<MonthlySales>, PortError> {
        Ok(self
            .reports
            .monthly_sales(i64::from(limit_to))
            .await?
            .into_iter()
            .map(|row| MonthlySales {
                year: row.year,
                month: row.month as u32,
                total: Money::new(row.total),
            })
            .collect())
    }

    async fn customer_ledger_totals(&self, id: CustomerId) -> Result<LedgerTotals, PortError> {
        Ok(ledger_totals(self.reports.customer_ledger(*id.as_uuid()).await?))
    }

    async fn supplier_ledger_totals(&self, id: SupplierId) -> Result<LedgerTotals, PortError> {
        Ok(ledger_totals(self.reports.supplier_ledger(*id.as_uuid()).await?))
    }
}
