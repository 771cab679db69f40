//! In-memory back-office store for testing
//!
//! Implements every port over a single `RwLock`-guarded state. A posting
//! takes the write lock, stages all changes on copies, and only writes
//! them back once every check has passed, which gives the same
//! all-or-nothing behaviour as the database transaction in `infra_db`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use tokio::sync::RwLock;

use core_kernel::{
    CustomerId, DomainPort, HealthCheckResult, HealthCheckable, Money, PortError,
    ProductId, SaleId, SupplierId,
};
use domain_inventory::{
    CatalogPort, InventoryError, InventoryTransaction, Product, ProductQuery, ProductUpdate,
    StockMovement,
};
use domain_party::{Counterparty, Customer, CustomerUpdate, PartyPort, Supplier, SupplierUpdate};

use crate::invoice::{Sale, SaleDraft};
use crate::ledger::LedgerTotals;
use crate::payment::{Payment, PaymentDirection};
use crate::ports::{PaymentsPort, PostingOptions, ReportsPort, SalesPort};
use crate::reports::{EntityCounts, MonthlySales, PaymentTotal, PendingAggregate};

#[derive(Debug, Default)]
struct State {
    products: HashMap<ProductId, Product>,
    inventory: Vec<InventoryTransaction>,
    customers: HashMap<CustomerId, Customer>,
    suppliers: HashMap<SupplierId, Supplier>,
    sales: Vec<Sale>,
    payments: Vec<Payment>,
    /// Last allocated sequence value per invoice prefix
    invoice_sequences: HashMap<String, i64>,
}

/// In-memory implementation of all back-office ports
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackOffice {
    state: Arc<RwLock<State>>,
}

impl InMemoryBackOffice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites a stored customer balance, bypassing the posting paths
    ///
    /// Only useful for exercising reconciliation drift.
    pub async fn overwrite_customer_balance(&self, id: CustomerId, balance: Money) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        let customer = state
            .customers
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Customer", id))?;
        customer.outstanding_balance = balance;
        Ok(())
    }
}

fn inventory_to_port(err: InventoryError) -> PortError {
    match err {
        InventoryError::InsufficientStock { product_id, requested } => {
            PortError::InsufficientStock { product_id, requested }
        }
        other => PortError::validation(other.to_string()),
    }
}

fn newest_sales_first(sales: &mut [Sale]) {
    sales.sort_by(|a, b| {
        b.sale_date
            .cmp(&a.sale_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

fn apply_limit<T>(mut items: Vec<T>, limit: Option<u32>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit as usize);
    }
    items
}

impl DomainPort for InMemoryBackOffice {}

#[async_trait]
impl HealthCheckable for InMemoryBackOffice {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("in-memory-back-office", 0)
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[async_trait]
impl CatalogPort for InMemoryBackOffice {
    async fn create_product(&self, product: Product) -> Result<Product, PortError> {
        let mut state = self.state.write().await;
        if state.products.values().any(|p| p.sku == product.sku) {
            return Err(PortError::conflict(format!("SKU {} already exists", product.sku)));
        }
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, PortError> {
        self.state
            .read()
            .await
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Product", id))
    }

    async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>, PortError> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state.products.values().filter(|p| query.matches(p)).cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, PortError> {
        let mut state = self.state.write().await;
        if let Some(sku) = &update.sku {
            if state.products.values().any(|p| p.id != id && &p.sku == sku) {
                return Err(PortError::conflict(format!("SKU {} already exists", sku)));
            }
        }
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Product", id))?;
        product.apply_update(update);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), PortError> {
        self.state
            .write()
            .await
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Product", id))
    }

    async fn find_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, PortError> {
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.products.get(id).cloned()).collect())
    }

    async fn apply_stock_movement(
        &self,
        movement: StockMovement,
    ) -> Result<(Product, InventoryTransaction), PortError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let product = state
            .products
            .get_mut(&movement.product_id)
            .ok_or_else(|| PortError::not_found("Product", movement.product_id))?;
        product.apply_movement(&movement).map_err(inventory_to_port)?;

        let transaction = movement.to_transaction(Utc::now());
        state.inventory.push(transaction.clone());
        Ok((product.clone(), transaction))
    }

    async fn list_inventory_transactions(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<InventoryTransaction>, PortError> {
        let state = self.state.read().await;
        let mut transactions = state.inventory.clone();
        transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        Ok(apply_limit(transactions, limit))
    }
}

// ============================================================================
// Parties
// ============================================================================

#[async_trait]
impl PartyPort for InMemoryBackOffice {
    async fn create_customer(&self, customer: Customer) -> Result<Customer, PortError> {
        self.state.write().await.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Customer, PortError> {
        self.state
            .read()
            .await
            .customers
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Customer", id))
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, PortError> {
        let mut customers: Vec<_> = self.state.read().await.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn update_customer(&self, id: CustomerId, update: CustomerUpdate) -> Result<Customer, PortError> {
        let mut state = self.state.write().await;
        let customer = state
            .customers
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Customer", id))?;
        customer.apply_update(update);
        Ok(customer.clone())
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), PortError> {
        self.state
            .write()
            .await
            .customers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Customer", id))
    }

    async fn find_customers_by_ids(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, PortError> {
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.customers.get(id).cloned()).collect())
    }

    async fn create_supplier(&self, supplier: Supplier) -> Result<Supplier, PortError> {
        self.state.write().await.suppliers.insert(supplier.id, supplier.clone());
        Ok(supplier)
    }

    async fn get_supplier(&self, id: SupplierId) -> Result<Supplier, PortError> {
        self.state
            .read()
            .await
            .suppliers
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Supplier", id))
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, PortError> {
        let mut suppliers: Vec<_> = self.state.read().await.suppliers.values().cloned().collect();
        suppliers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(suppliers)
    }

    async fn update_supplier(&self, id: SupplierId, update: SupplierUpdate) -> Result<Supplier, PortError> {
        let mut state = self.state.write().await;
        let supplier = state
            .suppliers
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Supplier", id))?;
        supplier.apply_update(update);
        Ok(supplier.clone())
    }

    async fn delete_supplier(&self, id: SupplierId) -> Result<(), PortError> {
        self.state
            .write()
            .await
            .suppliers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Supplier", id))
    }

    async fn find_suppliers_by_ids(&self, ids: &[SupplierId]) -> Result<Vec<Supplier>, PortError> {
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.suppliers.get(id).cloned()).collect())
    }
}

// ============================================================================
// Sales
// ============================================================================

#[async_trait]
impl SalesPort for InMemoryBackOffice {
    async fn post_sale(&self, draft: SaleDraft, options: &PostingOptions) -> Result<Sale, PortError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        if let Some(customer_id) = draft.customer_id {
            if !state.customers.contains_key(&customer_id) {
                return Err(PortError::not_found("Customer", customer_id));
            }
        }

        // Stage stock changes; nothing is written until every line passes.
        let mut staged: Vec<Product> = Vec::new();
        for (&product_id, &quantity) in draft.stock_decrements() {
            let mut product = state
                .products
                .get(&product_id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Product", product_id))?;
            product
                .remove_for_sale(quantity, options.oversell)
                .map_err(inventory_to_port)?;
            staged.push(product);
        }

        let prefix = options.numbering.prefix().to_string();
        let sequence = state
            .invoice_sequences
            .get(&prefix)
            .copied()
            .unwrap_or(state.sales.len() as i64)
            + 1;
        let invoice_number = options.numbering.format(sequence);
        if state.sales.iter().any(|s| s.invoice_number == invoice_number) {
            return Err(PortError::conflict(format!(
                "invoice number {} already exists",
                invoice_number
            )));
        }

        state.invoice_sequences.insert(prefix, sequence);
        for product in staged {
            state.products.insert(product.id, product);
        }
        if let Some(customer_id) = draft.customer_id {
            if let Some(customer) = state.customers.get_mut(&customer_id) {
                customer.outstanding_balance += draft.total;
            }
        }

        let sale = draft.into_sale(SaleId::new_v7(), invoice_number, Utc::now());
        state.sales.push(sale.clone());
        Ok(sale)
    }

    async fn get_sale(&self, id: SaleId) -> Result<Sale, PortError> {
        self.state
            .read()
            .await
            .sales
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Sale", id))
    }

    async fn list_sales(&self, limit: Option<u32>) -> Result<Vec<Sale>, PortError> {
        let mut sales = self.state.read().await.sales.clone();
        newest_sales_first(&mut sales);
        Ok(apply_limit(sales, limit))
    }

    async fn count_sales(&self) -> Result<i64, PortError> {
        Ok(self.state.read().await.sales.len() as i64)
    }
}

// ============================================================================
// Payments
// ============================================================================

#[async_trait]
impl PaymentsPort for InMemoryBackOffice {
    async fn post_payment(&self, payment: Payment) -> Result<Payment, PortError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let delta = payment.balance_delta();

        match payment.counterparty {
            Counterparty::Customer(id) => {
                let customer = state
                    .customers
                    .get_mut(&id)
                    .ok_or_else(|| PortError::not_found("Customer", id))?;
                customer.outstanding_balance += delta;
            }
            Counterparty::Supplier(id) => {
                let supplier = state
                    .suppliers
                    .get_mut(&id)
                    .ok_or_else(|| PortError::not_found("Supplier", id))?;
                supplier.account_balance += delta;
            }
        }

        state.payments.push(payment.clone());
        Ok(payment)
    }

    async fn list_payments(&self, limit: Option<u32>) -> Result<Vec<Payment>, PortError> {
        let mut payments = self.state.read().await.payments.clone();
        payments.sort_by(|a, b| {
            b.payment_date
                .cmp(&a.payment_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(apply_limit(payments, limit))
    }
}

// ============================================================================
// Reports
// ============================================================================

#[async_trait]
impl ReportsPort for InMemoryBackOffice {
    async fn entity_counts(&self) -> Result<EntityCounts, PortError> {
        let state = self.state.read().await;
        Ok(EntityCounts {
            products: state.products.len() as i64,
            sales: state.sales.len() as i64,
            customers: state.customers.len() as i64,
            suppliers: state.suppliers.len() as i64,
        })
    }

    async fn low_stock_products(&self, threshold: i64, limit: u32) -> Result<Vec<Product>, PortError> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state
            .products
            .values()
            .filter(|p| p.is_low_stock(threshold))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));
        Ok(apply_limit(products, Some(limit)))
    }

    async fn pending_by_customer(&self) -> Result<Vec<PendingAggregate>, PortError> {
        let state = self.state.read().await;
        let mut grouped: HashMap<CustomerId, PendingAggregate> = HashMap::new();
        for sale in state.sales.iter().filter(|s| s.payment_status.is_open()) {
            if let Some(customer_id) = sale.customer_id {
                let entry = grouped.entry(customer_id).or_insert(PendingAggregate {
                    customer_id,
                    total_pending: Money::ZERO,
                    invoice_count: 0,
                });
                entry.total_pending += sale.total;
                entry.invoice_count += 1;
            }
        }
        let mut aggregates: Vec<_> = grouped.into_values().collect();
        aggregates.sort_by(|a, b| b.total_pending.cmp(&a.total_pending));
        Ok(aggregates)
    }

    async fn sales_total(&self) -> Result<Money, PortError> {
        Ok(self.state.read().await.sales.iter().map(|s| s.total).sum())
    }

    async fn payment_totals(&self) -> Result<Vec<PaymentTotal>, PortError> {
        let state = self.state.read().await;
        let mut totals = Vec::new();
        for direction in [PaymentDirection::Incoming, PaymentDirection::Outgoing] {
            let matching: Vec<Money> = state
                .payments
                .iter()
                .filter(|p| p.direction == direction)
                .map(|p| p.amount)
                .collect();
            if !matching.is_empty() {
                totals.push(PaymentTotal {
                    direction,
                    total: matching.into_iter().sum(),
                });
            }
        }
        Ok(totals)
    }

    async fn monthly_sales(&self, limit: u32) -> Result<Vec<MonthlySales>, PortError> {
        let state = self.state.read().await;
        let mut months: BTreeMap<(i32, u32), Money> = BTreeMap::new();
        for sale in &state.sales {
            let key = (sale.sale_date.year(), sale.sale_date.month());
            *months.entry(key).or_insert(Money::ZERO) += sale.total;
        }
        Ok(months
            .into_iter()
            .take(limit as usize)
            .map(|((year, month), total)| MonthlySales { year, month, total })
            .collect())
    }

    async fn customer_ledger_totals(&self, id: CustomerId) -> Result<LedgerTotals, PortError> {
        let state = self.state.read().await;
        let mut totals = LedgerTotals::default();
        for sale in state.sales.iter().filter(|s| s.customer_id == Some(id)) {
            totals.billed += sale.total;
        }
        for payment in state.payments.iter().filter(|p| p.counterparty == Counterparty::Customer(id)) {
            match payment.direction {
                PaymentDirection::Incoming => totals.received += payment.amount,
                PaymentDirection::Outgoing => totals.paid_out += payment.amount,
            }
        }
        Ok(totals)
    }

    async fn supplier_ledger_totals(&self, id: SupplierId) -> Result<LedgerTotals, PortError> {
        let state = self.state.read().await;
        let mut totals = LedgerTotals::default();
        for payment in state.payments.iter().filter(|p| p.counterparty == Counterparty::Supplier(id)) {
            match payment.direction {
                PaymentDirection::Incoming => totals.received += payment.amount,
                PaymentDirection::Outgoing => totals.paid_out += payment.amount,
            }
        }
        Ok(totals)
    }
}
