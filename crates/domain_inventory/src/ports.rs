//! Inventory Domain Ports
//!
//! `CatalogPort` is everything the inventory domain needs from its store.
//! The PostgreSQL adapter lives in `infra_db`; an in-memory adapter is
//! provided behind the `mock` feature for tests.
//!
//! ```rust,ignore
//! let catalog: Arc<dyn CatalogPort> = Arc::new(PostgresBackOffice::new(pool));
//! let service = InventoryService::new(catalog);
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, ProductId};

use crate::product::{Product, ProductQuery, ProductUpdate};
use crate::stock::{InventoryTransaction, StockMovement};

/// Port for product catalog and stock operations
#[async_trait]
pub trait CatalogPort: DomainPort + HealthCheckable {
    // ========================================================================
    // Catalog
    // ========================================================================

    /// Inserts a new product
    ///
    /// Returns `PortError::Conflict` if the SKU is already taken.
    async fn create_product(&self, product: Product) -> Result<Product, PortError>;

    /// Retrieves a product by ID
    async fn get_product(&self, id: ProductId) -> Result<Product, PortError>;

    /// Lists products ordered by name
    async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>, PortError>;

    /// Applies a partial update and returns the new state
    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, PortError>;

    /// Removes a product; historical invoices keep their copied line values
    async fn delete_product(&self, id: ProductId) -> Result<(), PortError>;

    /// Resolves many products in one lookup
    ///
    /// Missing ids are simply absent from the result.
    async fn find_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, PortError>;

    // ========================================================================
    // Stock
    // ========================================================================

    /// Applies a movement and appends its audit record atomically
    ///
    /// Sale movements are conditional on `stock >= quantity`; when that fails
    /// the port returns `PortError::InsufficientStock` and writes nothing.
    async fn apply_stock_movement(
        &self,
        movement: StockMovement,
    ) -> Result<(Product, InventoryTransaction), PortError>;

    /// Lists audit records, newest first
    async fn list_inventory_transactions(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<InventoryTransaction>, PortError>;
}

/// In-memory implementation of CatalogPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;
    use core_kernel::HealthCheckResult;

    use crate::error::InventoryError;

    /// In-memory mock implementation of CatalogPort
    #[derive(Debug, Default)]
    pub struct MockCatalogPort {
        products: Arc<RwLock<HashMap<ProductId, Product>>>,
        transactions: Arc<RwLock<Vec<InventoryTransaction>>>,
    }

    impl MockCatalogPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with products for testing
        pub async fn with_products(products: Vec<Product>) -> Self {
            let port = Self::new();
            for product in products {
                port.products.write().await.insert(product.id, product);
            }
            port
        }
    }

    impl DomainPort for MockCatalogPort {}

    #[async_trait]
    impl HealthCheckable for MockCatalogPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-catalog-port", 0)
        }
    }

    #[async_trait]
    impl CatalogPort for MockCatalogPort {
        async fn create_product(&self, product: Product) -> Result<Product, PortError> {
            let mut products = self.products.write().await;
            if products.values().any(|p| p.sku == product.sku) {
                return Err(PortError::conflict(format!("SKU {} already exists", product.sku)));
            }
            products.insert(product.id, product.clone());
            Ok(product)
        }

        async fn get_product(&self, id: ProductId) -> Result<Product, PortError> {
            self.products
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Product", id))
        }

        async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>, PortError> {
            let products = self.products.read().await;
            let mut results: Vec<_> = products.values().filter(|p| query.matches(p)).cloned().collect();
            results.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(results)
        }

        async fn update_product(
            &self,
            id: ProductId,
            update: ProductUpdate,
        ) -> Result<Product, PortError> {
            let mut products = self.products.write().await;
            if let Some(sku) = &update.sku {
                if products.values().any(|p| p.id != id && &p.sku == sku) {
                    return Err(PortError::conflict(format!("SKU {} already exists", sku)));
                }
            }
            let product = products
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Product", id))?;
            product.apply_update(update);
            Ok(product.clone())
        }

        async fn delete_product(&self, id: ProductId) -> Result<(), PortError> {
            self.products
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Product", id))
        }

        async fn find_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, PortError> {
            let products = self.products.read().await;
            Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
        }

        async fn apply_stock_movement(
            &self,
            movement: StockMovement,
        ) -> Result<(Product, InventoryTransaction), PortError> {
            let mut products = self.products.write().await;
            let product = products
                .get_mut(&movement.product_id)
                .ok_or_else(|| PortError::not_found("Product", movement.product_id))?;

            product.apply_movement(&movement).map_err(|e| match e {
                InventoryError::InsufficientStock { product_id, requested } => {
                    PortError::InsufficientStock { product_id, requested }
                }
                other => PortError::validation(other.to_string()),
            })?;

            let transaction = movement.to_transaction(Utc::now());
            self.transactions.write().await.push(transaction.clone());
            Ok((product.clone(), transaction))
        }

        async fn list_inventory_transactions(
            &self,
            limit: Option<u32>,
        ) -> Result<Vec<InventoryTransaction>, PortError> {
            let transactions = self.transactions.read().await;
            let mut results: Vec<_> = transactions.iter().rev().cloned().collect();
            if let Some(limit) = limit {
                results.truncate(limit as usize);
            }
            Ok(results)
        }
    }
}
