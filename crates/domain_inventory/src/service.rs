//! Inventory application service
//!
//! Validates catalog and stock requests, then delegates to the `CatalogPort`.
//! The port performs the atomic check-and-update; the service only decides
//! what to ask for.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use core_kernel::{Money, ProductId, UserId};

use crate::error::InventoryError;
use crate::ports::CatalogPort;
use crate::product::{NewProduct, Product, ProductQuery, ProductUpdate};
use crate::stock::{InventoryTransaction, StockMovement, StockMovementType};

/// A stock movement as requested by a caller, before validation
#[derive(Debug, Clone)]
pub struct StockMovementRequest {
    pub movement_type: StockMovementType,
    pub quantity: i64,
    pub unit_cost: Option<Money>,
    pub note: Option<String>,
}

/// Service for catalog management and stock movements
#[derive(Clone)]
pub struct InventoryService {
    catalog: Arc<dyn CatalogPort>,
}

impl InventoryService {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self { catalog }
    }

    #[instrument(skip(self, request), fields(sku = %request.sku))]
    pub async fn create_product(&self, request: NewProduct) -> Result<Product, InventoryError> {
        let product = request.into_product()?;
        let created = self.catalog.create_product(product).await?;
        info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, InventoryError> {
        Ok(self.catalog.get_product(id).await?)
    }

    pub async fn list_products(&self, search: Option<String>) -> Result<Vec<Product>, InventoryError> {
        Ok(self.catalog.list_products(ProductQuery { search }).await?)
    }

    #[instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, InventoryError> {
        update.validate()?;
        Ok(self.catalog.update_product(id, update).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), InventoryError> {
        self.catalog.delete_product(id).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Adjusts stock directly and returns the updated product
    #[instrument(skip(self, request), fields(movement = %request.movement_type, quantity = request.quantity))]
    pub async fn adjust_stock(
        &self,
        product_id: ProductId,
        request: StockMovementRequest,
        actor: Option<UserId>,
    ) -> Result<Product, InventoryError> {
        let (product, _) = self.move_stock(product_id, request, actor).await?;
        Ok(product)
    }

    /// Records a stock movement and returns its audit record
    #[instrument(skip(self, request), fields(movement = %request.movement_type, quantity = request.quantity))]
    pub async fn log_transaction(
        &self,
        product_id: ProductId,
        request: StockMovementRequest,
        actor: Option<UserId>,
    ) -> Result<InventoryTransaction, InventoryError> {
        let (_, transaction) = self.move_stock(product_id, request, actor).await?;
        Ok(transaction)
    }

    pub async fn list_transactions(&self) -> Result<Vec<InventoryTransaction>, InventoryError> {
        Ok(self.catalog.list_inventory_transactions(None).await?)
    }

    async fn move_stock(
        &self,
        product_id: ProductId,
        request: StockMovementRequest,
        actor: Option<UserId>,
    ) -> Result<(Product, InventoryTransaction), InventoryError> {
        let movement = StockMovement::new(
            product_id,
            request.movement_type,
            request.quantity,
            request.unit_cost,
            request.note,
            actor,
        )?;

        match self.catalog.apply_stock_movement(movement).await {
            Ok((product, transaction)) => {
                info!(
                    product_id = %product.id,
                    stock = product.stock,
                    transaction_id = %transaction.id,
                    "Stock movement recorded"
                );
                Ok((product, transaction))
            }
            Err(e) => {
                let err = InventoryError::from(e);
                if matches!(err, InventoryError::InsufficientStock { .. }) {
                    warn!(product_id = %product_id, "Stock movement rejected: insufficient stock");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MockCatalogPort;
    use rust_decimal_macros::dec;

    fn seed_product(stock: i64) -> Product {
        NewProduct {
            name: "DAP 50kg".to_string(),
            sku: "DAP-50".to_string(),
            sale_price: Some(Money::new(dec!(1350))),
            stock: Some(stock),
            ..Default::default()
        }
        .into_product()
        .unwrap()
    }

    fn sale(quantity: i64) -> StockMovementRequest {
        StockMovementRequest {
            movement_type: StockMovementType::Sale,
            quantity,
            unit_cost: None,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_overdraw_rejected_without_mutation() {
        let product = seed_product(3);
        let port = Arc::new(MockCatalogPort::with_products(vec![product.clone()]).await);
        let service = InventoryService::new(port.clone());

        let result = service.adjust_stock(product.id, sale(5), None).await;
        assert!(matches!(result, Err(InventoryError::InsufficientStock { requested: 5, .. })));

        let unchanged = service.get_product(product.id).await.unwrap();
        assert_eq!(unchanged.stock, 3);
        assert!(service.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purchase_increments_and_logs() {
        let product = seed_product(3);
        let port = Arc::new(MockCatalogPort::with_products(vec![product.clone()]).await);
        let service = InventoryService::new(port);
        let actor = UserId::new();

        let transaction = service
            .log_transaction(
                product.id,
                StockMovementRequest {
                    movement_type: StockMovementType::Purchase,
                    quantity: 10,
                    unit_cost: Some(Money::new(dec!(1200))),
                    note: Some("Monsoon stock".to_string()),
                },
                Some(actor),
            )
            .await
            .unwrap();

        assert_eq!(transaction.quantity, 10);
        assert_eq!(transaction.created_by, Some(actor));
        assert_eq!(service.get_product(product.id).await.unwrap().stock, 13);
    }

    #[tokio::test]
    async fn test_adjust_unknown_product() {
        let service = InventoryService::new(Arc::new(MockCatalogPort::new()));
        let result = service.adjust_stock(ProductId::new(), sale(1), None).await;
        assert!(matches!(result, Err(InventoryError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_sku_conflict() {
        let service = InventoryService::new(Arc::new(MockCatalogPort::new()));
        let request = NewProduct {
            name: "Potash".to_string(),
            sku: "MOP-50".to_string(),
            ..Default::default()
        };
        service.create_product(request.clone()).await.unwrap();
        let result = service.create_product(request).await;
        assert!(matches!(result, Err(InventoryError::Conflict(_))));
    }
}
