//! Party Domain Ports
//!
//! `PartyPort` covers customer and supplier records. Balances are read
//! through it but never written: only the invoice and payment posting
//! paths in `domain_billing` change them, inside their own transactions.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_party::ports::PartyPort;
//! use std::sync::Arc;
//!
//! pub struct PartyService {
//!     party_port: Arc<dyn PartyPort>,
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{CustomerId, DomainPort, HealthCheckable, PortError, SupplierId};

use crate::customer::{Customer, CustomerUpdate};
use crate::supplier::{Supplier, SupplierUpdate};

/// The main port trait for party domain operations
#[async_trait]
pub trait PartyPort: DomainPort + HealthCheckable {
    // ========================================================================
    // Customers
    // ========================================================================

    /// Inserts a new customer
    async fn create_customer(&self, customer: Customer) -> Result<Customer, PortError>;

    /// Retrieves a customer by ID, or `PortError::NotFound`
    async fn get_customer(&self, id: CustomerId) -> Result<Customer, PortError>;

    /// Lists customers ordered by name
    async fn list_customers(&self) -> Result<Vec<Customer>, PortError>;

    /// Updates contact details; never the balance
    async fn update_customer(
        &self,
        id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, PortError>;

    async fn delete_customer(&self, id: CustomerId) -> Result<(), PortError>;

    /// Resolves many customers in one lookup; missing ids are skipped
    async fn find_customers_by_ids(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, PortError>;

    // ========================================================================
    // Suppliers
    // ========================================================================

    /// Inserts a new supplier
    async fn create_supplier(&self, supplier: Supplier) -> Result<Supplier, PortError>;

    /// Retrieves a supplier by ID, or `PortError::NotFound`
    async fn get_supplier(&self, id: SupplierId) -> Result<Supplier, PortError>;

    /// Lists suppliers ordered by name
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, PortError>;

    /// Updates contact details; never the balance
    async fn update_supplier(
        &self,
        id: SupplierId,
        update: SupplierUpdate,
    ) -> Result<Supplier, PortError>;

    async fn delete_supplier(&self, id: SupplierId) -> Result<(), PortError>;

    /// Resolves many suppliers in one lookup; missing ids are skipped
    async fn find_suppliers_by_ids(&self, ids: &[SupplierId]) -> Result<Vec<Supplier>, PortError>;
}

/// Mock implementation of PartyPort for testing
///
/// Stores customers and suppliers in memory, useful for unit testing
/// without a database.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use core_kernel::HealthCheckResult;

    /// In-memory mock implementation of PartyPort
    #[derive(Debug, Default)]
    pub struct MockPartyPort {
        customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
        suppliers: Arc<RwLock<HashMap<SupplierId, Supplier>>>,
    }

    impl MockPartyPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with customers for testing
        pub async fn with_customers(customers: Vec<Customer>) -> Self {
            let port = Self::new();
            for customer in customers {
                port.customers.write().await.insert(customer.id, customer);
            }
            port
        }
    }

    impl DomainPort for MockPartyPort {}

    #[async_trait]
    impl HealthCheckable for MockPartyPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-party-port", 0)
        }
    }

    #[async_trait]
    impl PartyPort for MockPartyPort {
        async fn create_customer(&self, customer: Customer) -> Result<Customer, PortError> {
            self.customers.write().await.insert(customer.id, customer.clone());
            Ok(customer)
        }

        async fn get_customer(&self, id: CustomerId) -> Result<Customer, PortError> {
            self.customers
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Customer", id))
        }

        async fn list_customers(&self) -> Result<Vec<Customer>, PortError> {
            let mut customers: Vec<_> = self.customers.read().await.values().cloned().collect();
            customers.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(customers)
        }

        async fn update_customer(
            &self,
            id: CustomerId,
            update: CustomerUpdate,
        ) -> Result<Customer, PortError> {
            let mut customers = self.customers.write().await;
            let customer = customers
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Customer", id))?;
            customer.apply_update(update);
            Ok(customer.clone())
        }

        async fn delete_customer(&self, id: CustomerId) -> Result<(), PortError> {
            self.customers
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Customer", id))
        }

        async fn find_customers_by_ids(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, PortError> {
            let customers = self.customers.read().await;
            Ok(ids.iter().filter_map(|id| customers.get(id).cloned()).collect())
        }

        async fn create_supplier(&self, supplier: Supplier) -> Result<Supplier, PortError> {
            self.suppliers.write().await.insert(supplier.id, supplier.clone());
            Ok(supplier)
        }

        async fn get_supplier(&self, id: SupplierId) -> Result<Supplier, PortError> {
            self.suppliers
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Supplier", id))
        }

        async fn list_suppliers(&self) -> Result<Vec<Supplier>, PortError> {
            let mut suppliers: Vec<_> = self.suppliers.read().await.values().cloned().collect();
            suppliers.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(suppliers)
        }

        async fn update_supplier(
            &self,
            id: SupplierId,
            update: SupplierUpdate,
        ) -> Result<Supplier, PortError> {
            let mut suppliers = self.suppliers.write().await;
            let supplier = suppliers
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Supplier", id))?;
            supplier.apply_update(update);
            Ok(supplier.clone())
        }

        async fn delete_supplier(&self, id: SupplierId) -> Result<(), PortError> {
            self.suppliers
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Supplier", id))
        }

        async fn find_suppliers_by_ids(&self, ids: &[SupplierId]) -> Result<Vec<Supplier>, PortError> {
            let suppliers = self.suppliers.read().await;
            Ok(ids.iter().filter_map(|id| suppliers.get(id).cloned()).collect())
        }
    }
}
