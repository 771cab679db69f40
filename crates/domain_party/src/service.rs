//! Customer and supplier management service

use std::sync::Arc;

use tracing::{info, instrument, warn};

use core_kernel::{CustomerId, SupplierId};

use crate::customer::{Customer, CustomerUpdate, NewCustomer};
use crate::error::PartyError;
use crate::ports::PartyPort;
use crate::supplier::{NewSupplier, Supplier, SupplierUpdate};
use crate::validation::{PartyValidator, ValidationResult};

/// Validates party records before handing them to the `PartyPort`
#[derive(Clone)]
pub struct PartyService {
    party_port: Arc<dyn PartyPort>,
}

impl PartyService {
    pub fn new(party_port: Arc<dyn PartyPort>) -> Self {
        Self { party_port }
    }

    // ========================================================================
    // Customers
    // ========================================================================

    #[instrument(skip(self, request))]
    pub async fn create_customer(&self, request: NewCustomer) -> Result<Customer, PartyError> {
        let customer = request.into_customer();
        check(PartyValidator::validate_customer(&customer))?;
        let created = self.party_port.create_customer(customer).await?;
        info!(customer_id = %created.id, "Customer created");
        Ok(created)
    }

    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, PartyError> {
        Ok(self.party_port.get_customer(id).await?)
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, PartyError> {
        Ok(self.party_port.list_customers().await?)
    }

    #[instrument(skip(self, update))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, PartyError> {
        let update = update.normalized();
        let mut preview = self.party_port.get_customer(id).await?;
        preview.apply_update(update.clone());
        check(PartyValidator::validate_customer(&preview))?;
        Ok(self.party_port.update_customer(id, update).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), PartyError> {
        self.party_port.delete_customer(id).await?;
        info!(customer_id = %id, "Customer deleted");
        Ok(())
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    #[instrument(skip(self, request))]
    pub async fn create_supplier(&self, request: NewSupplier) -> Result<Supplier, PartyError> {
        let supplier = request.into_supplier();
        check(PartyValidator::validate_supplier(&supplier))?;
        let created = self.party_port.create_supplier(supplier).await?;
        info!(supplier_id = %created.id, "Supplier created");
        Ok(created)
    }

    pub async fn get_supplier(&self, id: SupplierId) -> Result<Supplier, PartyError> {
        Ok(self.party_port.get_supplier(id).await?)
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, PartyError> {
        Ok(self.party_port.list_suppliers().await?)
    }

    #[instrument(skip(self, update))]
    pub async fn update_supplier(
        &self,
        id: SupplierId,
        update: SupplierUpdate,
    ) -> Result<Supplier, PartyError> {
        let update = update.normalized();
        let mut preview = self.party_port.get_supplier(id).await?;
        preview.apply_update(update.clone());
        check(PartyValidator::validate_supplier(&preview))?;
        Ok(self.party_port.update_supplier(id, update).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, id: SupplierId) -> Result<(), PartyError> {
        self.party_port.delete_supplier(id).await?;
        info!(supplier_id = %id, "Supplier deleted");
        Ok(())
    }
}

fn check(result: ValidationResult) -> Result<(), PartyError> {
    for warning in &result.warnings {
        warn!(%warning, "Party validation warning");
    }
    if result.is_valid {
        Ok(())
    } else {
        Err(PartyError::validation_failed(result.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MockPartyPort;
    use core_kernel::Money;

    fn service() -> PartyService {
        PartyService::new(Arc::new(MockPartyPort::new()))
    }

    #[tokio::test]
    async fn test_create_customer_starts_at_zero() {
        let created = service()
            .create_customer(NewCustomer {
                name: "Gopal Krishi Farm".to_string(),
                email: Some("Gopal@Farm.IN".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.outstanding_balance, Money::ZERO);
        assert_eq!(created.email.as_deref(), Some("gopal@farm.in"));
    }

    #[tokio::test]
    async fn test_create_customer_rejects_blank_name() {
        let result = service()
            .create_customer(NewCustomer {
                name: "   ".to_string(),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(PartyError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_update_supplier_validates_merged_record() {
        let service = service();
        let supplier = service
            .create_supplier(NewSupplier {
                name: "Deccan Seeds".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let result = service
            .update_supplier(
                supplier.id,
                SupplierUpdate {
                    email: Some("not-an-email".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(PartyError::ValidationFailed(_))));

        let unchanged = service.get_supplier(supplier.id).await.unwrap();
        assert_eq!(unchanged.email, None);
    }

    #[tokio::test]
    async fn test_delete_missing_customer() {
        let result = service().delete_customer(CustomerId::new()).await;
        assert!(matches!(result, Err(PartyError::NotFound { .. })));
    }
}
