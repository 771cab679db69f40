//! Payment posting workflow

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use core_kernel::{CustomerId, SupplierId, UserId};
use domain_party::{Counterparty, CounterpartyKind, CounterpartySummary, PartyPort};

use crate::error::BillingError;
use crate::payment::{Payment, PaymentRequest, PaymentView};
use crate::ports::PaymentsPort;

/// Posts payments and lists them with resolved counterparties
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentsPort>,
    parties: Arc<dyn PartyPort>,
}

impl PaymentService {
    pub fn new(payments: Arc<dyn PaymentsPort>, parties: Arc<dyn PartyPort>) -> Self {
        Self { payments, parties }
    }

    /// Records a payment and applies it to the counterparty balance
    ///
    /// # Errors
    ///
    /// - `BillingError::InvalidInput` when the amount is not positive
    /// - `BillingError::NotFound` when the counterparty does not exist
    #[instrument(
        skip(self, request),
        fields(direction = request.direction.as_str(), counterparty = %request.counterparty)
    )]
    pub async fn post_payment(
        &self,
        request: PaymentRequest,
        actor: Option<UserId>,
    ) -> Result<Payment, BillingError> {
        let payment = request.into_payment(actor)?;
        let posted = self.payments.post_payment(payment).await?;
        info!(
            payment_id = %posted.id,
            amount = %posted.amount,
            balance_delta = %posted.balance_delta(),
            "Payment posted"
        );
        Ok(posted)
    }

    /// Lists payments newest first, resolving counterparties with one
    /// lookup per kind
    pub async fn list_payments(&self) -> Result<Vec<PaymentView>, BillingError> {
        let payments = self.payments.list_payments(None).await?;

        let mut customer_ids: HashSet<CustomerId> = HashSet::new();
        let mut supplier_ids: HashSet<SupplierId> = HashSet::new();
        for payment in &payments {
            match payment.counterparty {
                Counterparty::Customer(id) => customer_ids.insert(id),
                Counterparty::Supplier(id) => supplier_ids.insert(id),
            };
        }
        let customer_ids: Vec<CustomerId> = customer_ids.into_iter().collect();
        let supplier_ids: Vec<SupplierId> = supplier_ids.into_iter().collect();

        let mut summaries: HashMap<(CounterpartyKind, Uuid), CounterpartySummary> = HashMap::new();
        if !customer_ids.is_empty() {
            for customer in self.parties.find_customers_by_ids(&customer_ids).await? {
                let summary = CounterpartySummary::from(&customer);
                summaries.insert((summary.kind, summary.id), summary);
            }
        }
        if !supplier_ids.is_empty() {
            for supplier in self.parties.find_suppliers_by_ids(&supplier_ids).await? {
                let summary = CounterpartySummary::from(&supplier);
                summaries.insert((summary.kind, summary.id), summary);
            }
        }

        Ok(payments
            .into_iter()
            .map(|payment| {
                let key = (payment.counterparty.kind(), payment.counterparty.uuid());
                PaymentView {
                    counterparty: summaries.get(&key).cloned(),
                    payment,
                }
            })
            .collect())
    }
}
