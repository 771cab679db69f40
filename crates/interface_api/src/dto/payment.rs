//! Payment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::Money;
use domain_billing::{Payment, PaymentDirection, PaymentMethod, PaymentRequest, PaymentView};
use domain_party::{Counterparty, CounterpartyKind};

use super::party::CounterpartyResponse;

/// Body of `POST /api/payments`
///
/// The amount is checked for positivity by the posting service.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[serde(rename = "type")]
    pub direction: PaymentDirection,
    pub entity_type: CounterpartyKind,
    pub entity: Uuid,
    pub method: Option<PaymentMethod>,
    pub amount: Money,
    #[validate(length(max = 200))]
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
}

impl From<CreatePaymentRequest> for PaymentRequest {
    fn from(request: CreatePaymentRequest) -> Self {
        PaymentRequest {
            direction: request.direction,
            counterparty: Counterparty::from_parts(request.entity_type, request.entity),
            method: request.method,
            amount: request.amount,
            reference: request.reference,
            notes: request.notes,
            payment_date: request.payment_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub direction: PaymentDirection,
    pub entity_type: CounterpartyKind,
    pub entity: Uuid,
    pub method: PaymentMethod,
    pub amount: Money,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Resolved on listing; absent when the counterparty was deleted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<CounterpartyResponse>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            direction: payment.direction,
            entity_type: payment.counterparty.kind(),
            entity: payment.counterparty.uuid(),
            method: payment.method,
            amount: payment.amount,
            reference: payment.reference,
            notes: payment.notes,
            payment_date: payment.payment_date,
            created_by: payment.created_by.map(|id| *id.as_uuid()),
            created_at: payment.created_at,
            counterparty: None,
        }
    }
}

impl From<PaymentView> for PaymentResponse {
    fn from(view: PaymentView) -> Self {
        Self {
            counterparty: view.counterparty.map(CounterpartyResponse::from),
            ..Self::from(view.payment)
        }
    }
}
