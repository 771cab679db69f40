//! Payment recording
//!
//! A payment moves money between the shop and one counterparty. Its effect
//! on the counterparty's balance is fixed by the sign table in
//! [`balance_delta`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Money, PaymentId, UserId};
use domain_party::{Counterparty, CounterpartyKind, CounterpartySummary};

use crate::error::BillingError;

/// Direction of a payment relative to the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    /// Money received by the shop
    Incoming,
    /// Money paid out by the shop
    Outgoing,
}

impl PaymentDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentDirection::Incoming => "incoming",
            PaymentDirection::Outgoing => "outgoing",
        }
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    /// Bank transfer
    Bank,
    Upi,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Cheque => "cheque",
        }
    }
}

/// Change to the counterparty balance caused by a payment
///
/// | entity   | direction | change   |
/// |----------|-----------|----------|
/// | customer | incoming  | −amount  |
/// | customer | outgoing  | +amount  |
/// | supplier | incoming  | +amount  |
/// | supplier | outgoing  | −amount  |
pub fn balance_delta(kind: CounterpartyKind, direction: PaymentDirection, amount: Money) -> Money {
    match (kind, direction) {
        (CounterpartyKind::Customer, PaymentDirection::Incoming) => -amount,
        (CounterpartyKind::Customer, PaymentDirection::Outgoing) => amount,
        (CounterpartyKind::Supplier, PaymentDirection::Incoming) => amount,
        (CounterpartyKind::Supplier, PaymentDirection::Outgoing) => -amount,
    }
}

/// A request to post a payment
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub direction: PaymentDirection,
    pub counterparty: Counterparty,
    pub method: Option<PaymentMethod>,
    pub amount: Money,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
}

impl PaymentRequest {
    /// Validates the request and builds the immutable payment record
    ///
    /// # Errors
    ///
    /// `BillingError::InvalidInput` when the amount is not positive
    pub fn into_payment(self, created_by: Option<UserId>) -> Result<Payment, BillingError> {
        let amount = self.amount.require_positive("amount")?;
        let now = Utc::now();
        Ok(Payment {
            id: PaymentId::new_v7(),
            direction: self.direction,
            counterparty: self.counterparty,
            method: self.method.unwrap_or_default(),
            amount,
            reference: self.reference.filter(|r| !r.trim().is_empty()),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            payment_date: self.payment_date.unwrap_or(now),
            created_by,
            created_at: now,
        })
    }
}

/// A posted payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub direction: PaymentDirection,
    pub counterparty: Counterparty,
    pub method: PaymentMethod,
    pub amount: Money,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Balance change this payment applies to its counterparty
    pub fn balance_delta(&self) -> Money {
        balance_delta(self.counterparty.kind(), self.direction, self.amount)
    }
}

/// A payment together with its resolved counterparty
///
/// `counterparty` is `None` when the customer or supplier has since been
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentView {
    pub payment: Payment,
    pub counterparty: Option<CounterpartySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::CustomerId;
    use rust_decimal_macros::dec;

    fn request(amount: Money) -> PaymentRequest {
        PaymentRequest {
            direction: PaymentDirection::Incoming,
            counterparty: Counterparty::Customer(CustomerId::new()),
            method: None,
            amount,
            reference: Some("".to_string()),
            notes: None,
            payment_date: None,
        }
    }

    #[test]
    fn test_sign_table() {
        let amount = Money::new(dec!(200));
        assert_eq!(balance_delta(CounterpartyKind::Customer, PaymentDirection::Incoming, amount).amount(), dec!(-200));
        assert_eq!(balance_delta(CounterpartyKind::Customer, PaymentDirection::Outgoing, amount).amount(), dec!(200));
        assert_eq!(balance_delta(CounterpartyKind::Supplier, PaymentDirection::Incoming, amount).amount(), dec!(200));
        assert_eq!(balance_delta(CounterpartyKind::Supplier, PaymentDirection::Outgoing, amount).amount(), dec!(-200));
    }

    #[test]
    fn test_defaults() {
        let payment = request(Money::new(dec!(200))).into_payment(None).unwrap();
        assert_eq!(payment.method, PaymentMethod::Cash);
        assert_eq!(payment.reference, None);
        assert_eq!(payment.payment_date, payment.created_at);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = request(Money::ZERO).into_payment(None);
        assert!(matches!(result, Err(BillingError::InvalidInput(_))));
    }

    #[test]
    fn test_method_wire_names() {
        let method: PaymentMethod = serde_json::from_str("\"upi\"").unwrap();
        assert_eq!(method, PaymentMethod::Upi);
        assert!(serde_json::from_str::<PaymentMethod>("\"card\"").is_err());
    }
}
