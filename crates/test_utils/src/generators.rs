//! Property-Based Test Generators
//!
//! Proptest strategies producing values that satisfy the domain's own
//! validation.

use core_kernel::{CustomerId, GstRate, Money, ProductId, SupplierId};
use domain_billing::{LineRequest, PaymentDirection, PaymentMethod};
use domain_party::{Counterparty, CounterpartyKind};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Positive amounts in paise, up to ten lakh rupees
pub fn positive_paise_strategy() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    positive_paise_strategy().prop_map(Money::from_paise)
}

/// Signed amounts, for balance arithmetic
pub fn money_strategy() -> impl Strategy<Value = Money> {
    (-100_000_000i64..100_000_000i64).prop_map(Money::from_paise)
}

/// The standard GST slabs
pub fn gst_slab_strategy() -> impl Strategy<Value = GstRate> {
    prop_oneof![Just(0i64), Just(5), Just(12), Just(18), Just(28)].prop_map(|p| {
        GstRate::from_percentage(Decimal::from(p)).expect("slabs are non-negative")
    })
}

/// Any non-negative rate with two decimal places, up to 100%
pub fn gst_rate_strategy() -> impl Strategy<Value = GstRate> {
    (0i64..=10_000i64).prop_map(|n| {
        GstRate::from_percentage(Decimal::new(n, 2)).expect("rate is non-negative")
    })
}

pub fn quantity_strategy() -> impl Strategy<Value = i64> {
    1i64..500i64
}

/// A sale line with explicit rate and GST, so pricing needs no product
pub fn priced_line_strategy() -> impl Strategy<Value = LineRequest> {
    (quantity_strategy(), positive_money_strategy(), gst_slab_strategy()).prop_map(
        |(quantity, rate, gst_rate)| LineRequest {
            product_id: ProductId::new(),
            quantity,
            rate: Some(rate),
            gst_rate: Some(gst_rate),
        },
    )
}

pub fn lines_strategy(max_lines: usize) -> impl Strategy<Value = Vec<LineRequest>> {
    prop::collection::vec(priced_line_strategy(), 1..=max_lines.max(1))
}

pub fn direction_strategy() -> impl Strategy<Value = PaymentDirection> {
    prop_oneof![Just(PaymentDirection::Incoming), Just(PaymentDirection::Outgoing)]
}

pub fn method_strategy() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::Bank),
        Just(PaymentMethod::Upi),
        Just(PaymentMethod::Cheque),
    ]
}

pub fn counterparty_kind_strategy() -> impl Strategy<Value = CounterpartyKind> {
    prop_oneof![Just(CounterpartyKind::Customer), Just(CounterpartyKind::Supplier)]
}

/// A counterparty with a fresh id
pub fn counterparty_strategy() -> impl Strategy<Value = Counterparty> {
    counterparty_kind_strategy().prop_map(|kind| match kind {
        CounterpartyKind::Customer => Counterparty::Customer(CustomerId::new()),
        CounterpartyKind::Supplier => Counterparty::Supplier(SupplierId::new()),
    })
}
