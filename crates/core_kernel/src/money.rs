//! Money and tax-rate types with precise decimal arithmetic
//!
//! The business trades in a single currency (Indian rupees), so `Money` is a
//! thin wrapper over `rust_decimal::Decimal` that keeps amounts exact. Values
//! are never rounded implicitly: invoice identities such as
//! `total == subtotal + gst_total` must hold to the last digit.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use thiserror::Error;

/// Errors that can occur when constructing monetary values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid GST rate: {0}")]
    InvalidRate(String),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount in rupees
///
/// Serialized as a bare decimal so request and response bodies stay flat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero rupees
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Creates a new Money value
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates Money from an integer amount of paise
    pub fn from_paise(paise: i64) -> Self {
        Self(Decimal::new(paise, 2))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Rounds to whole paise using banker's rounding, for display only
    pub fn round_to_paise(&self) -> Self {
        Self(self.0.round_dp_with_strategy(
            2,
            rust_decimal::RoundingStrategy::MidpointNearestEven,
        ))
    }

    /// Multiplies a unit rate by a whole quantity
    pub fn times(&self, quantity: i64) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Checked addition that reports overflow instead of panicking
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Checked multiplication by a whole quantity
    pub fn checked_times(&self, quantity: i64) -> Result<Money, MoneyError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Sums amounts, reporting overflow instead of panicking
    ///
    /// Use this for totals built from request data; the `Sum` impl is for
    /// values already bounded by the store.
    pub fn checked_sum<I>(amounts: I) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(&amount))
    }

    /// Returns the value if it is strictly positive
    ///
    /// # Errors
    ///
    /// `MoneyError::InvalidAmount` naming `what` when the amount is zero or negative
    pub fn require_positive(self, what: &str) -> Result<Self, MoneyError> {
        if self.is_positive() {
            Ok(self)
        } else {
            Err(MoneyError::InvalidAmount(format!("{} must be greater than zero, got {}", what, self.0)))
        }
    }

    /// Returns the value if it is zero or positive
    pub fn require_non_negative(self, what: &str) -> Result<Self, MoneyError> {
        if self.is_negative() {
            Err(MoneyError::InvalidAmount(format!("{} must not be negative, got {}", what, self.0)))
        } else {
            Ok(self)
        }
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Decimal {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹ {:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

/// A GST rate expressed as a percentage (5 means 5%)
///
/// Negative rates are rejected at construction and on deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct GstRate(Decimal);

impl GstRate {
    /// A zero rate, used when neither the line nor the product carries one
    pub const ZERO: GstRate = GstRate(Decimal::ZERO);

    /// Creates a rate from a percentage
    ///
    /// # Errors
    ///
    /// `MoneyError::InvalidRate` if the percentage is negative
    pub fn from_percentage(percentage: Decimal) -> Result<Self, MoneyError> {
        if percentage < Decimal::ZERO {
            return Err(MoneyError::InvalidRate(format!(
                "GST rate must not be negative, got {}",
                percentage
            )));
        }
        Ok(Self(percentage))
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a fraction (0.05 for 5%)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / dec!(100)
    }

    /// Tax due on a taxable base
    ///
    /// # Errors
    ///
    /// `MoneyError::Overflow` when the product does not fit a `Decimal`
    pub fn apply(&self, base: Money) -> Result<Money, MoneyError> {
        base.0
            .checked_mul(self.0)
            .and_then(|scaled| scaled.checked_div(dec!(100)))
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }
}

impl TryFrom<Decimal> for GstRate {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_percentage(value)
    }
}

impl From<GstRate> for Decimal {
    fn from(rate: GstRate) -> Decimal {
        rate.0
    }
}

impl fmt::Display for GstRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_paise() {
        let m = Money::from_paise(31500);
        assert_eq!(m.amount(), dec!(315.00));
    }

    #[test]
    fn test_money_times_quantity() {
        let rate = Money::new(dec!(100));
        assert_eq!(rate.times(3).amount(), dec!(300));
    }

    #[test]
    fn test_require_positive_rejects_zero() {
        let result = Money::ZERO.require_positive("amount");
        assert!(matches!(result, Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_gst_rate_application() {
        let rate = GstRate::from_percentage(dec!(5)).unwrap();
        let gst = rate.apply(Money::new(dec!(300))).unwrap();
        assert_eq!(gst.amount(), dec!(15));
    }

    #[test]
    fn test_gst_on_huge_base_overflows() {
        let rate = GstRate::from_percentage(dec!(5)).unwrap();
        let base = Money::new(Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0));
        assert_eq!(rate.apply(base), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_checked_sum() {
        let amounts = [Money::new(dec!(300)), Money::new(dec!(15))];
        assert_eq!(Money::checked_sum(amounts).unwrap().amount(), dec!(315));
        assert_eq!(Money::checked_sum(std::iter::empty()).unwrap(), Money::ZERO);

        let huge = Money::new(Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0));
        assert_eq!(Money::checked_sum([huge, huge]), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_negative_gst_rate_rejected() {
        assert!(GstRate::from_percentage(dec!(-1)).is_err());
        let parsed: Result<GstRate, _> = serde_json::from_str("-5");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(dec!(115)).to_string(), "₹ 115.00");
        assert_eq!(GstRate::from_percentage(dec!(12.50)).unwrap().to_string(), "12.5%");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn money_sum_is_order_independent(
            amounts in proptest::collection::vec(-1_000_000_000i64..1_000_000_000i64, 0..50)
        ) {
            let forward: Money = amounts.iter().map(|p| Money::from_paise(*p)).sum();
            let backward: Money = amounts.iter().rev().map(|p| Money::from_paise(*p)).sum();
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn gst_is_linear_in_quantity(
            rate_paise in 0i64..10_000_000i64,
            quantity in 1i64..10_000i64,
            percent_hundredths in 0i64..5_000i64
        ) {
            let rate = Money::from_paise(rate_paise);
            let gst = GstRate::from_percentage(Decimal::new(percent_hundredths, 2)).unwrap();
            let per_unit = gst.apply(rate).unwrap();
            prop_assert_eq!(gst.apply(rate.times(quantity)).unwrap(), per_unit.times(quantity));
        }
    }
}
