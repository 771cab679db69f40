//! Unit tests for the Money and GstRate types
//!
//! Tests cover creation, arithmetic, GST application and the
//! validation helpers used by the invoice and payment workflows.

use core_kernel::{GstRate, Money, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_keeps_full_precision() {
        let m = Money::new(dec!(100.123456789));
        assert_eq!(m.amount(), dec!(100.123456789));
    }

    #[test]
    fn test_from_paise_converts_correctly() {
        let m = Money::from_paise(10050);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_zero_constant() {
        assert!(Money::ZERO.is_zero());
        assert_eq!(Money::default(), Money::ZERO);
    }

    #[test]
    fn test_decimal_conversions() {
        let m: Money = dec!(42.5).into();
        let d: Decimal = m.into();
        assert_eq!(d, dec!(42.5));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_add_and_sub() {
        let a = Money::new(dec!(315));
        let b = Money::new(dec!(115));
        assert_eq!((a - b).amount(), dec!(200));
        assert_eq!((a + b).amount(), dec!(430));
    }

    #[test]
    fn test_assign_operators() {
        let mut balance = Money::ZERO;
        balance += Money::new(dec!(315));
        balance -= Money::new(dec!(100));
        assert_eq!(balance.amount(), dec!(215));
    }

    #[test]
    fn test_negation() {
        let m = Money::new(dec!(50));
        assert_eq!((-m).amount(), dec!(-50));
        assert!((-m).is_negative());
        assert_eq!((-m).abs(), m);
    }

    #[test]
    fn test_sum_of_iterator() {
        let lines = [Money::new(dec!(300)), Money::new(dec!(15.75)), Money::new(dec!(0.25))];
        let total: Money = lines.iter().sum();
        assert_eq!(total.amount(), dec!(316));
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Money = Vec::<Money>::new().into_iter().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_add(&Money::new(dec!(1))), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_checked_times() {
        let rate = Money::new(dec!(12.5));
        assert_eq!(rate.checked_times(4).unwrap().amount(), dec!(50));
        assert_eq!(Money::new(Decimal::MAX).checked_times(2), Err(MoneyError::Overflow));
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_round_to_paise_uses_bankers_rounding() {
        assert_eq!(Money::new(dec!(2.345)).round_to_paise().amount(), dec!(2.34));
        assert_eq!(Money::new(dec!(2.355)).round_to_paise().amount(), dec!(2.36));
    }

    #[test]
    fn test_display_shows_two_places() {
        assert_eq!(Money::new(dec!(7.5)).to_string(), "₹ 7.50");
    }
}

mod validation {
    use super::*;

    #[test]
    fn test_require_positive_accepts_positive() {
        let m = Money::new(dec!(0.01));
        assert_eq!(m.require_positive("amount"), Ok(m));
    }

    #[test]
    fn test_require_positive_rejects_negative() {
        let err = Money::new(dec!(-1)).require_positive("amount").unwrap_err();
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn test_require_non_negative() {
        assert!(Money::ZERO.require_non_negative("sale price").is_ok());
        assert!(Money::new(dec!(-0.01)).require_non_negative("sale price").is_err());
    }
}

mod gst {
    use super::*;

    #[test]
    fn test_five_percent_on_three_hundred() {
        let rate = GstRate::from_percentage(dec!(5)).unwrap();
        assert_eq!(rate.apply(Money::new(dec!(300))).unwrap().amount(), dec!(15));
    }

    #[test]
    fn test_fractional_rate_keeps_precision() {
        let rate = GstRate::from_percentage(dec!(18)).unwrap();
        assert_eq!(rate.apply(Money::new(dec!(33.33))).unwrap().amount(), dec!(5.9994));
    }

    #[test]
    fn test_zero_rate() {
        assert!(GstRate::ZERO.apply(Money::new(dec!(999))).unwrap().is_zero());
    }

    #[test]
    fn test_as_fraction() {
        let rate = GstRate::from_percentage(dec!(12)).unwrap();
        assert_eq!(rate.as_fraction(), dec!(0.12));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = GstRate::from_percentage(dec!(-5));
        assert!(matches!(result, Err(MoneyError::InvalidRate(_))));
    }

    #[test]
    fn test_rate_deserializes_from_number() {
        let rate: GstRate = serde_json::from_str("12").unwrap();
        assert_eq!(rate.as_percentage(), dec!(12));
    }
}
