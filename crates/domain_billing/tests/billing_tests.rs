//! Tests for domain_billing pricing, numbering and the payment sign table

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{CustomerId, GstRate, Money, ProductId, SaleId, SupplierId};
use domain_billing::{
    balance_delta, BillingError, InvoiceNumbering, LineRequest, PaymentDirection, PaymentMethod,
    PaymentRequest, PaymentStatus, SaleDraft, SaleRequest,
};
use domain_inventory::{NewProduct, Product};
use domain_party::{Counterparty, CounterpartyKind};

fn product(name: &str, price: Decimal, gst: Decimal) -> Product {
    NewProduct {
        name: name.to_string(),
        sku: name.to_uppercase(),
        sale_price: Some(Money::new(price)),
        gst_rate: Some(GstRate::from_percentage(gst).unwrap()),
        stock: Some(100),
        ..Default::default()
    }
    .into_product()
    .unwrap()
}

fn line(product_id: ProductId, quantity: i64) -> LineRequest {
    LineRequest {
        product_id,
        quantity,
        rate: None,
        gst_rate: None,
    }
}

// ============================================================================
// Invoice Pricing Tests
// ============================================================================

mod pricing_tests {
    use super::*;

    #[test]
    fn test_mixed_rates_total() {
        let seeds = product("seeds", dec!(250), dec!(0));
        let urea = product("urea", dec!(266.50), dec!(5));
        let sprayer = product("sprayer", dec!(1200), dec!(18));

        let request = SaleRequest {
            items: vec![line(seeds.id, 2), line(urea.id, 4), line(sprayer.id, 1)],
            ..Default::default()
        };
        let draft = SaleDraft::build(request, &[seeds, urea, sprayer], None).unwrap();

        assert_eq!(draft.subtotal.amount(), dec!(2766.00));
        assert_eq!(draft.gst_total.amount(), dec!(269.30));
        assert_eq!(draft.total.amount(), dec!(3035.30));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let urea = product("urea", dec!(100), dec!(5));
        let request = SaleRequest {
            items: vec![LineRequest {
                product_id: urea.id,
                quantity: 2,
                rate: Some(Money::new(dec!(90))),
                gst_rate: Some(GstRate::from_percentage(dec!(12)).unwrap()),
            }],
            ..Default::default()
        };
        let draft = SaleDraft::build(request, &[urea], None).unwrap();

        assert_eq!(draft.items[0].rate.amount(), dec!(90));
        assert_eq!(draft.gst_total.amount(), dec!(21.6));
        assert_eq!(draft.total.amount(), dec!(201.6));
    }

    #[test]
    fn test_lines_snapshot_product_name() {
        let mut urea = product("urea", dec!(100), dec!(5));
        let request = SaleRequest {
            items: vec![line(urea.id, 1)],
            ..Default::default()
        };
        let draft = SaleDraft::build(request, std::slice::from_ref(&urea), None).unwrap();
        urea.name = "Urea (renamed)".to_string();

        assert_eq!(draft.items[0].product_name, "urea");
    }

    #[test]
    fn test_empty_items_rejected() {
        let err = SaleDraft::build(SaleRequest::default(), &[], None).unwrap_err();
        assert!(matches!(err, BillingError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let urea = product("urea", dec!(100), dec!(5));
        let request = SaleRequest {
            items: vec![line(urea.id, 0)],
            ..Default::default()
        };
        let err = SaleDraft::build(request, &[urea], None).unwrap_err();
        assert!(matches!(err, BillingError::InvalidInput(_)));
    }

    #[test]
    fn test_repeated_product_summed_in_decrements() {
        let urea = product("urea", dec!(100), dec!(5));
        let dap = product("dap", dec!(1350), dec!(5));
        let request = SaleRequest {
            items: vec![line(urea.id, 2), line(dap.id, 1), line(urea.id, 3)],
            ..Default::default()
        };
        let draft = SaleDraft::build(request, &[urea.clone(), dap.clone()], None).unwrap();
        let decrements = draft.stock_decrements();

        assert_eq!(decrements.len(), 2);
        assert_eq!(decrements[&urea.id], 5);
        assert_eq!(decrements[&dap.id], 1);
    }

    #[test]
    fn test_into_sale_keeps_totals() {
        let urea = product("urea", dec!(100), dec!(5));
        let request = SaleRequest {
            customer_id: Some(CustomerId::new()),
            items: vec![line(urea.id, 3)],
            payment_status: Some(PaymentStatus::Partial),
            ..Default::default()
        };
        let draft = SaleDraft::build(request, &[urea], None).unwrap();
        let sale = draft.into_sale(SaleId::new_v7(), "AGRO-0042".to_string(), Utc::now());

        assert_eq!(sale.invoice_number, "AGRO-0042");
        assert_eq!(sale.payment_status, PaymentStatus::Partial);
        assert!(sale.totals_consistent());
    }
}

// ============================================================================
// Numbering Tests
// ============================================================================

mod numbering_tests {
    use super::*;

    #[test]
    fn test_default_format() {
        let numbering = InvoiceNumbering::default();
        assert_eq!(numbering.format(1), "AGRO-0001");
        assert_eq!(numbering.format(10_000), "AGRO-10000");
    }

    #[test]
    fn test_custom_prefix() {
        let numbering = InvoiceNumbering::new("INV", 6).unwrap();
        assert_eq!(numbering.format(7), "INV-000007");
        assert_eq!(numbering.parse("INV-000007"), Some(7));
        assert_eq!(numbering.parse("AGRO-0007"), None);
    }

    #[test]
    fn test_invalid_prefix() {
        assert!(InvoiceNumbering::new("", 4).is_err());
        assert!(InvoiceNumbering::new("AG-RO", 4).is_err());
        assert!(InvoiceNumbering::new("AGRO", 0).is_err());
    }
}

// ============================================================================
// Payment Tests
// ============================================================================

mod payment_tests {
    use super::*;

    #[test]
    fn test_sign_table() {
        let amount = Money::new(dec!(100));
        assert_eq!(
            balance_delta(CounterpartyKind::Customer, PaymentDirection::Incoming, amount).amount(),
            dec!(-100)
        );
        assert_eq!(
            balance_delta(CounterpartyKind::Customer, PaymentDirection::Outgoing, amount).amount(),
            dec!(100)
        );
        assert_eq!(
            balance_delta(CounterpartyKind::Supplier, PaymentDirection::Incoming, amount).amount(),
            dec!(100)
        );
        assert_eq!(
            balance_delta(CounterpartyKind::Supplier, PaymentDirection::Outgoing, amount).amount(),
            dec!(-100)
        );
    }

    #[test]
    fn test_request_defaults_to_cash() {
        let payment = PaymentRequest {
            direction: PaymentDirection::Outgoing,
            counterparty: Counterparty::Supplier(SupplierId::new()),
            method: None,
            amount: Money::new(dec!(5000)),
            reference: Some("  ".to_string()),
            notes: Some("Advance for kharif seed".to_string()),
            payment_date: None,
        }
        .into_payment(None)
        .unwrap();

        assert_eq!(payment.method, PaymentMethod::Cash);
        assert!(payment.reference.is_none());
        assert_eq!(payment.balance_delta().amount(), dec!(-5000));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = PaymentRequest {
            direction: PaymentDirection::Incoming,
            counterparty: Counterparty::Customer(CustomerId::new()),
            method: Some(PaymentMethod::Upi),
            amount: Money::new(dec!(-1)),
            reference: None,
            notes: None,
            payment_date: None,
        }
        .into_payment(None);

        assert!(matches!(result, Err(BillingError::InvalidInput(_))));
    }

    #[test]
    fn test_direction_serialization() {
        assert_eq!(serde_json::to_string(&PaymentDirection::Incoming).unwrap(), "\"incoming\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Upi).unwrap(), "\"upi\"");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_totals_add_up(
            lines in prop::collection::vec((1i64..10_000, 1i64..500, 0u32..29), 1..8)
        ) {
            let products: Vec<Product> = lines
                .iter()
                .enumerate()
                .map(|(i, (paise, _, gst))| {
                    product(&format!("item{}", i), Decimal::new(*paise, 2), Decimal::from(*gst))
                })
                .collect();
            let request = SaleRequest {
                items: products
                    .iter()
                    .zip(&lines)
                    .map(|(p, (_, qty, _))| line(p.id, *qty))
                    .collect(),
                ..Default::default()
            };
            let draft = SaleDraft::build(request, &products, None).unwrap();

            prop_assert_eq!(draft.total, draft.subtotal + draft.gst_total);
            let line_sum: Money = draft.items.iter().map(|l| l.line_total).sum();
            prop_assert_eq!(draft.total, line_sum);
            prop_assert!(!draft.gst_total.is_negative());
        }

        #[test]
        fn prop_sign_table_is_antisymmetric(paise in 1i64..10_000_000) {
            let amount = Money::from_paise(paise);
            for kind in [CounterpartyKind::Customer, CounterpartyKind::Supplier] {
                let incoming = balance_delta(kind, PaymentDirection::Incoming, amount);
                let outgoing = balance_delta(kind, PaymentDirection::Outgoing, amount);
                prop_assert_eq!(incoming + outgoing, Money::ZERO);
                prop_assert_eq!(incoming.abs(), amount);
            }
        }

        #[test]
        fn prop_numbering_parses_what_it_formats(sequence in 1i64..10_000_000) {
            let numbering = InvoiceNumbering::default();
            prop_assert_eq!(numbering.parse(&numbering.format(sequence)), Some(sequence));
        }
    }
}
