//! Custom Test Assertions
//!
//! Assertion helpers for back-office types that give more meaningful
//! failure messages than plain `assert_eq!`.

use std::collections::HashSet;

use core_kernel::Money;
use domain_billing::{InvoiceNumbering, Reconciliation, Sale};
use rust_decimal::Decimal;

/// Asserts that two amounts are equal to the paisa
pub fn assert_money_eq(actual: Money, expected: Money) {
    assert!(
        actual.round_to_paise() == expected.round_to_paise(),
        "Money mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that two amounts differ by at most `tolerance`
pub fn assert_money_approx_eq(actual: Money, expected: Money, tolerance: Decimal) {
    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

pub fn assert_money_zero(money: Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts the header totals of a sale agree with each other and with its
/// lines
pub fn assert_sale_totals_consistent(sale: &Sale) {
    let line_base: Money = sale.items.iter().map(|line| line.base()).sum();
    let line_gst: Money = sale.items.iter().map(|line| line.gst_amount).sum();

    assert_eq!(
        sale.total,
        sale.subtotal + sale.gst_total,
        "Invoice {}: total {} != subtotal {} + gst {}",
        sale.invoice_number,
        sale.total,
        sale.subtotal,
        sale.gst_total
    );
    assert_eq!(
        sale.subtotal, line_base,
        "Invoice {}: subtotal {} does not match sum of line bases {}",
        sale.invoice_number, sale.subtotal, line_base
    );
    assert_eq!(
        sale.gst_total, line_gst,
        "Invoice {}: gst_total {} does not match sum of line GST {}",
        sale.invoice_number, sale.gst_total, line_gst
    );
}

/// Asserts an invoice number parses under the given numbering scheme and
/// returns its sequence
pub fn assert_invoice_number(numbering: &InvoiceNumbering, invoice_number: &str) -> i64 {
    match numbering.parse(invoice_number) {
        Some(sequence) => sequence,
        None => panic!(
            "Invoice number {:?} does not match prefix {:?} with at least {} digits",
            invoice_number,
            numbering.prefix(),
            numbering.min_digits()
        ),
    }
}

/// Asserts no invoice number appears twice
pub fn assert_unique_invoice_numbers(sales: &[Sale]) {
    let mut seen = HashSet::new();
    for sale in sales {
        assert!(
            seen.insert(sale.invoice_number.as_str()),
            "Duplicate invoice number {}",
            sale.invoice_number
        );
    }
}

/// Asserts a balance moved by exactly `expected_delta`
pub fn assert_balance_changed(before: Money, after: Money, expected_delta: Money) {
    let actual_delta = after - before;
    assert_eq!(
        actual_delta, expected_delta,
        "Balance moved by {} (from {} to {}), expected {}",
        actual_delta, before, after, expected_delta
    );
}

/// Asserts stored and recomputed balances agree
pub fn assert_ledger_consistent(report: &Reconciliation) {
    assert!(
        report.is_consistent(),
        "Ledger drift for {} ({}): stored={}, recomputed={}, drift={}",
        report.name,
        report.counterparty,
        report.stored_balance,
        report.recomputed_balance,
        report.drift
    );
}
