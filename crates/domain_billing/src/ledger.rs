//! Ledger reconciliation
//!
//! Customer and supplier balances are maintained incrementally by the
//! posting workflows. Reconciliation recomputes a balance from the full
//! history of invoices and payments and reports any drift against the
//! stored value.

use serde::{Deserialize, Serialize};

use core_kernel::Money;
use domain_party::{Counterparty, Customer, Supplier};

/// Historical totals for one counterparty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Σ invoice totals (customers only)
    pub billed: Money,
    /// Σ incoming payments
    pub received: Money,
    /// Σ outgoing payments
    pub paid_out: Money,
}

impl LedgerTotals {
    /// `billed − received + paid_out`
    pub fn customer_balance(&self) -> Money {
        self.billed - self.received + self.paid_out
    }

    /// `received − paid_out`
    pub fn supplier_balance(&self) -> Money {
        self.received - self.paid_out
    }
}

/// Result of comparing a stored balance with its recomputed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub counterparty: Counterparty,
    pub name: String,
    pub totals: LedgerTotals,
    pub recomputed_balance: Money,
    pub stored_balance: Money,
    /// `stored − recomputed`; zero when the ledger is consistent
    pub drift: Money,
}

impl Reconciliation {
    pub fn for_customer(customer: &Customer, totals: LedgerTotals) -> Self {
        Self::new(
            Counterparty::Customer(customer.id),
            customer.name.clone(),
            totals,
            totals.customer_balance(),
            customer.outstanding_balance,
        )
    }

    pub fn for_supplier(supplier: &Supplier, totals: LedgerTotals) -> Self {
        Self::new(
            Counterparty::Supplier(supplier.id),
            supplier.name.clone(),
            totals,
            totals.supplier_balance(),
            supplier.account_balance,
        )
    }

    fn new(
        counterparty: Counterparty,
        name: String,
        totals: LedgerTotals,
        recomputed_balance: Money,
        stored_balance: Money,
    ) -> Self {
        Self {
            counterparty,
            name,
            totals,
            recomputed_balance,
            stored_balance,
            drift: stored_balance - recomputed_balance,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.drift.is_zero()
    }
}
