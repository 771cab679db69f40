//! Payment counterparties
//!
//! A payment targets either a customer or a supplier. The target is a tagged
//! reference so that each kind is resolved against its own table and a
//! customer id can never be looked up as a supplier.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{CustomerId, Money, SupplierId};

use crate::customer::Customer;
use crate::supplier::Supplier;

/// Which ledger a counterparty belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterpartyKind {
    Customer,
    Supplier,
}

impl CounterpartyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterpartyKind::Customer => "customer",
            CounterpartyKind::Supplier => "supplier",
        }
    }
}

impl std::fmt::Display for CounterpartyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged reference to a customer or supplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Counterparty {
    Customer(CustomerId),
    Supplier(SupplierId),
}

impl Counterparty {
    /// Builds a reference from the wire pair `(entityType, entity)`
    pub fn from_parts(kind: CounterpartyKind, id: Uuid) -> Self {
        match kind {
            CounterpartyKind::Customer => Counterparty::Customer(CustomerId::from_uuid(id)),
            CounterpartyKind::Supplier => Counterparty::Supplier(SupplierId::from_uuid(id)),
        }
    }

    pub fn kind(&self) -> CounterpartyKind {
        match self {
            Counterparty::Customer(_) => CounterpartyKind::Customer,
            Counterparty::Supplier(_) => CounterpartyKind::Supplier,
        }
    }

    /// The raw id, without the kind
    pub fn uuid(&self) -> Uuid {
        match self {
            Counterparty::Customer(id) => *id.as_uuid(),
            Counterparty::Supplier(id) => *id.as_uuid(),
        }
    }
}

impl std::fmt::Display for Counterparty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Counterparty::Customer(id) => write!(f, "{}", id),
            Counterparty::Supplier(id) => write!(f, "{}", id),
        }
    }
}

/// Display summary of a resolved counterparty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartySummary {
    pub kind: CounterpartyKind,
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    /// Outstanding balance for customers, account balance for suppliers
    pub balance: Money,
}

impl From<&Customer> for CounterpartySummary {
    fn from(customer: &Customer) -> Self {
        Self {
            kind: CounterpartyKind::Customer,
            id: *customer.id.as_uuid(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            balance: customer.outstanding_balance,
        }
    }
}

impl From<&Supplier> for CounterpartySummary {
    fn from(supplier: &Supplier) -> Self {
        Self {
            kind: CounterpartyKind::Supplier,
            id: *supplier.id.as_uuid(),
            name: supplier.name.clone(),
            phone: supplier.phone.clone(),
            balance: supplier.account_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_preserves_kind() {
        let id = Uuid::new_v4();
        let customer = Counterparty::from_parts(CounterpartyKind::Customer, id);
        let supplier = Counterparty::from_parts(CounterpartyKind::Supplier, id);
        assert_eq!(customer.kind(), CounterpartyKind::Customer);
        assert_eq!(supplier.kind(), CounterpartyKind::Supplier);
        assert_eq!(customer.uuid(), supplier.uuid());
        assert_ne!(customer, supplier);
    }

    #[test]
    fn test_kind_wire_format() {
        let parsed: CounterpartyKind = serde_json::from_str("\"supplier\"").unwrap();
        assert_eq!(parsed, CounterpartyKind::Supplier);
        assert!(serde_json::from_str::<CounterpartyKind>("\"vendor\"").is_err());
    }
}
