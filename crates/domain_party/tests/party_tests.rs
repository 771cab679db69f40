//! Tests for domain_party

use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{CustomerId, Money, SupplierId};

use domain_party::{
    Counterparty, CounterpartyKind, CounterpartySummary, CustomerUpdate, NewCustomer, NewSupplier,
    PartyError, SupplierUpdate,
};
use core_kernel::PortError;

// ============================================================================
// Customer Tests
// ============================================================================

mod customer_tests {
    use super::*;

    #[test]
    fn test_new_customer_trims_and_normalizes() {
        let customer = NewCustomer {
            name: "  Lakshmi Traders ".to_string(),
            email: Some(" Orders@Lakshmi.CO.IN ".to_string()),
            phone: Some("   ".to_string()),
            gst_number: Some("29abcde1234f1z5".to_string()),
            ..Default::default()
        }
        .into_customer();

        assert_eq!(customer.name, "Lakshmi Traders");
        assert_eq!(customer.email.as_deref(), Some("orders@lakshmi.co.in"));
        assert_eq!(customer.phone, None);
        assert_eq!(customer.gst_number.as_deref(), Some("29ABCDE1234F1Z5"));
    }

    #[test]
    fn test_update_replaces_tags() {
        let mut customer = NewCustomer {
            name: "Lakshmi Traders".to_string(),
            tags: vec!["retail".to_string()],
            ..Default::default()
        }
        .into_customer();

        customer.apply_update(CustomerUpdate {
            tags: Some(vec!["wholesale".to_string()]),
            ..Default::default()
        });
        assert_eq!(customer.tags, vec!["wholesale".to_string()]);
    }
}

// ============================================================================
// Supplier Tests
// ============================================================================

mod supplier_tests {
    use super::*;

    #[test]
    fn test_new_supplier_zero_balance() {
        let supplier = NewSupplier {
            name: "Narmada Fertilizers".to_string(),
            contact_person: Some("Vikram Shah".to_string()),
            ..Default::default()
        }
        .into_supplier();
        assert!(supplier.account_balance.is_zero());
        assert_eq!(supplier.contact_person.as_deref(), Some("Vikram Shah"));
    }

    #[test]
    fn test_update_keeps_balance() {
        let mut supplier = NewSupplier {
            name: "Narmada Fertilizers".to_string(),
            ..Default::default()
        }
        .into_supplier();
        supplier.account_balance = Money::new(dec!(-2500));
        supplier.apply_update(SupplierUpdate {
            notes: Some("Pays on 30 day terms".to_string()),
            ..Default::default()
        });
        assert_eq!(supplier.account_balance.amount(), dec!(-2500));
        assert!(supplier.notes.is_some());
    }
}

// ============================================================================
// Counterparty Tests
// ============================================================================

mod counterparty_tests {
    use super::*;

    #[test]
    fn test_summary_from_customer_uses_outstanding_balance() {
        let mut customer = NewCustomer {
            name: "Ravi Kumar".to_string(),
            phone: Some("9876543210".to_string()),
            ..Default::default()
        }
        .into_customer();
        customer.outstanding_balance = Money::new(dec!(115));

        let summary = CounterpartySummary::from(&customer);
        assert_eq!(summary.kind, CounterpartyKind::Customer);
        assert_eq!(summary.id, *customer.id.as_uuid());
        assert_eq!(summary.balance.amount(), dec!(115));
        assert_eq!(summary.phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_summary_from_supplier_uses_account_balance() {
        let mut supplier = NewSupplier {
            name: "Narmada Fertilizers".to_string(),
            ..Default::default()
        }
        .into_supplier();
        supplier.account_balance = Money::new(dec!(40));
        let summary = CounterpartySummary::from(&supplier);
        assert_eq!(summary.kind, CounterpartyKind::Supplier);
        assert_eq!(summary.balance.amount(), dec!(40));
    }

    #[test]
    fn test_counterparty_display_uses_typed_prefix() {
        let id = Uuid::new_v4();
        assert!(Counterparty::Customer(CustomerId::from_uuid(id)).to_string().starts_with("CUS-"));
        assert!(Counterparty::Supplier(SupplierId::from_uuid(id)).to_string().starts_with("SUP-"));
    }
}

// ============================================================================
// Error Tests
// ============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn test_port_not_found_keeps_entity_type() {
        let err = PartyError::from(PortError::not_found("Supplier", "SUP-1"));
        assert_eq!(err.to_string(), "Supplier not found: SUP-1");
    }

    #[test]
    fn test_connection_error_is_storage() {
        let err = PartyError::from(PortError::connection("pool closed"));
        assert!(matches!(err, PartyError::Storage(_)));
    }
}
