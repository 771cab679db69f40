//! Pre-built Test Fixtures
//!
//! Consistent, predictable test data for the back office. The "standard"
//! product is the one the invoice scenarios are written against: price
//! 100, GST 5%, stock 20.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{CustomerId, GstRate, Money, ProductId, SupplierId, UserId};
use domain_inventory::NewProduct;
use domain_party::{NewCustomer, NewSupplier};
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Sale price of the standard product
    pub fn unit_price() -> Money {
        Money::new(dec!(100))
    }

    /// Total of three standard products at 5% GST
    pub fn three_units_with_gst() -> Money {
        Money::new(dec!(315))
    }

    /// A part payment against that invoice
    pub fn part_payment() -> Money {
        Money::new(dec!(200))
    }

    pub fn zero() -> Money {
        Money::ZERO
    }
}

/// Fixture for GST slabs
pub struct GstFixtures;

impl GstFixtures {
    pub fn exempt() -> GstRate {
        GstRate::ZERO
    }

    pub fn five() -> GstRate {
        GstRate::from_percentage(dec!(5)).expect("valid rate")
    }

    pub fn twelve() -> GstRate {
        GstRate::from_percentage(dec!(12)).expect("valid rate")
    }

    pub fn eighteen() -> GstRate {
        GstRate::from_percentage(dec!(18)).expect("valid rate")
    }
}

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed sale date in January
    pub fn january_sale() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    /// A fixed sale date in February
    pub fn february_sale() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 16, 0, 0).unwrap()
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn product_id() -> ProductId {
        ProductId::new()
    }

    pub fn customer_id() -> CustomerId {
        CustomerId::new()
    }

    pub fn supplier_id() -> SupplierId {
        SupplierId::new()
    }

    pub fn user_id() -> UserId {
        UserId::new()
    }
}

/// Fixture for catalog entries
pub struct ProductFixtures;

impl ProductFixtures {
    /// Price 100, GST 5%, stock 20
    pub fn standard() -> NewProduct {
        NewProduct {
            name: "Urea 45kg".to_string(),
            sku: "UREA-45".to_string(),
            category: Some("Fertilizer".to_string()),
            unit: Some("bag".to_string()),
            cost_price: Some(Money::new(dec!(80))),
            sale_price: Some(MoneyFixtures::unit_price()),
            gst_rate: Some(GstFixtures::five()),
            stock: Some(20),
            ..Default::default()
        }
    }

    /// Two bags left
    pub fn scarce() -> NewProduct {
        NewProduct {
            name: "DAP 50kg".to_string(),
            sku: "DAP-50".to_string(),
            category: Some("Fertilizer".to_string()),
            sale_price: Some(Money::new(dec!(1350))),
            gst_rate: Some(GstFixtures::five()),
            stock: Some(2),
            ..Default::default()
        }
    }

    /// Tax-exempt seeds
    pub fn exempt() -> NewProduct {
        NewProduct {
            name: "Paddy Seeds 10kg".to_string(),
            sku: "SEED-PAD-10".to_string(),
            sale_price: Some(Money::new(dec!(650))),
            gst_rate: Some(GstFixtures::exempt()),
            stock: Some(40),
            ..Default::default()
        }
    }
}

/// Fixture for customers and suppliers
pub struct PartyFixtures;

impl PartyFixtures {
    pub fn customer() -> NewCustomer {
        NewCustomer {
            name: "Ravi Kumar".to_string(),
            email: Some("Ravi.Kumar@Example.com".to_string()),
            phone: Some("9876543210".to_string()),
            address: Some("Main Road, Guntur".to_string()),
            ..Default::default()
        }
    }

    /// A customer with a random realistic name
    pub fn random_customer() -> NewCustomer {
        NewCustomer {
            name: Name().fake(),
            phone: Some(format!("9{}", (100_000_000u64..999_999_999u64).fake::<u64>())),
            ..Default::default()
        }
    }

    pub fn supplier() -> NewSupplier {
        NewSupplier {
            name: "Deccan Seeds Pvt Ltd".to_string(),
            contact_person: Some("Anil Reddy".to_string()),
            phone: Some("04023456789".to_string()),
            ..Default::default()
        }
    }

    /// A supplier with a random company name
    pub fn random_supplier() -> NewSupplier {
        NewSupplier {
            name: CompanyName().fake(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_product_is_valid() {
        let product = ProductFixtures::standard().into_product().unwrap();
        assert_eq!(product.stock, 20);
        assert_eq!(product.sale_price, MoneyFixtures::unit_price());
    }

    #[test]
    fn test_random_customer_has_name() {
        let customer = PartyFixtures::random_customer().into_customer();
        assert!(!customer.name.is_empty());
        assert_eq!(customer.phone.as_deref().map(str::len), Some(10));
    }
}
