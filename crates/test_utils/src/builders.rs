//! Test Data Builders
//!
//! Builders with sensible defaults so tests only name the fields they care
//! about.

use chrono::{DateTime, Utc};
use core_kernel::{CustomerId, GstRate, Money, ProductId, SupplierId};
use domain_billing::{
    LineRequest, PaymentDirection, PaymentMethod, PaymentRequest, PaymentStatus, SaleRequest,
};
use domain_inventory::{NewProduct, Product};
use domain_party::Counterparty;
use rust_decimal::Decimal;

use crate::fixtures::{GstFixtures, MoneyFixtures};

/// Builder for catalog entries
pub struct TestProductBuilder {
    name: String,
    sku: String,
    sale_price: Money,
    gst_rate: GstRate,
    stock: i64,
    supplier_id: Option<SupplierId>,
}

impl Default for TestProductBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProductBuilder {
    /// Price 100, GST 5%, stock 20, unique SKU
    pub fn new() -> Self {
        let suffix = ProductId::new().as_uuid().simple().to_string();
        Self {
            name: "Test Product".to_string(),
            sku: format!("SKU-{}", &suffix[..8]),
            sale_price: MoneyFixtures::unit_price(),
            gst_rate: GstFixtures::five(),
            stock: 20,
            supplier_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.sale_price = Money::new(price);
        self
    }

    pub fn with_gst(mut self, rate: GstRate) -> Self {
        self.gst_rate = rate;
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_supplier(mut self, supplier_id: SupplierId) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    pub fn build_request(self) -> NewProduct {
        NewProduct {
            name: self.name,
            sku: self.sku,
            sale_price: Some(self.sale_price),
            gst_rate: Some(self.gst_rate),
            stock: Some(self.stock),
            supplier_id: self.supplier_id,
            ..Default::default()
        }
    }

    /// Builds the product directly, bypassing any store
    pub fn build(self) -> Product {
        self.build_request()
            .into_product()
            .expect("builder defaults are valid")
    }
}

/// Builder for sale requests
#[derive(Default)]
pub struct TestSaleBuilder {
    customer_id: Option<CustomerId>,
    items: Vec<LineRequest>,
    payment_status: Option<PaymentStatus>,
    sale_date: Option<DateTime<Utc>>,
}

impl TestSaleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Adds a line at the product's own price and GST rate
    pub fn line(mut self, product_id: ProductId, quantity: i64) -> Self {
        self.items.push(LineRequest {
            product_id,
            quantity,
            rate: None,
            gst_rate: None,
        });
        self
    }

    /// Adds a line with explicit rate and GST overrides
    pub fn priced_line(mut self, product_id: ProductId, quantity: i64, rate: Money, gst_rate: GstRate) -> Self {
        self.items.push(LineRequest {
            product_id,
            quantity,
            rate: Some(rate),
            gst_rate: Some(gst_rate),
        });
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn on(mut self, sale_date: DateTime<Utc>) -> Self {
        self.sale_date = Some(sale_date);
        self
    }

    pub fn build(self) -> SaleRequest {
        SaleRequest {
            customer_id: self.customer_id,
            items: self.items,
            payment_status: self.payment_status,
            sale_date: self.sale_date,
        }
    }
}

/// Builder for payment requests
pub struct TestPaymentBuilder {
    direction: PaymentDirection,
    counterparty: Counterparty,
    method: Option<PaymentMethod>,
    amount: Money,
    reference: Option<String>,
    payment_date: Option<DateTime<Utc>>,
}

impl TestPaymentBuilder {
    /// An incoming cash payment from a customer
    pub fn received_from(customer_id: CustomerId, amount: Money) -> Self {
        Self::new(PaymentDirection::Incoming, Counterparty::Customer(customer_id), amount)
    }

    /// An outgoing payment to a supplier
    pub fn paid_to(supplier_id: SupplierId, amount: Money) -> Self {
        Self::new(PaymentDirection::Outgoing, Counterparty::Supplier(supplier_id), amount)
    }

    pub fn new(direction: PaymentDirection, counterparty: Counterparty, amount: Money) -> Self {
        Self {
            direction,
            counterparty,
            method: None,
            amount,
            reference: None,
            payment_date: None,
        }
    }

    pub fn via(mut self, method: PaymentMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn on(mut self, payment_date: DateTime<Utc>) -> Self {
        self.payment_date = Some(payment_date);
        self
    }

    pub fn build(self) -> PaymentRequest {
        PaymentRequest {
            direction: self.direction,
            counterparty: self.counterparty,
            method: self.method,
            amount: self.amount,
            reference: self.reference,
            notes: None,
            payment_date: self.payment_date,
        }
    }
}
