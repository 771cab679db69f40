//! Conversions between database rows and domain types

use core_kernel::{
    CustomerId, GstRate, InventoryTransactionId, Money, PortError, ProductId, SaleId, SupplierId,
    UserId,
};
use domain_billing::{Payment, Sale, SaleDraft, SaleLine};
use domain_inventory::{InventoryTransaction, Product, ProductUpdate, StockMovement};
use domain_party::{Counterparty, Customer, CustomerUpdate, Supplier, SupplierUpdate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::repositories::catalog::{
    InventoryTransactionRow, NewInventoryTransaction, ProductChanges, ProductRow,
};
use crate::repositories::party::{CustomerChanges, CustomerRow, SupplierChanges, SupplierRow};
use crate::repositories::payments::PaymentRow;
use crate::repositories::sales::{NewSale, SaleItemRow, SaleRow};

fn gst_rate(value: Decimal) -> Result<GstRate, PortError> {
    GstRate::try_from(value).map_err(|e| PortError::internal(format!("stored GST rate: {}", e)))
}

fn user(id: Option<Uuid>) -> Option<UserId> {
    id.map(UserId::from_uuid)
}

// ============================================================================
// Catalog
// ============================================================================

pub(crate) fn product_to_row(product: &Product) -> ProductRow {
    ProductRow {
        id: *product.id.as_uuid(),
        name: product.name.clone(),
        sku: product.sku.clone(),
        category: product.category.clone(),
        unit: product.unit.clone(),
        description: product.description.clone(),
        cost_price: product.cost_price.amount(),
        sale_price: product.sale_price.amount(),
        gst_rate: product.gst_rate.as_percentage(),
        stock: product.stock,
        supplier_id: product.supplier_id.map(|id| *id.as_uuid()),
        created_at: product.created_at,
        updated_at: product.updated_at,
    }
}

pub(crate) fn row_to_product(row: ProductRow) -> Result<Product, PortError> {
    Ok(Product {
        id: ProductId::from_uuid(row.id),
        name: row.name,
        sku: row.sku,
        category: row.category,
        unit: row.unit,
        description: row.description,
        cost_price: Money::new(row.cost_price),
        sale_price: Money::new(row.sale_price),
        gst_rate: gst_rate(row.gst_rate)?,
        stock: row.stock,
        supplier_id: row.supplier_id.map(SupplierId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub(crate) fn rows_to_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, PortError> {
    rows.into_iter().map(row_to_product).collect()
}

pub(crate) fn product_changes(update: ProductUpdate) -> ProductChanges {
    ProductChanges {
        name: update.name,
        sku: update.sku,
        category: update.category,
        unit: update.unit,
        description: update.description,
        cost_price: update.cost_price.map(|m| m.amount()),
        sale_price: update.sale_price.map(|m| m.amount()),
        gst_rate: update.gst_rate.map(|r| r.as_percentage()),
        supplier_id: update.supplier_id.map(|id| *id.as_uuid()),
    }
}

pub(crate) fn movement_to_row(movement: &StockMovement) -> NewInventoryTransaction {
    NewInventoryTransaction {
        id: *InventoryTransactionId::new_v7().as_uuid(),
        product_id: *movement.product_id.as_uuid(),
        movement_type: movement.movement_type.into(),
        quantity: movement.quantity,
        unit_cost: movement.unit_cost.amount(),
        note: movement.note.clone(),
        created_by: movement.created_by.map(|id| *id.as_uuid()),
    }
}

pub(crate) fn row_to_transaction(row: InventoryTransactionRow) -> InventoryTransaction {
    InventoryTransaction {
        id: InventoryTransactionId::from_uuid(row.id),
        product_id: ProductId::from_uuid(row.product_id),
        movement_type: row.movement_type.into(),
        quantity: row.quantity,
        unit_cost: Money::new(row.unit_cost),
        note: row.note,
        created_by: user(row.created_by),
        transaction_date: row.transaction_date,
    }
}

// ============================================================================
// Parties
// ============================================================================

pub(crate) fn customer_to_row(customer: &Customer) -> CustomerRow {
    CustomerRow {
        id: *customer.id.as_uuid(),
        name: customer.name.clone(),
        email: customer.email.clone(),
        phone: customer.phone.clone(),
        address: customer.address.clone(),
        gst_number: customer.gst_number.clone(),
        outstanding_balance: customer.outstanding_balance.amount(),
        tags: customer.tags.clone(),
        created_at: customer.created_at,
        updated_at: customer.updated_at,
    }
}

pub(crate) fn row_to_customer(row: CustomerRow) -> Customer {
    Customer {
        id: CustomerId::from_uuid(row.id),
        name: row.name,
        email: row.email,
        phone: row.phone,
        address: row.address,
        gst_number: row.gst_number,
        outstanding_balance: Money::new(row.outstanding_balance),
        tags: row.tags,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub(crate) fn customer_changes(update: CustomerUpdate) -> CustomerChanges {
    CustomerChanges {
        name: update.name,
        email: update.email,
        phone: update.phone,
        address: update.address,
        gst_number: update.gst_number,
        tags: update.tags,
    }
}

pub(crate) fn supplier_to_row(supplier: &Supplier) -> SupplierRow {
    SupplierRow {
        id: *supplier.id.as_uuid(),
        name: supplier.name.clone(),
        contact_person: supplier.contact_person.clone(),
        email: supplier.email.clone(),
        phone: supplier.phone.clone(),
        address: supplier.address.clone(),
        gst_number: supplier.gst_number.clone(),
        account_balance: supplier.account_balance.amount(),
        notes: supplier.notes.clone(),
        created_at: supplier.created_at,
        updated_at: supplier.updated_at,
    }
}

pub(crate) fn row_to_supplier(row: SupplierRow) -> Supplier {
    Supplier {
        id: SupplierId::from_uuid(row.id),
        name: row.name,
        contact_person: row.contact_person,
        email: row.email,
        phone: row.phone,
        address: row.address,
        gst_number: row.gst_number,
        account_balance: Money::new(row.account_balance),
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub(crate) fn supplier_changes(update: SupplierUpdate) -> SupplierChanges {
    SupplierChanges {
        name: update.name,
        contact_person: update.contact_person,
        email: update.email,
        phone: update.phone,
        address: update.address,
        gst_number: update.gst_number,
        notes: update.notes,
    }
}

// ============================================================================
// Sales and payments
// ============================================================================

pub(crate) fn draft_to_rows(id: SaleId, draft: &SaleDraft) -> (NewSale, Vec<SaleItemRow>) {
    let sale_id = *id.as_uuid();
    let sale = NewSale {
        id: sale_id,
        customer_id: draft.customer_id.map(|id| *id.as_uuid()),
        subtotal: draft.subtotal.amount(),
        gst_total: draft.gst_total.amount(),
        total: draft.total.amount(),
        payment_status: draft.payment_status.into(),
        sale_date: draft.sale_date,
        created_by: draft.created_by.map(|id| *id.as_uuid()),
    };
    let items = draft
        .items
        .iter()
        .enumerate()
        .map(|(index, line)| SaleItemRow {
            sale_id,
            line_no: index as i32 + 1,
            product_id: *line.product_id.as_uuid(),
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            rate: line.rate.amount(),
            gst_rate: line.gst_rate.as_percentage(),
            gst_amount: line.gst_amount.amount(),
            line_total: line.line_total.amount(),
        })
        .collect();
    (sale, items)
}

pub(crate) fn rows_to_sale(row: SaleRow, items: Vec<SaleItemRow>) -> Result<Sale, PortError> {
    let items = items
        .into_iter()
        .map(|item| {
            Ok(SaleLine {
                product_id: ProductId::from_uuid(item.product_id),
                product_name: item.product_name,
                quantity: item.quantity,
                rate: Money::new(item.rate),
                gst_rate: gst_rate(item.gst_rate)?,
                gst_amount: Money::new(item.gst_amount),
                line_total: Money::new(item.line_total),
            })
        })
        .collect::<Result<Vec<_>, PortError>>()?;

    Ok(Sale {
        id: SaleId::from_uuid(row.id),
        invoice_number: row.invoice_number,
        customer_id: row.customer_id.map(CustomerId::from_uuid),
        items,
        subtotal: Money::new(row.subtotal),
        gst_total: Money::new(row.gst_total),
        total: Money::new(row.total),
        payment_status: row.payment_status.into(),
        sale_date: row.sale_date,
        created_by: user(row.created_by),
        created_at: row.created_at,
    })
}

pub(crate) fn payment_to_row(payment: &Payment) -> PaymentRow {
    PaymentRow {
        id: *payment.id.as_uuid(),
        direction: payment.direction.into(),
        counterparty_kind: payment.counterparty.kind().into(),
        counterparty_id: payment.counterparty.uuid(),
        method: payment.method.into(),
        amount: payment.amount.amount(),
        reference: payment.reference.clone(),
        notes: payment.notes.clone(),
        payment_date: payment.payment_date,
        created_by: payment.created_by.map(|id| *id.as_uuid()),
        created_at: payment.created_at,
    }
}

pub(crate) fn row_to_payment(row: PaymentRow) -> Payment {
    Payment {
        id: core_kernel::PaymentId::from_uuid(row.id),
        direction: row.direction.into(),
        counterparty: Counterparty::from_parts(row.counterparty_kind.into(), row.counterparty_id),
        method: row.method.into(),
        amount: Money::new(row.amount),
        reference: row.reference,
        notes: row.notes,
        payment_date: row.payment_date,
        created_by: user(row.created_by),
        created_at: row.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_inventory::NewProduct;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_row_round_trip() {
        let product = NewProduct {
            name: "Urea 45kg".to_string(),
            sku: "UREA-45".to_string(),
            sale_price: Some(Money::new(dec!(266.50))),
            stock: Some(-3),
            ..Default::default()
        }
        .into_product()
        .unwrap();

        let back = row_to_product(product_to_row(&product)).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_negative_stored_gst_rate_is_internal_error() {
        let product = NewProduct {
            name: "Urea 45kg".to_string(),
            sku: "UREA-45".to_string(),
            ..Default::default()
        }
        .into_product()
        .unwrap();
        let mut row = product_to_row(&product);
        row.gst_rate = dec!(-1);

        assert!(matches!(row_to_product(row), Err(PortError::Internal { .. })));
    }

    #[test]
    fn test_sale_lines_numbered_from_one() {
        let product = NewProduct {
            name: "DAP 50kg".to_string(),
            sku: "DAP-50".to_string(),
            sale_price: Some(Money::new(dec!(1350))),
            ..Default::default()
        }
        .into_product()
        .unwrap();
        let request = domain_billing::SaleRequest {
            items: vec![
                domain_billing::LineRequest {
                    product_id: product.id,
                    quantity: 1,
                    rate: None,
                    gst_rate: None,
                },
                domain_billing::LineRequest {
                    product_id: product.id,
                    quantity: 2,
                    rate: None,
                    gst_rate: None,
                },
            ],
            ..Default::default()
        };
        let draft = SaleDraft::build(request, &[product], None).unwrap();
        let (sale, items) = draft_to_rows(SaleId::new_v7(), &draft);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_no, 1);
        assert_eq!(items[1].line_no, 2);
        assert_eq!(sale.total, dec!(4252.5));
    }
}
