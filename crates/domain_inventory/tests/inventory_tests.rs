//! Tests for the inventory domain rules

use chrono::Utc;
use core_kernel::{GstRate, Money, ProductId};
use domain_inventory::{
    InventoryError, NewProduct, OversellPolicy, Product, ProductUpdate, StockMovement,
    StockMovementType,
};
use proptest::prelude::*;
use rust_decimal_macros::dec;

fn product_with_stock(stock: i64) -> Product {
    NewProduct {
        name: "Hybrid Paddy Seed".to_string(),
        sku: "HPS-10".to_string(),
        sale_price: Some(Money::new(dec!(450))),
        gst_rate: Some(GstRate::from_percentage(dec!(12)).unwrap()),
        stock: Some(stock),
        ..Default::default()
    }
    .into_product()
    .unwrap()
}

// ============================================================================
// Catalog
// ============================================================================

mod catalog_tests {
    use super::*;

    #[test]
    fn test_new_product_trims_name_and_sku() {
        let product = NewProduct {
            name: "  Neem Oil  ".to_string(),
            sku: " NEEM-1 ".to_string(),
            ..Default::default()
        }
        .into_product()
        .unwrap();
        assert_eq!(product.name, "Neem Oil");
        assert_eq!(product.sku, "NEEM-1");
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_negative_sale_price_rejected() {
        let result = NewProduct {
            name: "Neem Oil".to_string(),
            sku: "NEEM-1".to_string(),
            sale_price: Some(Money::new(dec!(-10))),
            ..Default::default()
        }
        .into_product();
        assert!(matches!(result, Err(InventoryError::InvalidInput(_))));
    }

    #[test]
    fn test_update_leaves_stock_alone() {
        let mut product = product_with_stock(7);
        product.apply_update(ProductUpdate {
            sale_price: Some(Money::new(dec!(480))),
            ..Default::default()
        });
        assert_eq!(product.sale_price.amount(), dec!(480));
        assert_eq!(product.stock, 7);
    }

    #[test]
    fn test_update_validation() {
        let update = ProductUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_low_stock_is_strict() {
        let product = product_with_stock(10);
        assert!(!product.is_low_stock(10));
        assert!(product.is_low_stock(11));
    }
}

// ============================================================================
// Stock movements
// ============================================================================

mod movement_tests {
    use super::*;

    #[test]
    fn test_transaction_copies_movement() {
        let movement = StockMovement::new(
            ProductId::new(),
            StockMovementType::Purchase,
            12,
            Some(Money::new(dec!(390))),
            Some("Invoice 88 from co-op".to_string()),
            None,
        )
        .unwrap();
        let at = Utc::now();
        let transaction = movement.to_transaction(at);
        assert_eq!(transaction.product_id, movement.product_id);
        assert_eq!(transaction.quantity, 12);
        assert_eq!(transaction.unit_cost.amount(), dec!(390));
        assert_eq!(transaction.transaction_date, at);
    }

    #[test]
    fn test_adjustment_always_increments() {
        let mut product = product_with_stock(0);
        let movement =
            StockMovement::new(product.id, StockMovementType::Adjustment, 4, None, None, None).unwrap();
        product.apply_movement(&movement).unwrap();
        assert_eq!(product.stock, 4);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let result = StockMovement::new(ProductId::new(), StockMovementType::Sale, -3, None, None, None);
        assert!(result.is_err());
    }
}

// ============================================================================
// Properties
// ============================================================================

fn movement_type() -> impl Strategy<Value = StockMovementType> {
    prop_oneof![
        Just(StockMovementType::Purchase),
        Just(StockMovementType::Sale),
        Just(StockMovementType::Adjustment),
    ]
}

proptest! {
    #[test]
    fn manual_movements_never_go_negative(
        initial in 0i64..100,
        moves in proptest::collection::vec((movement_type(), 1i64..50), 0..40)
    ) {
        let mut product = product_with_stock(initial);
        let mut expected = initial;
        for (kind, quantity) in moves {
            let movement = StockMovement::new(product.id, kind, quantity, None, None, None).unwrap();
            let before = product.stock;
            match product.apply_movement(&movement) {
                Ok(()) => expected += kind.signed_delta(quantity),
                Err(_) => prop_assert_eq!(product.stock, before),
            }
            prop_assert!(product.stock >= 0);
        }
        prop_assert_eq!(product.stock, expected);
    }

    #[test]
    fn oversell_allowed_is_plain_subtraction(initial in -100i64..100, quantity in 1i64..500) {
        let mut product = product_with_stock(initial);
        product.remove_for_sale(quantity, OversellPolicy::Allow).unwrap();
        prop_assert_eq!(product.stock, initial - quantity);
    }
}
