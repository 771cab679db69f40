//! PostgreSQL adapter tests
//!
//! Each test starts its own container, so they are ignored by default.
//! Run with `cargo test -p infra_db -- --ignored` where Docker is available.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::{CustomerId, HealthCheckable, Money, ProductId};
use domain_billing::{
    BackOfficeServices, BillingError, InvoiceNumbering, PaymentDirection, PostingOptions,
};
use domain_inventory::{InventoryError, OversellPolicy, StockMovementRequest, StockMovementType};
use domain_party::{Counterparty, PartyError};
use infra_db::PostgresBackOffice;
use test_utils::{
    assert_balance_changed, assert_invoice_number, assert_ledger_consistent, assert_money_eq,
    assert_sale_totals_consistent, assert_unique_invoice_numbers, create_isolated_test_database,
    DatabaseTestAssertions, PartyFixtures, ProductFixtures, TestDatabase, TestPaymentBuilder,
    TestProductBuilder, TestSaleBuilder,
};

async fn setup(oversell: OversellPolicy) -> (TestDatabase, BackOfficeServices) {
    let db = create_isolated_test_database()
        .await
        .expect("Failed to start test database");
    let store = Arc::new(PostgresBackOffice::new(db.pool().clone()));
    let options = PostingOptions {
        numbering: InvoiceNumbering::default(),
        oversell,
    };
    let services = BackOfficeServices::new(store, options, 10);
    (db, services)
}

mod catalog_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_product_crud_and_duplicate_sku() {
        let (_db, services) = setup(OversellPolicy::Allow).await;

        let created = services
            .inventory
            .create_product(ProductFixtures::standard())
            .await
            .unwrap();
        let fetched = services.inventory.get_product(created.id).await.unwrap();
        assert_eq!(fetched.sku, "UREA-45");
        assert_money_eq(fetched.sale_price, Money::new(dec!(100)));

        let err = services
            .inventory
            .create_product(ProductFixtures::standard())
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Conflict(_)));

        let found = services
            .inventory
            .list_products(Some("urea".to_string()))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        services.inventory.delete_product(created.id).await.unwrap();
        let err = services.inventory.get_product(created.id).await.unwrap_err();
        assert!(matches!(err, InventoryError::ProductNotFound(_)));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_stock_movement_writes_audit_row() {
        let (_db, services) = setup(OversellPolicy::Allow).await;
        let product = services
            .inventory
            .create_product(ProductFixtures::standard())
            .await
            .unwrap();

        let updated = services
            .inventory
            .adjust_stock(
                product.id,
                StockMovementRequest {
                    movement_type: StockMovementType::Purchase,
                    quantity: 30,
                    unit_cost: Some(Money::new(dec!(78))),
                    note: Some("Delivery".to_string()),
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(updated.stock, 50);

        let log = services.inventory.list_transactions().await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].quantity, 30);
        assert_eq!(log[0].movement_type, StockMovementType::Purchase);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_outbound_movement_respects_floor() {
        let (_db, services) = setup(OversellPolicy::Allow).await;
        let product = services
            .inventory
            .create_product(ProductFixtures::scarce())
            .await
            .unwrap();

        let err = services
            .inventory
            .adjust_stock(
                product.id,
                StockMovementRequest {
                    movement_type: StockMovementType::Sale,
                    quantity: 3,
                    unit_cost: None,
                    note: None,
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::InsufficientStock { requested: 3, .. }));
        assert_eq!(services.inventory.get_product(product.id).await.unwrap().stock, 2);
        assert!(services.inventory.list_transactions().await.unwrap().is_empty());
    }
}

mod posting_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_sale_then_payment_settles_balance() {
        let (_db, services) = setup(OversellPolicy::Allow).await;
        let product = services
            .inventory
            .create_product(ProductFixtures::standard())
            .await
            .unwrap();
        let customer = services
            .parties
            .create_customer(PartyFixtures::customer())
            .await
            .unwrap();

        let sale = services
            .sales
            .create_sale(
                TestSaleBuilder::new()
                    .for_customer(customer.id)
                    .line(product.id, 3)
                    .build(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(sale.invoice_number, "AGRO-0001");
        assert_money_eq(sale.total, Money::new(dec!(315)));
        assert_sale_totals_consistent(&sale);

        let stored = services.sales.get_sale(sale.id).await.unwrap();
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].product_name, "Urea 45kg");
        assert_eq!(services.inventory.get_product(product.id).await.unwrap().stock, 17);

        let billed = services.parties.get_customer(customer.id).await.unwrap();
        services
            .payments
            .post_payment(
                TestPaymentBuilder::received_from(customer.id, Money::new(dec!(200))).build(),
                None,
            )
            .await
            .unwrap();
        let settled = services.parties.get_customer(customer.id).await.unwrap();
        assert_balance_changed(
            billed.outstanding_balance,
            settled.outstanding_balance,
            Money::new(dec!(-200)),
        );

        let report = services.reports.reconcile_customer(customer.id).await.unwrap();
        assert_ledger_consistent(&report);
        assert_money_eq(report.recomputed_balance, Money::new(dec!(115)));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_unknown_customer_rolls_back() {
        let (db, services) = setup(OversellPolicy::Allow).await;
        let product = services
            .inventory
            .create_product(ProductFixtures::standard())
            .await
            .unwrap();

        let err = services
            .sales
            .create_sale(
                TestSaleBuilder::new()
                    .for_customer(CustomerId::new())
                    .line(product.id, 2)
                    .build(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::NotFound { .. }));
        assert_eq!(services.inventory.get_product(product.id).await.unwrap().stock, 20);
        assert!(services.sales.list_sales().await.unwrap().is_empty());
        assert_eq!(db.row_count("sale_items").await.unwrap(), 0);
        assert_eq!(db.row_count("invoice_sequences").await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_unknown_product_rejected_before_posting() {
        let (_db, services) = setup(OversellPolicy::Allow).await;
        let product = services
            .inventory
            .create_product(ProductFixtures::standard())
            .await
            .unwrap();

        let err = services
            .sales
            .create_sale(
                TestSaleBuilder::new()
                    .line(product.id, 1)
                    .line(ProductId::new(), 1)
                    .build(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::NotFound { .. }));
        assert_eq!(services.inventory.get_product(product.id).await.unwrap().stock, 20);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_rejected_oversell_keeps_numbering_gapless() {
        let (_db, services) = setup(OversellPolicy::Reject).await;
        let plenty = services
            .inventory
            .create_product(ProductFixtures::standard())
            .await
            .unwrap();
        let scarce = services
            .inventory
            .create_product(ProductFixtures::scarce())
            .await
            .unwrap();

        let err = services
            .sales
            .create_sale(
                TestSaleBuilder::new()
                    .line(plenty.id, 5)
                    .line(scarce.id, 3)
                    .build(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::InsufficientStock { requested: 3, .. }));
        assert_eq!(services.inventory.get_product(plenty.id).await.unwrap().stock, 20);

        let sale = services
            .sales
            .create_sale(TestSaleBuilder::new().line(plenty.id, 1).build(), None)
            .await
            .unwrap();
        assert_eq!(sale.invoice_number, "AGRO-0001");
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_allowed_oversell_goes_negative() {
        let (_db, services) = setup(OversellPolicy::Allow).await;
        let scarce = services
            .inventory
            .create_product(ProductFixtures::scarce())
            .await
            .unwrap();

        services
            .sales
            .create_sale(TestSaleBuilder::new().line(scarce.id, 5).build(), None)
            .await
            .unwrap();
        assert_eq!(services.inventory.get_product(scarce.id).await.unwrap().stock, -3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "requires Docker"]
    async fn test_concurrent_postings_get_distinct_numbers() {
        let (_db, services) = setup(OversellPolicy::Allow).await;
        let product = services
            .inventory
            .create_product(TestProductBuilder::new().with_stock(1_000).build_request())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let sales = services.sales.clone();
            let product_id = product.id;
            handles.push(tokio::spawn(async move {
                sales
                    .create_sale(TestSaleBuilder::new().line(product_id, 2).build(), None)
                    .await
            }));
        }

        let mut sales = Vec::new();
        for handle in handles {
            sales.push(handle.await.unwrap().unwrap());
        }
        assert_unique_invoice_numbers(&sales);

        let numbering = InvoiceNumbering::default();
        let sequences: HashSet<i64> = sales
            .iter()
            .map(|sale| assert_invoice_number(&numbering, &sale.invoice_number))
            .collect();
        assert_eq!(sequences, (1..=20).collect::<HashSet<i64>>());
        assert_eq!(services.inventory.get_product(product.id).await.unwrap().stock, 960);
    }
}

mod payment_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_supplier_payments_follow_sign_table() {
        let (_db, services) = setup(OversellPolicy::Allow).await;
        let supplier = services
            .parties
            .create_supplier(PartyFixtures::supplier())
            .await
            .unwrap();

        services
            .payments
            .post_payment(
                TestPaymentBuilder::new(
                    PaymentDirection::Incoming,
                    Counterparty::Supplier(supplier.id),
                    Money::new(dec!(500)),
                )
                .build(),
                None,
            )
            .await
            .unwrap();
        services
            .payments
            .post_payment(
                TestPaymentBuilder::paid_to(supplier.id, Money::new(dec!(120))).build(),
                None,
            )
            .await
            .unwrap();

        let stored = services.parties.get_supplier(supplier.id).await.unwrap();
        assert_money_eq(stored.account_balance, Money::new(dec!(380)));

        let report = services.reports.reconcile_supplier(supplier.id).await.unwrap();
        assert_ledger_consistent(&report);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_payment_to_deleted_customer_fails() {
        let (_db, services) = setup(OversellPolicy::Allow).await;
        let customer = services
            .parties
            .create_customer(PartyFixtures::random_customer())
            .await
            .unwrap();
        services.parties.delete_customer(customer.id).await.unwrap();

        let err = services
            .payments
            .post_payment(
                TestPaymentBuilder::received_from(customer.id, Money::new(dec!(50))).build(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::NotFound { .. }));
        assert!(services.payments.list_payments().await.unwrap().is_empty());

        let err = services.parties.get_customer(customer.id).await.unwrap_err();
        assert!(matches!(err, PartyError::NotFound { .. }));
    }
}

mod report_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_reconciliation_detects_drift() {
        let (db, services) = setup(OversellPolicy::Allow).await;
        let product = services
            .inventory
            .create_product(ProductFixtures::standard())
            .await
            .unwrap();
        let customer = services
            .parties
            .create_customer(PartyFixtures::customer())
            .await
            .unwrap();
        services
            .sales
            .create_sale(
                TestSaleBuilder::new()
                    .for_customer(customer.id)
                    .line(product.id, 3)
                    .build(),
                None,
            )
            .await
            .unwrap();

        sqlx::query("UPDATE customers SET outstanding_balance = outstanding_balance - 15 WHERE id = $1")
            .bind(customer.id.as_uuid())
            .execute(db.pool())
            .await
            .unwrap()
            .assert_rows_affected(1);

        let report = services.reports.reconcile_customer(customer.id).await.unwrap();
        assert!(!report.is_consistent());
        assert_money_eq(report.drift, Money::new(dec!(-15)));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_dashboard_and_overview() {
        let (_db, services) = setup(OversellPolicy::Allow).await;
        let urea = services
            .inventory
            .create_product(ProductFixtures::standard())
            .await
            .unwrap();
        let scarce = services
            .inventory
            .create_product(ProductFixtures::scarce())
            .await
            .unwrap();
        let customer = services
            .parties
            .create_customer(PartyFixtures::customer())
            .await
            .unwrap();

        services
            .sales
            .create_sale(
                TestSaleBuilder::new()
                    .for_customer(customer.id)
                    .line(urea.id, 1)
                    .build(),
                None,
            )
            .await
            .unwrap();
        services
            .sales
            .create_sale(TestSaleBuilder::new().line(urea.id, 2).build(), None)
            .await
            .unwrap();

        let dashboard = services.reports.dashboard().await.unwrap();
        assert_eq!(dashboard.counts.products, 2);
        assert_eq!(dashboard.counts.customers, 1);
        assert_eq!(dashboard.counts.sales, 2);
        assert!(dashboard.low_stock.iter().any(|p| p.id == scarce.id));
        assert_eq!(dashboard.pending_customers, 1);
        assert_money_eq(dashboard.pending_total, Money::new(dec!(105)));

        let overview = services.reports.overview().await.unwrap();
        assert_money_eq(overview.sales_total, Money::new(dec!(315)));
        assert_eq!(overview.recent_sales.len(), 2);
        assert_eq!(overview.recent_sales[0].sale.invoice_number, "AGRO-0002");

        let monthly = services.reports.sales_by_month().await.unwrap();
        assert_eq!(monthly.len(), 1);
        assert_money_eq(monthly[0].total, Money::new(dec!(315)));

        let health = services.health.health_check().await;
        assert!(health.is_ready());
    }
}
