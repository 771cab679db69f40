//! Application services and their wiring
//!
//! [`BackOfficeServices`] builds every service from a single store that
//! implements all the ports, so postings that span domains (a sale touches
//! products, customers and invoices) run in one transaction of that store.

mod sales;
mod payments;
mod reports;

pub use sales::SalesService;
pub(crate) use sales::with_customers;
pub use payments::PaymentService;
pub use reports::ReportService;

use std::sync::Arc;

use core_kernel::HealthCheckable;
use domain_inventory::{CatalogPort, InventoryService};
use domain_party::{PartyPort, PartyService};

use crate::ports::{PaymentsPort, PostingOptions, ReportsPort, SalesPort};

/// A store implementing every back-office port
pub trait BackOfficeStore: CatalogPort + PartyPort + SalesPort + PaymentsPort + ReportsPort {}

impl<T> BackOfficeStore for T where T: CatalogPort + PartyPort + SalesPort + PaymentsPort + ReportsPort {}

/// All application services, sharing one store
#[derive(Clone)]
pub struct BackOfficeServices {
    pub inventory: InventoryService,
    pub parties: PartyService,
    pub sales: SalesService,
    pub payments: PaymentService,
    pub reports: ReportService,
    pub health: Arc<dyn HealthCheckable>,
}

impl BackOfficeServices {
    pub fn new<S: BackOfficeStore>(store: Arc<S>, options: PostingOptions, low_stock_threshold: i64) -> Self {
        let catalog: Arc<dyn CatalogPort> = store.clone();
        let parties: Arc<dyn PartyPort> = store.clone();
        let sales: Arc<dyn SalesPort> = store.clone();
        let payments: Arc<dyn PaymentsPort> = store.clone();
        let reports: Arc<dyn ReportsPort> = store.clone();
        let health: Arc<dyn HealthCheckable> = store;

        Self {
            inventory: InventoryService::new(catalog.clone()),
            parties: PartyService::new(parties.clone()),
            sales: SalesService::new(sales.clone(), catalog.clone(), parties.clone(), options),
            payments: PaymentService::new(payments, parties.clone()),
            reports: ReportService::new(reports, sales, parties, low_stock_threshold),
            health,
        }
    }
}
