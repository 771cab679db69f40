//! Customer and supplier DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::Money;
use domain_billing::{LedgerTotals, PendingCustomer, Reconciliation};
use domain_party::{
    CounterpartyKind, CounterpartySummary, Customer, CustomerUpdate, NewCustomer, NewSupplier,
    Supplier, SupplierUpdate,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<CreateCustomerRequest> for NewCustomer {
    fn from(request: CreateCustomerRequest) -> Self {
        NewCustomer {
            name: request.name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            gst_number: request.gst_number,
            tags: request.tags,
        }
    }
}

/// Partial update; the balance cannot be written through this body
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<UpdateCustomerRequest> for CustomerUpdate {
    fn from(request: UpdateCustomerRequest) -> Self {
        CustomerUpdate {
            name: request.name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            gst_number: request.gst_number,
            tags: request.tags,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub outstanding_balance: Money,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: *customer.id.as_uuid(),
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            gst_number: customer.gst_number,
            outstanding_balance: customer.outstanding_balance,
            tags: customer.tags,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub contact_person: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub notes: Option<String>,
}

impl From<CreateSupplierRequest> for NewSupplier {
    fn from(request: CreateSupplierRequest) -> Self {
        NewSupplier {
            name: request.name,
            contact_person: request.contact_person,
            email: request.email,
            phone: request.phone,
            address: request.address,
            gst_number: request.gst_number,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub contact_person: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub notes: Option<String>,
}

impl From<UpdateSupplierRequest> for SupplierUpdate {
    fn from(request: UpdateSupplierRequest) -> Self {
        SupplierUpdate {
            name: request.name,
            contact_person: request.contact_person,
            email: request.email,
            phone: request.phone,
            address: request.address,
            gst_number: request.gst_number,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierResponse {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub account_balance: Money,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Supplier> for SupplierResponse {
    fn from(supplier: Supplier) -> Self {
        Self {
            id: *supplier.id.as_uuid(),
            name: supplier.name,
            contact_person: supplier.contact_person,
            email: supplier.email,
            phone: supplier.phone,
            address: supplier.address,
            gst_number: supplier.gst_number,
            account_balance: supplier.account_balance,
            notes: supplier.notes,
            created_at: supplier.created_at,
            updated_at: supplier.updated_at,
        }
    }
}

/// Resolved counterparty shown next to a payment or invoice
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub balance: Money,
}

impl From<CounterpartySummary> for CounterpartyResponse {
    fn from(summary: CounterpartySummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            phone: summary.phone,
            balance: summary.balance,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCustomerResponse {
    pub customer: CustomerResponse,
    pub total_pending: Money,
    pub invoice_count: i64,
}

impl From<PendingCustomer> for PendingCustomerResponse {
    fn from(pending: PendingCustomer) -> Self {
        Self {
            customer: pending.customer.into(),
            total_pending: pending.total_pending,
            invoice_count: pending.invoice_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotalsResponse {
    pub billed: Money,
    pub received: Money,
    pub paid_out: Money,
}

impl From<LedgerTotals> for LedgerTotalsResponse {
    fn from(totals: LedgerTotals) -> Self {
        Self {
            billed: totals.billed,
            received: totals.received,
            paid_out: totals.paid_out,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResponse {
    pub entity_type: CounterpartyKind,
    pub entity: Uuid,
    pub name: String,
    pub totals: LedgerTotalsResponse,
    pub recomputed_balance: Money,
    pub stored_balance: Money,
    pub drift: Money,
    pub consistent: bool,
}

impl From<Reconciliation> for ReconciliationResponse {
    fn from(report: Reconciliation) -> Self {
        Self {
            entity_type: report.counterparty.kind(),
            entity: report.counterparty.uuid(),
            consistent: report.is_consistent(),
            name: report.name,
            totals: report.totals.into(),
            recomputed_balance: report.recomputed_balance,
            stored_balance: report.stored_balance,
            drift: report.drift,
        }
    }
}
