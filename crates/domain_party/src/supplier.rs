//! Supplier ledger accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Money, SupplierId};

use crate::customer::{non_blank, normalize_gst_number};

/// A supplier with a running account balance
///
/// Incoming payments raise the balance and outgoing payments lower it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
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

impl Supplier {
    /// Merges an update into this supplier; the balance is never touched
    pub fn apply_update(&mut self, update: SupplierUpdate) {
        let update = update.normalized();
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(contact_person) = update.contact_person {
            self.contact_person = Some(contact_person);
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(gst_number) = update.gst_number {
            self.gst_number = Some(gst_number);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        self.updated_at = Utc::now();
    }
}

/// Data for a new supplier; the balance always starts at zero
#[derive(Debug, Clone, Default)]
pub struct NewSupplier {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub notes: Option<String>,
}

impl NewSupplier {
    pub fn into_supplier(self) -> Supplier {
        let now = Utc::now();
        Supplier {
            id: SupplierId::new_v7(),
            name: self.name.trim().to_string(),
            contact_person: non_blank(self.contact_person),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            gst_number: normalize_gst_number(self.gst_number),
            account_balance: Money::ZERO,
            notes: non_blank(self.notes),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of supplier details
#[derive(Debug, Clone, Default)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub notes: Option<String>,
}

impl SupplierUpdate {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            contact_person: non_blank(self.contact_person),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            gst_number: normalize_gst_number(self.gst_number),
            notes: non_blank(self.notes),
        }
    }
}
