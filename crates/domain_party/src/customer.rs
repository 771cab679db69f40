//! Customer ledger accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, Money};

/// A customer with a running outstanding balance
///
/// `outstanding_balance` is what the customer owes the shop. It is written
/// only by invoice posting and payment posting, never by catalog-style
/// updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Stored lower-case
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub outstanding_balance: Money,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Merges an update into this customer; the balance is never touched
    pub fn apply_update(&mut self, update: CustomerUpdate) {
        let update = update.normalized();
        if let Some(name) = update.name {
            self.name = name;
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
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }
}

/// Data for a new customer; the balance always starts at zero
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub tags: Vec<String>,
}

impl NewCustomer {
    /// Builds the customer with a fresh id and zero balance
    pub fn into_customer(self) -> Customer {
        let now = Utc::now();
        Customer {
            id: CustomerId::new_v7(),
            name: self.name.trim().to_string(),
            email: normalize_email(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            gst_number: normalize_gst_number(self.gst_number),
            outstanding_balance: Money::ZERO,
            tags: normalize_tags(self.tags),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of customer details
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CustomerUpdate {
    /// Applies the same normalization as customer creation
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            email: normalize_email(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            gst_number: normalize_gst_number(self.gst_number),
            tags: self.tags.map(normalize_tags),
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn normalize_email(email: Option<String>) -> Option<String> {
    non_blank(email).map(|e| e.to_lowercase())
}

pub(crate) fn normalize_gst_number(gst_number: Option<String>) -> Option<String> {
    non_blank(gst_number).map(|g| g.to_uppercase())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_lowercased_on_create() {
        let customer = NewCustomer {
            name: "Ramesh Patel".to_string(),
            email: Some("Ramesh.Patel@Example.COM".to_string()),
            ..Default::default()
        }
        .into_customer();
        assert_eq!(customer.email.as_deref(), Some("ramesh.patel@example.com"));
        assert!(customer.outstanding_balance.is_zero());
    }

    #[test]
    fn test_tags_deduplicated() {
        let customer = NewCustomer {
            name: "Kisan Sewa Kendra".to_string(),
            tags: vec!["wholesale".into(), " wholesale ".into(), "".into(), "credit".into()],
            ..Default::default()
        }
        .into_customer();
        assert_eq!(customer.tags, vec!["wholesale".to_string(), "credit".to_string()]);
    }

    #[test]
    fn test_update_keeps_balance() {
        let mut customer = NewCustomer {
            name: "Anita Devi".to_string(),
            ..Default::default()
        }
        .into_customer();
        customer.outstanding_balance = Money::from_paise(31500);
        customer.apply_update(CustomerUpdate {
            email: Some("ANITA@FARM.IN".to_string()),
            ..Default::default()
        });
        assert_eq!(customer.email.as_deref(), Some("anita@farm.in"));
        assert_eq!(customer.outstanding_balance, Money::from_paise(31500));
    }
}
