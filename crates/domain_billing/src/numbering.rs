//! Invoice numbering
//!
//! Invoice numbers look like `AGRO-0001`: a prefix and a sequence value
//! zero-padded to a minimum width. Wider values simply grow (`AGRO-10000`).
//! The sequence itself is allocated by the store inside the posting
//! transaction; this module only formats and parses.

use crate::error::BillingError;

/// Default invoice prefix
pub const DEFAULT_PREFIX: &str = "AGRO";

/// Default minimum number of digits
pub const DEFAULT_MIN_DIGITS: usize = 4;

/// Formatting rules for invoice numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceNumbering {
    prefix: String,
    min_digits: usize,
}

impl InvoiceNumbering {
    /// Creates numbering rules
    ///
    /// # Errors
    ///
    /// `BillingError::InvalidInput` if the prefix is empty or not ASCII
    /// alphanumeric, or the width is zero
    pub fn new(prefix: impl Into<String>, min_digits: usize) -> Result<Self, BillingError> {
        let prefix = prefix.into();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(BillingError::invalid(format!(
                "invoice prefix must be ASCII alphanumeric, got {:?}",
                prefix
            )));
        }
        if min_digits == 0 {
            return Err(BillingError::invalid("invoice number width must be at least 1"));
        }
        Ok(Self { prefix, min_digits })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn min_digits(&self) -> usize {
        self.min_digits
    }

    /// Formats a sequence value as an invoice number
    pub fn format(&self, sequence: i64) -> String {
        format!("{}-{:0width$}", self.prefix, sequence, width = self.min_digits)
    }

    /// Extracts the sequence value from an invoice number with this prefix
    pub fn parse(&self, invoice_number: &str) -> Option<i64> {
        let digits = invoice_number
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('-')?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl Default for InvoiceNumbering {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            min_digits: DEFAULT_MIN_DIGITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_width() {
        let numbering = InvoiceNumbering::default();
        assert_eq!(numbering.format(1), "AGRO-0001");
        assert_eq!(numbering.format(42), "AGRO-0042");
    }

    #[test]
    fn test_format_grows_past_width() {
        let numbering = InvoiceNumbering::default();
        assert_eq!(numbering.format(10000), "AGRO-10000");
    }

    #[test]
    fn test_parse_round_trip() {
        let numbering = InvoiceNumbering::new("INV", 6).unwrap();
        assert_eq!(numbering.parse(&numbering.format(123)), Some(123));
        assert_eq!(numbering.parse("AGRO-0001"), None);
        assert_eq!(numbering.parse("INV-"), None);
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        assert!(InvoiceNumbering::new("", 4).is_err());
        assert!(InvoiceNumbering::new("AG-RO", 4).is_err());
        assert!(InvoiceNumbering::new("AGRO", 0).is_err());
    }
}
