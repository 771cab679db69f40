//! Party validation rules
//!
//! # Validation Rules
//!
//! ## Customers and suppliers
//! - Name is required
//! - Email, when present, must look like an address
//! - Phone, when present, must contain 7 to 15 digits
//! - GST number, when present, should be a 15 character GSTIN (warning only)

use crate::customer::Customer;
use crate::supplier::Supplier;

/// Length of a GST identification number
const GSTIN_LENGTH: usize = 15;

/// Result of party validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the party is valid
    pub is_valid: bool,
    /// List of validation errors
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal issues)
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Adds a warning to the result
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator for customer and supplier records
pub struct PartyValidator;

impl PartyValidator {
    pub fn validate_customer(customer: &Customer) -> ValidationResult {
        let mut result = ValidationResult::ok();
        Self::validate_common(
            &customer.name,
            customer.email.as_deref(),
            customer.phone.as_deref(),
            customer.gst_number.as_deref(),
            &mut result,
        );
        result
    }

    pub fn validate_supplier(supplier: &Supplier) -> ValidationResult {
        let mut result = ValidationResult::ok();
        Self::validate_common(
            &supplier.name,
            supplier.email.as_deref(),
            supplier.phone.as_deref(),
            supplier.gst_number.as_deref(),
            &mut result,
        );
        result
    }

    fn validate_common(
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        gst_number: Option<&str>,
        result: &mut ValidationResult,
    ) {
        if name.trim().is_empty() {
            result.add_error("Name is required");
        }

        if let Some(email) = email {
            if !is_plausible_email(email) {
                result.add_error(format!("Invalid email format: {}", email));
            }
        }

        if let Some(phone) = phone {
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            if !(7..=15).contains(&digits) {
                result.add_error(format!("Invalid phone number: {}", phone));
            }
        }

        if let Some(gst_number) = gst_number {
            if gst_number.len() != GSTIN_LENGTH || !gst_number.chars().all(|c| c.is_ascii_alphanumeric()) {
                result.add_warning(format!("GST number {} is not a 15 character GSTIN", gst_number));
            }
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::NewCustomer;
    use crate::supplier::NewSupplier;

    #[test]
    fn test_valid_customer() {
        let customer = NewCustomer {
            name: "Suresh Yadav".to_string(),
            email: Some("suresh@example.in".to_string()),
            phone: Some("+91 98765 43210".to_string()),
            gst_number: Some("27AAPFU0939F1ZV".to_string()),
            ..Default::default()
        }
        .into_customer();
        let result = PartyValidator::validate_customer(&customer);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_name() {
        let customer = NewCustomer::default().into_customer();
        let result = PartyValidator::validate_customer(&customer);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("Name")));
    }

    #[test]
    fn test_bad_email() {
        let supplier = NewSupplier {
            name: "Bharat Agro Inputs".to_string(),
            email: Some("sales.bharat-agro".to_string()),
            ..Default::default()
        }
        .into_supplier();
        assert!(!PartyValidator::validate_supplier(&supplier).is_valid);
    }

    #[test]
    fn test_short_gstin_is_warning_only() {
        let supplier = NewSupplier {
            name: "Bharat Agro Inputs".to_string(),
            gst_number: Some("27AAPFU".to_string()),
            ..Default::default()
        }
        .into_supplier();
        let result = PartyValidator::validate_supplier(&supplier);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }
}
