//! API configuration
//!
//! Values come from `API_`-prefixed environment variables layered over the
//! defaults below. The server binary loads `.env` first.

use serde::Deserialize;

use domain_billing::{BillingError, InvoiceNumbering, PostingOptions};
use domain_inventory::OversellPolicy;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format
    pub log_json: bool,
    pub invoice_prefix: String,
    pub invoice_min_digits: usize,
    /// Whether invoice posting may take stock below zero
    pub allow_oversell: bool,
    /// Products with stock strictly below this show on the dashboard
    pub low_stock_threshold: i64,
    pub max_connections: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/backoffice".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            invoice_prefix: "AGRO".to_string(),
            invoice_min_digits: 4,
            allow_oversell: true,
            low_stock_threshold: 10,
            max_connections: 10,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(config::Environment::with_prefix("API").try_parsing(true))
    }

    /// Loads configuration from an environment source over the defaults
    pub fn load(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expiration_secs", defaults.jwt_expiration_secs as i64)?
            .set_default("database_url", defaults.database_url)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_json", defaults.log_json)?
            .set_default("invoice_prefix", defaults.invoice_prefix)?
            .set_default("invoice_min_digits", defaults.invoice_min_digits as i64)?
            .set_default("allow_oversell", defaults.allow_oversell)?
            .set_default("low_stock_threshold", defaults.low_stock_threshold)?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Invoice numbering and oversell rules for the posting services
    ///
    /// # Errors
    ///
    /// `BillingError::InvalidInput` for an unusable prefix or width
    pub fn posting_options(&self) -> Result<PostingOptions, BillingError> {
        Ok(PostingOptions {
            numbering: InvoiceNumbering::new(self.invoice_prefix.clone(), self.invoice_min_digits)?,
            oversell: OversellPolicy::from_allow(self.allow_oversell),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("API")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults_apply_without_environment() {
        let config = ApiConfig::load(env(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.invoice_prefix, "AGRO");
        assert_eq!(config.invoice_min_digits, 4);
        assert!(config.allow_oversell);
        assert!(!config.log_json);
        assert_eq!(config.low_stock_threshold, 10);
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let config = ApiConfig::load(env(&[
            ("API_PORT", "9090"),
            ("API_JWT_SECRET", "s3cret"),
            ("API_ALLOW_OVERSELL", "false"),
            ("API_INVOICE_PREFIX", "INV"),
            ("API_LOG_JSON", "true"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.jwt_secret, "s3cret");
        assert!(!config.allow_oversell);
        assert!(config.log_json);
        assert_eq!(config.server_addr(), "0.0.0.0:9090");

        let options = config.posting_options().unwrap();
        assert_eq!(options.numbering.format(7), "INV-0007");
        assert_eq!(options.oversell, OversellPolicy::Reject);
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        let config = ApiConfig {
            invoice_prefix: "A-B".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.posting_options().is_err());
    }
}
