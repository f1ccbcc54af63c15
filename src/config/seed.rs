//! Seed configuration loading from config.toml
//!
//! Suppliers listed in config.toml are inserted on startup when missing, so a fresh
//! database can accept purchase orders right away.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Suppliers to seed
    #[serde(default)]
    pub suppliers: Vec<SupplierConfig>,
}

/// Configuration for a single supplier
#[derive(Debug, Deserialize, Clone)]
pub struct SupplierConfig {
    /// Supplier name, used as the idempotency key when seeding
    pub name: String,
    /// Postal address
    #[serde(default)]
    pub address: Option<String>,
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Returns the config path from `SHOPKEEP_CONFIG`, or `config.toml`.
#[must_use]
pub fn config_path() -> String {
    std::env::var("SHOPKEEP_CONFIG").unwrap_or_else(|_| "config.toml".to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_supplier_config() {
        let toml_str = r#"
            [[suppliers]]
            name = "Northwind Textiles"
            address = "12 Harbour Rd"

            [[suppliers]]
            name = "Loom & Co"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.suppliers.len(), 2);
        assert_eq!(config.suppliers[0].name, "Northwind Textiles");
        assert_eq!(config.suppliers[0].address.as_deref(), Some("12 Harbour Rd"));
        assert!(config.suppliers[1].address.is_none());
    }

    #[test]
    fn test_empty_config_has_no_suppliers() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.suppliers.is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
