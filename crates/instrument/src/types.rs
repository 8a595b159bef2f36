//! Core domain types for securities.

use common::{Error, Result};
use serde::{Deserialize, Serialize};

/// A tradable security and the quantity issued at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAsset {
    /// Ticker symbol, primary key.
    pub symbol: String,
    /// Descriptive name.
    pub name: String,
    /// Supply at issuance time.
    pub total_quantity: u64,
}

impl SecurityAsset {
    /// Create a security after validating its fields.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, total_quantity: u64) -> Result<Self> {
        let symbol = symbol.into();
        validate_symbol(&symbol)?;
        if total_quantity == 0 {
            return Err(Error::invalid_argument("issued quantity must be greater than 0"));
        }
        Ok(Self {
            symbol,
            name: name.into(),
            total_quantity,
        })
    }
}

/// Symbols are non-empty and contain no whitespace.
pub fn validate_symbol(symbol: &str) -> Result<()> {
    if symbol.is_empty() {
        return Err(Error::invalid_argument("symbol is required"));
    }
    if symbol.chars().any(char::is_whitespace) {
        return Err(Error::invalid_argument(format!(
            "symbol '{}' must not contain whitespace",
            symbol
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_security() {
        let asset = SecurityAsset::new("ACME", "Acme Corp", 100).unwrap();
        assert_eq!(asset.total_quantity, 100);
    }

    #[test]
    fn test_invalid_fields() {
        assert!(SecurityAsset::new("", "Empty", 1).is_err());
        assert!(SecurityAsset::new("AC ME", "Space", 1).is_err());
        assert!(SecurityAsset::new("ACME", "Zero", 0).is_err());
    }
}
