//! Common types used across HypExchange
//!
//! This module provides the fundamental domain types used throughout
//! the exchange core.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Number of hex characters kept from the principal digest
const HOLDER_ID_LEN: usize = 16;

/// Holder identifier (HIN) - primary key of a trading account
///
/// Derived deterministically from the caller's principal so the same
/// identity always lands on the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderId(String);

impl HolderId {
    /// Derive the HIN for a raw caller principal
    pub fn derive(principal: &str) -> Result<Self> {
        if principal.is_empty() {
            return Err(Error::invalid_argument("caller principal is empty"));
        }
        let digest = Sha256::digest(principal.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(HOLDER_ID_LEN);
        Ok(Self(encoded))
    }

    /// Wrap an already-derived HIN (e.g. a counterparty id supplied by a caller)
    pub fn parse(hin: impl Into<String>) -> Result<Self> {
        let hin = hin.into();
        if hin.is_empty() {
            return Err(Error::invalid_argument("holder id is empty"));
        }
        Ok(Self(hin))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage key of an order slot
///
/// Either assigned from the ledger sequence counter or supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderKey(String);

impl OrderKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::invalid_argument("order key is empty"));
        }
        Ok(Self(key))
    }

    /// Key assigned from the sequence counter
    pub fn from_sequence(sequence: u64) -> Self {
        Self(sequence.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "buy" | "b" => Ok(Side::Buy),
            "sell" | "s" => Ok(Side::Sell),
            other => Err(Error::invalid_argument(format!("unknown side: {}", other))),
        }
    }
}
