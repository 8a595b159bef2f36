//! Trader account entity

use std::collections::BTreeMap;

use common::{Error, HolderId, Result};
use serde::{Deserialize, Serialize};

/// Trading account of one holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderAccount {
    /// Holder identifier, primary key
    pub id: HolderId,
    /// Cash balance in currency units
    pub balance: i64,
    /// Security symbol -> quantity held; zero entries are never stored
    #[serde(default)]
    pub holdings: BTreeMap<String, u64>,
    /// Inactive accounts may not place orders
    pub active: bool,
}

impl TraderAccount {
    /// Create an active account with no holdings
    pub fn new(id: HolderId, balance: i64) -> Self {
        Self {
            id,
            balance,
            holdings: BTreeMap::new(),
            active: true,
        }
    }

    /// Quantity of `symbol` held, zero if none
    pub fn holding(&self, symbol: &str) -> u64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    /// Fail with `InsufficientHoldings` unless at least `quantity` of `symbol` is held
    pub fn ensure_holds(&self, symbol: &str, quantity: u64) -> Result<()> {
        let available = self.holding(symbol);
        if available < quantity {
            return Err(Error::InsufficientHoldings {
                holder: self.id.to_string(),
                symbol: symbol.to_string(),
                required: quantity,
                available,
            });
        }
        Ok(())
    }

    /// Fail with `InsufficientFunds` unless the balance covers `amount`
    pub fn ensure_funds(&self, amount: i64) -> Result<()> {
        if self.balance < amount {
            return Err(Error::InsufficientFunds {
                holder: self.id.to_string(),
                required: amount,
                available: self.balance,
            });
        }
        Ok(())
    }

    /// Add a signed `delta` to the holding of `symbol`
    ///
    /// A resulting quantity of 0 removes the entry. Going below zero is
    /// rejected with `InsufficientHoldings` and leaves the account unchanged.
    pub fn adjust_holding(&mut self, symbol: &str, delta: i64) -> Result<u64> {
        let current = self.holding(symbol);

        let updated = if delta >= 0 {
            current.checked_add(delta.unsigned_abs()).ok_or_else(|| {
                Error::invalid_argument(format!("holding of {} would overflow", symbol))
            })?
        } else {
            let needed = delta.unsigned_abs();
            self.ensure_holds(symbol, needed)?;
            current - needed
        };

        if updated == 0 {
            self.holdings.remove(symbol);
        } else {
            self.holdings.insert(symbol.to_string(), updated);
        }
        Ok(updated)
    }

    /// Add a signed `delta` to the balance
    ///
    /// A negative result is rejected with `InsufficientFunds` and leaves the
    /// account unchanged.
    pub fn adjust_balance(&mut self, delta: i64) -> Result<i64> {
        let updated = self
            .balance
            .checked_add(delta)
            .ok_or_else(|| Error::invalid_argument("balance would overflow"))?;

        if updated < 0 {
            return Err(Error::InsufficientFunds {
                holder: self.id.to_string(),
                required: delta.checked_neg().unwrap_or(i64::MAX),
                available: self.balance,
            });
        }

        self.balance = updated;
        Ok(updated)
    }
}
