//! Exchange runtime settings

use account::DEFAULT_STARTING_BALANCE;

/// Settings the exchange needs at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeSettings {
    /// Balance credited to newly registered traders
    pub starting_balance: i64,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_STARTING_BALANCE,
        }
    }
}
