//! Account registry - account lifecycle on the ledger

use common::{Entity, Error, HolderId, Result};
use storage::{keys, LedgerExt, LedgerStore, TxContext};
use tracing::{debug, info};

use crate::types::TraderAccount;

/// Balance credited to every newly registered trader
pub const DEFAULT_STARTING_BALANCE: i64 = 10_000;

/// Account registry - creates, loads, saves and removes trader accounts
#[derive(Debug, Clone, Copy)]
pub struct AccountRegistry {
    starting_balance: i64,
}

impl AccountRegistry {
    /// Create a registry crediting `starting_balance` on registration
    pub fn new(starting_balance: i64) -> Self {
        Self { starting_balance }
    }

    /// Register the caller
    ///
    /// Fails with `AlreadyExists` if the caller already has an account.
    pub fn register(&self, ctx: &mut TxContext<'_>) -> Result<TraderAccount> {
        let id = ctx.caller().clone();
        if Self::exists(ctx, &id)? {
            return Err(Error::already_exists(Entity::Trader, id.as_str()));
        }

        let account = TraderAccount::new(id, self.starting_balance);
        Self::save(ctx, &account)?;

        info!(holder = %account.id, balance = account.balance, "Trader registered");
        Ok(account)
    }

    /// Remove the caller's account
    ///
    /// Outstanding orders are left in place and stay addressable by key.
    pub fn deregister(&self, ctx: &mut TxContext<'_>) -> Result<()> {
        let id = ctx.caller().clone();
        ctx.ledger_mut().delete(&keys::account(id.as_str()))?;

        info!(holder = %id, "Trader deregistered");
        Ok(())
    }

    /// Check whether an account exists for `id`
    pub fn exists(ctx: &TxContext<'_>, id: &HolderId) -> Result<bool> {
        Ok(ctx.ledger().exists(&keys::account(id.as_str()))?)
    }

    /// Load the account for `id`, if any
    pub fn load(ctx: &TxContext<'_>, id: &HolderId) -> Result<Option<TraderAccount>> {
        Ok(ctx.ledger().get_json(&keys::account(id.as_str()))?)
    }

    /// Load the account for `id`, failing with `NotFound` if absent
    pub fn get(ctx: &TxContext<'_>, id: &HolderId) -> Result<TraderAccount> {
        Self::load(ctx, id)?.ok_or_else(|| Error::not_found(Entity::Trader, id.as_str()))
    }

    /// Load an account that may trade
    ///
    /// Fails with `TraderNotRegistered` if absent or inactive.
    pub fn require_active(ctx: &TxContext<'_>, id: &HolderId) -> Result<TraderAccount> {
        match Self::load(ctx, id)? {
            Some(account) if account.active => Ok(account),
            Some(_) => {
                debug!(holder = %id, "Trader account is inactive");
                Err(Error::TraderNotRegistered(id.to_string()))
            }
            None => Err(Error::TraderNotRegistered(id.to_string())),
        }
    }

    /// Write `account` back to the ledger
    pub fn save(ctx: &mut TxContext<'_>, account: &TraderAccount) -> Result<()> {
        ctx.ledger_mut()
            .put_json(&keys::account(account.id.as_str()), account)?;
        Ok(())
    }
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_BALANCE)
    }
}
