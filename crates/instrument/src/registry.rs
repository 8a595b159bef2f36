//! Security registry - high-level API for security lifecycle.

use account::AccountRegistry;
use common::{DomainEvent, Entity, Error, Result};
use storage::{keys, LedgerExt, LedgerStore, TxContext};
use tracing::{info, instrument, warn};

use crate::types::{validate_symbol, SecurityAsset};

/// Registry of tradable securities.
///
/// This registry provides the main API for:
/// - Issuing securities to the caller's account
/// - Querying securities
/// - Removing securities (without holdings reconciliation)
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityRegistry;

impl SecurityRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Issue a new security and credit the whole quantity to the caller.
    ///
    /// Fails with `AlreadyExists` if the symbol is registered and with
    /// `TraderNotRegistered` if the caller has no active account.
    #[instrument(skip(self, ctx), fields(issuer = %ctx.caller()))]
    pub fn issue(
        &self,
        ctx: &mut TxContext<'_>,
        symbol: &str,
        name: &str,
        total_quantity: u64,
    ) -> Result<SecurityAsset> {
        let asset = SecurityAsset::new(symbol, name, total_quantity)?;

        if Self::exists(ctx, symbol)? {
            return Err(Error::already_exists(Entity::Security, symbol));
        }

        let issuer_id = ctx.caller().clone();
        let mut issuer = AccountRegistry::require_active(ctx, &issuer_id)?;
        let quantity = i64::try_from(total_quantity)
            .map_err(|_| Error::invalid_argument("issued quantity is too large"))?;
        issuer.adjust_holding(&asset.symbol, quantity)?;

        ctx.ledger_mut()
            .put_json(&keys::security(&asset.symbol), &asset)?;
        AccountRegistry::save(ctx, &issuer)?;

        ctx.emit(DomainEvent::SecurityCreated {
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            quantity: asset.total_quantity,
        });

        info!(symbol = %asset.symbol, quantity = asset.total_quantity, "Security issued");
        Ok(asset)
    }

    /// Get a security by symbol, failing with `NotFound` if absent.
    pub fn get(ctx: &TxContext<'_>, symbol: &str) -> Result<SecurityAsset> {
        validate_symbol(symbol)?;
        ctx.ledger()
            .get_json(&keys::security(symbol))?
            .ok_or_else(|| Error::not_found(Entity::Security, symbol))
    }

    /// Check whether a security is registered.
    pub fn exists(ctx: &TxContext<'_>, symbol: &str) -> Result<bool> {
        Ok(ctx.ledger().exists(&keys::security(symbol))?)
    }

    /// Remove a security from the registry.
    ///
    /// Holdings of the symbol in any account are left as they are.
    pub fn remove(&self, ctx: &mut TxContext<'_>, symbol: &str) -> Result<()> {
        validate_symbol(symbol)?;
        ctx.ledger_mut().delete(&keys::security(symbol))?;

        warn!(symbol, "Security removed; existing holdings are not reconciled");
        Ok(())
    }

    /// List every registered security in symbol order.
    pub fn list(ctx: &TxContext<'_>) -> Result<Vec<SecurityAsset>> {
        Ok(ctx
            .ledger()
            .scan_json::<SecurityAsset>(keys::SECURITY_PREFIX)?
            .into_iter()
            .map(|(_, asset)| asset)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use common::HolderId;
    use storage::InMemoryLedger;

    fn issuer() -> HolderId {
        HolderId::derive("issuer").unwrap()
    }

    fn registered(ledger: &mut InMemoryLedger) {
        let mut ctx = TxContext::new(ledger, issuer());
        AccountRegistry::default().register(&mut ctx).unwrap();
        ctx.commit().unwrap();
    }

    #[test]
    fn test_issue_credits_issuer() {
        let mut ledger = InMemoryLedger::new();
        registered(&mut ledger);

        let mut ctx = TxContext::new(&mut ledger, issuer());
        let asset = SecurityRegistry::new()
            .issue(&mut ctx, "ACME", "Acme Corp", 100)
            .unwrap();
        assert_eq!(asset.total_quantity, 100);

        let account = AccountRegistry::get(&ctx, &issuer()).unwrap();
        assert_eq!(account.holding("ACME"), 100);
        assert_eq!(account.balance, 10_000);
        assert_eq!(ctx.events().len(), 1);
        assert_eq!(ctx.events()[0].name(), "SecurityCreated");
    }

    #[test]
    fn test_issue_existing_symbol_fails() {
        let mut ledger = InMemoryLedger::new();
        registered(&mut ledger);

        let mut ctx = TxContext::new(&mut ledger, issuer());
        let registry = SecurityRegistry::new();
        registry.issue(&mut ctx, "ACME", "Acme Corp", 100).unwrap();

        assert_matches!(
            registry.issue(&mut ctx, "ACME", "Acme Again", 5),
            Err(Error::AlreadyExists { entity: Entity::Security, .. })
        );
    }

    #[test]
    fn test_issue_requires_registered_issuer() {
        let mut ledger = InMemoryLedger::new();
        let mut ctx = TxContext::new(&mut ledger, issuer());

        assert_matches!(
            SecurityRegistry::new().issue(&mut ctx, "ACME", "Acme Corp", 100),
            Err(Error::TraderNotRegistered(_))
        );
        assert!(!SecurityRegistry::exists(&ctx, "ACME").unwrap());
    }

    #[test]
    fn test_get_missing_security() {
        let mut ledger = InMemoryLedger::new();
        let ctx = TxContext::new(&mut ledger, issuer());

        assert_matches!(
            SecurityRegistry::get(&ctx, "NOPE"),
            Err(Error::NotFound { entity: Entity::Security, .. })
        );
    }

    #[test]
    fn test_remove_keeps_holdings() {
        let mut ledger = InMemoryLedger::new();
        registered(&mut ledger);

        let mut ctx = TxContext::new(&mut ledger, issuer());
        let registry = SecurityRegistry::new();
        registry.issue(&mut ctx, "ACME", "Acme Corp", 100).unwrap();
        registry.remove(&mut ctx, "ACME").unwrap();

        assert!(!SecurityRegistry::exists(&ctx, "ACME").unwrap());
        assert!(SecurityRegistry::list(&ctx).unwrap().is_empty());
        let account = AccountRegistry::get(&ctx, &issuer()).unwrap();
        assert_eq!(account.holding("ACME"), 100);
    }
}
