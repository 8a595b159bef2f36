//! Exchange service - one ledger transaction per request

use std::collections::BTreeMap;

use account::{AccountRegistry, TraderAccount};
use common::{DomainEvent, EventEmitter, HolderId, IdentityProvider, OrderKey, Result};
use instrument::{SecurityAsset, SecurityRegistry};
use observability::{ExchangeMetrics, OperationTimer};
use oms::{OrderManager, OrderRecord, OrderRef, PlaceOrder};
use settlement::{SettleRequest, SettlementEngine, SettlementReceipt};
use storage::{LedgerStore, TxContext};
use tracing::{debug, error, info_span, warn};

use crate::settings::ExchangeSettings;

/// Whether an operation's writes are committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// The exchange request surface.
///
/// Every public operation:
/// - resolves the caller's holder identifier
/// - runs inside a fresh [`TxContext`] over the ledger
/// - commits on success (writes only) and then publishes the queued events
/// - records operation metrics and logs failures
///
/// Security-relevant failures (duplicate orders, integrity mismatches) are
/// logged at `error` and counted separately from ordinary rejections.
pub struct Exchange<L: LedgerStore, E: EventEmitter> {
    ledger: L,
    emitter: E,
    accounts: AccountRegistry,
    securities: SecurityRegistry,
    orders: OrderManager,
    settlement: SettlementEngine,
    metrics: ExchangeMetrics,
}

impl<L: LedgerStore, E: EventEmitter> Exchange<L, E> {
    /// Create an exchange over `ledger` publishing events to `emitter`.
    pub fn new(ledger: L, emitter: E, settings: ExchangeSettings) -> Self {
        Self {
            ledger,
            emitter,
            accounts: AccountRegistry::new(settings.starting_balance),
            securities: SecurityRegistry::new(),
            orders: OrderManager::new(),
            settlement: SettlementEngine::new(),
            metrics: ExchangeMetrics::new(),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Open an account for the caller with the starting balance.
    pub fn register(&mut self, caller: &dyn IdentityProvider) -> Result<TraderAccount> {
        let accounts = self.accounts;
        self.execute("register", caller, Access::Write, |ctx| accounts.register(ctx))
    }

    /// Remove the caller's account.
    pub fn deregister(&mut self, caller: &dyn IdentityProvider) -> Result<()> {
        let accounts = self.accounts;
        self.execute("deregister", caller, Access::Write, |ctx| accounts.deregister(ctx))
    }

    /// The caller's account.
    pub fn get_account(&mut self, caller: &dyn IdentityProvider) -> Result<TraderAccount> {
        self.execute("get_account", caller, Access::Read, |ctx| {
            let id = ctx.caller().clone();
            AccountRegistry::get(ctx, &id)
        })
    }

    /// The caller's currency balance.
    pub fn get_balance(&mut self, caller: &dyn IdentityProvider) -> Result<i64> {
        self.execute("get_balance", caller, Access::Read, |ctx| {
            let id = ctx.caller().clone();
            Ok(AccountRegistry::get(ctx, &id)?.balance)
        })
    }

    /// The caller's security holdings by symbol.
    pub fn get_holdings(&mut self, caller: &dyn IdentityProvider) -> Result<BTreeMap<String, u64>> {
        self.execute("get_holdings", caller, Access::Read, |ctx| {
            let id = ctx.caller().clone();
            Ok(AccountRegistry::get(ctx, &id)?.holdings)
        })
    }

    /// Check whether `id` has an account.
    pub fn trader_exists(&mut self, caller: &dyn IdentityProvider, id: &HolderId) -> Result<bool> {
        self.execute("trader_exists", caller, Access::Read, |ctx| AccountRegistry::exists(ctx, id))
    }

    /// The caller's raw principal.
    pub fn get_my_id(&self, caller: &dyn IdentityProvider) -> String {
        caller.caller_id()
    }

    /// The caller's holder identifier.
    pub fn get_my_hin(&self, caller: &dyn IdentityProvider) -> Result<HolderId> {
        caller.holder_id()
    }

    // ========================================================================
    // Securities
    // ========================================================================

    /// Issue a security and credit the whole quantity to the caller.
    pub fn issue(
        &mut self,
        caller: &dyn IdentityProvider,
        symbol: &str,
        name: &str,
        total_quantity: u64,
    ) -> Result<SecurityAsset> {
        let securities = self.securities;
        self.execute("issue", caller, Access::Write, |ctx| {
            securities.issue(ctx, symbol, name, total_quantity)
        })
    }

    /// Remove a security from the registry; holdings are left as they are.
    pub fn remove_security(&mut self, caller: &dyn IdentityProvider, symbol: &str) -> Result<()> {
        let securities = self.securities;
        self.execute("remove_security", caller, Access::Write, |ctx| {
            securities.remove(ctx, symbol)
        })
    }

    pub fn get_security(&mut self, caller: &dyn IdentityProvider, symbol: &str) -> Result<SecurityAsset> {
        self.execute("get_security", caller, Access::Read, |ctx| SecurityRegistry::get(ctx, symbol))
    }

    pub fn security_exists(&mut self, caller: &dyn IdentityProvider, symbol: &str) -> Result<bool> {
        self.execute("security_exists", caller, Access::Read, |ctx| {
            SecurityRegistry::exists(ctx, symbol)
        })
    }

    pub fn list_securities(&mut self, caller: &dyn IdentityProvider) -> Result<Vec<SecurityAsset>> {
        self.execute("list_securities", caller, Access::Read, |ctx| SecurityRegistry::list(ctx))
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Place an order for the caller.
    pub fn place_order(&mut self, caller: &dyn IdentityProvider, request: PlaceOrder) -> Result<OrderRef> {
        let orders = self.orders;
        self.execute("place_order", caller, Access::Write, |ctx| {
            orders.place_order(ctx, request)
        })
    }

    /// Every indexed order with its current commitment.
    pub fn get_all_orders(&mut self, caller: &dyn IdentityProvider) -> Result<Vec<OrderRef>> {
        let orders = self.orders;
        self.execute("get_all_orders", caller, Access::Read, |ctx| {
            Ok(orders
                .all_orders(ctx)?
                .into_iter()
                .map(|(order_key, commitment)| OrderRef { order_key, commitment })
                .collect())
        })
    }

    pub fn get_order(&mut self, caller: &dyn IdentityProvider, key: &OrderKey) -> Result<OrderRecord> {
        let orders = self.orders;
        self.execute("get_order", caller, Access::Read, |ctx| orders.get_order(ctx, key))
    }

    pub fn order_exists(&mut self, caller: &dyn IdentityProvider, key: &OrderKey) -> Result<bool> {
        let orders = self.orders;
        self.execute("order_exists", caller, Access::Read, |ctx| orders.order_exists(ctx, key))
    }

    /// Regenerate the order index from the order records.
    pub fn rebuild_order_index(&mut self, caller: &dyn IdentityProvider) -> Result<usize> {
        let orders = self.orders;
        self.execute("rebuild_order_index", caller, Access::Write, |ctx| {
            orders.rebuild_index(ctx)
        })
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Settle the caller's buy order against a seller's sell order.
    pub fn settle(
        &mut self,
        caller: &dyn IdentityProvider,
        request: &SettleRequest,
    ) -> Result<SettlementReceipt> {
        let settlement = self.settlement;
        let receipt = self.execute("settle", caller, Access::Write, |ctx| {
            settlement.settle(ctx, request)
        })?;

        self.metrics.record_settled_value(receipt.total_value);
        Ok(receipt)
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn execute<T>(
        &mut self,
        operation: &'static str,
        caller: &dyn IdentityProvider,
        access: Access,
        op: impl FnOnce(&mut TxContext<'_>) -> Result<T>,
    ) -> Result<T> {
        let _timer = OperationTimer::start(self.metrics, operation);

        let outcome = caller.holder_id().and_then(|holder| {
            let span = info_span!("operation", op = operation, caller = %holder);
            let _entered = span.enter();
            Self::run(&mut self.ledger, holder, access, op)
        });

        match outcome {
            Ok((value, events)) => {
                for event in &events {
                    self.publish(event);
                }
                self.metrics.record_success(operation);
                debug!(operation, events = events.len(), "Operation completed");
                Ok(value)
            }
            Err(err) => {
                let security_relevant = err.is_security_relevant();
                if security_relevant {
                    error!(operation, kind = %err.kind(), error = %err, "Security-relevant rejection");
                } else {
                    warn!(operation, kind = %err.kind(), error = %err, "Operation rejected");
                }
                self.metrics
                    .record_failure(operation, err.kind(), security_relevant);
                Err(err)
            }
        }
    }

    fn run<T>(
        ledger: &mut L,
        caller: HolderId,
        access: Access,
        op: impl FnOnce(&mut TxContext<'_>) -> Result<T>,
    ) -> Result<(T, Vec<DomainEvent>)> {
        let mut ctx = TxContext::new(ledger, caller);
        let value = op(&mut ctx)?;

        let events = match access {
            Access::Write => ctx.commit()?,
            Access::Read => Vec::new(),
        };
        Ok((value, events))
    }

    fn publish(&self, event: &DomainEvent) {
        match event.payload() {
            Ok(payload) => self.emitter.emit(event.name(), &payload),
            Err(e) => warn!(event = event.name(), error = %e, "Failed to encode event"),
        }
    }
}
