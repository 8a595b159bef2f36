//! Order Manager - core business logic for order placement

use account::AccountRegistry;
use common::{DomainEvent, Entity, Error, OrderKey, Result, Side};
use instrument::SecurityRegistry;
use storage::TxContext;
use tracing::{error, info};

use crate::commitment::Commitment;
use crate::store::OrderLedger;
use crate::types::{Order, OrderRecord, OrderRef, PlaceOrder};

/// Order Manager - handles order placement and lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderManager;

impl OrderManager {
    pub fn new() -> Self {
        Self
    }

    /// Place an order for the caller
    ///
    /// Flow:
    /// 1. Validate parameters
    /// 2. Require an active trader account and a registered security
    /// 3. Sell: caller must hold `quantity`; buy: balance must cover `quantity * price`
    /// 4. Build the order (locked, unsettled) and compute its commitment
    /// 5. Reject a duplicate already indexed at the same key
    /// 6. Persist the record and index entry, emit `OrderCreated`
    #[tracing::instrument(skip(self, ctx, request), fields(owner = %ctx.caller(), symbol = %request.symbol, side = %request.side))]
    pub fn place_order(&self, ctx: &mut TxContext<'_>, request: PlaceOrder) -> Result<OrderRef> {
        request.validate()?;

        let owner_id = ctx.caller().clone();
        let trader = AccountRegistry::require_active(ctx, &owner_id)?;

        if !SecurityRegistry::exists(ctx, &request.symbol)? {
            return Err(Error::not_found(Entity::Security, request.symbol.as_str()));
        }

        match request.side {
            Side::Sell => trader.ensure_holds(&request.symbol, request.quantity)?,
            Side::Buy => {
                let value = crate::types::notional(request.quantity, request.price)?;
                trader.ensure_funds(value)?;
            }
        }

        let supplied_key = request.order_key.is_some();
        let order_key = match request.order_key {
            Some(key) => key,
            None => OrderLedger::next_key(ctx)?,
        };

        let order = Order::placed(
            order_key,
            request.side,
            request.symbol,
            request.quantity,
            request.price,
            request.timestamp,
            owner_id,
        );
        let record = OrderRecord::new(order);

        // The commitment covers the key, so a duplicate can only sit at this slot
        if OrderLedger::index_entry(ctx, &record.order.order_key)? == Some(record.commitment) {
            error!(
                order_key = %record.order.order_key,
                commitment = %record.commitment,
                "Duplicate order rejected"
            );
            return Err(Error::DuplicateOrder {
                order_key: record.order.order_key.to_string(),
                commitment: record.commitment.to_hex(),
            });
        }

        if supplied_key && OrderLedger::load(ctx, &record.order.order_key)?.is_some() {
            return Err(Error::already_exists(
                Entity::Order,
                record.order.order_key.as_str(),
            ));
        }

        OrderLedger::save(ctx, &record)?;

        let order = &record.order;
        ctx.emit(DomainEvent::OrderCreated {
            order_key: order.order_key.clone(),
            symbol: order.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
            price: order.price,
            timestamp: order.timestamp,
            owner_id: order.owner_id.clone(),
        });

        info!(
            order_key = %order.order_key,
            commitment = %record.commitment,
            quantity = order.quantity,
            price = order.price,
            "Order placed"
        );

        Ok(OrderRef {
            order_key: record.order.order_key,
            commitment: record.commitment,
        })
    }

    /// Get the record stored at `key`, failing with `NotFound` if absent
    pub fn get_order(&self, ctx: &TxContext<'_>, key: &OrderKey) -> Result<OrderRecord> {
        OrderLedger::load(ctx, key)?.ok_or_else(|| Error::not_found(Entity::Order, key.as_str()))
    }

    /// Check whether `key` has an entry in the order index
    pub fn order_exists(&self, ctx: &TxContext<'_>, key: &OrderKey) -> Result<bool> {
        Ok(OrderLedger::index_entry(ctx, key)?.is_some())
    }

    /// Every indexed order key with its current commitment
    pub fn all_orders(&self, ctx: &TxContext<'_>) -> Result<Vec<(OrderKey, Commitment)>> {
        OrderLedger::index(ctx)
    }

    /// Regenerate the order index from the stored records
    pub fn rebuild_index(&self, ctx: &mut TxContext<'_>) -> Result<usize> {
        OrderLedger::rebuild_index(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use common::HolderId;
    use storage::{keys, InMemoryLedger, LedgerStore};

    fn alice() -> HolderId {
        HolderId::derive("alice").unwrap()
    }

    /// Ledger where alice is registered and holds 100 ACME
    fn seeded() -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new();
        let mut ctx = TxContext::new(&mut ledger, alice());
        AccountRegistry::default().register(&mut ctx).unwrap();
        SecurityRegistry::new()
            .issue(&mut ctx, "ACME", "Acme Corp", 100)
            .unwrap();
        ctx.commit().unwrap();
        ledger
    }

    #[test]
    fn test_place_sell_order() {
        let mut ledger = seeded();
        let mut ctx = TxContext::new(&mut ledger, alice());

        let placed = OrderManager::new()
            .place_order(&mut ctx, PlaceOrder::new("ACME", Side::Sell, 10, 5, 1))
            .unwrap();

        assert_eq!(placed.order_key.as_str(), "1");
        let record = OrderManager::new().get_order(&ctx, &placed.order_key).unwrap();
        assert!(record.is_intact());
        assert!(!record.order.settled);
        assert!(record.order.locked);
        assert_eq!(record.order.owner_id, alice());
        assert!(OrderManager::new().order_exists(&ctx, &placed.order_key).unwrap());
        assert_eq!(ctx.events().last().map(|e| e.name()), Some("OrderCreated"));
    }

    #[test]
    fn test_sell_without_holdings_fails() {
        let mut ledger = seeded();
        let mut ctx = TxContext::new(&mut ledger, alice());

        assert_matches!(
            OrderManager::new().place_order(&mut ctx, PlaceOrder::new("ACME", Side::Sell, 101, 5, 1)),
            Err(Error::InsufficientHoldings { required: 101, available: 100, .. })
        );
    }

    #[test]
    fn test_buy_beyond_balance_fails() {
        let mut ledger = seeded();
        let mut ctx = TxContext::new(&mut ledger, alice());

        assert_matches!(
            OrderManager::new().place_order(&mut ctx, PlaceOrder::new("ACME", Side::Buy, 1_000, 11, 1)),
            Err(Error::InsufficientFunds { required: 11_000, available: 10_000, .. })
        );
    }

    #[test]
    fn test_unregistered_trader_cannot_place() {
        let mut ledger = seeded();
        let mut ctx = TxContext::new(&mut ledger, HolderId::derive("mallory").unwrap());

        assert_matches!(
            OrderManager::new().place_order(&mut ctx, PlaceOrder::new("ACME", Side::Buy, 1, 1, 1)),
            Err(Error::TraderNotRegistered(_))
        );
    }

    #[test]
    fn test_unknown_security_is_rejected() {
        let mut ledger = seeded();
        let mut ctx = TxContext::new(&mut ledger, alice());

        assert_matches!(
            OrderManager::new().place_order(&mut ctx, PlaceOrder::new("NOPE", Side::Buy, 1, 1, 1)),
            Err(Error::NotFound { entity: Entity::Security, .. })
        );
    }

    #[test]
    fn test_duplicate_order_is_rejected() {
        let mut ledger = seeded();
        let mut ctx = TxContext::new(&mut ledger, alice());
        let manager = OrderManager::new();
        let key = OrderKey::new("client-1").unwrap();

        manager
            .place_order(&mut ctx, PlaceOrder::new("ACME", Side::Sell, 10, 5, 1).with_key(key.clone()))
            .unwrap();

        let err = manager
            .place_order(&mut ctx, PlaceOrder::new("ACME", Side::Sell, 10, 5, 1).with_key(key.clone()))
            .unwrap_err();
        assert_matches!(err, Error::DuplicateOrder { ref order_key, .. } if order_key == "client-1");
        assert!(err.is_security_relevant());

        // Same slot, different terms
        assert_matches!(
            manager.place_order(&mut ctx, PlaceOrder::new("ACME", Side::Sell, 10, 6, 1).with_key(key)),
            Err(Error::AlreadyExists { entity: Entity::Order, .. })
        );
    }

    #[test]
    fn test_unrelated_index_entries_do_not_block_placement() {
        let mut ledger = seeded();
        let mut ctx = TxContext::new(&mut ledger, alice());
        ctx.ledger_mut()
            .put(&keys::order_index("stale"), b"garbage".to_vec())
            .unwrap();

        let placed = OrderManager::new()
            .place_order(&mut ctx, PlaceOrder::new("ACME", Side::Sell, 1, 5, 1))
            .unwrap();
        assert_eq!(placed.order_key.as_str(), "1");
    }

    #[test]
    fn test_sequence_keys_increment() {
        let mut ledger = seeded();
        let mut ctx = TxContext::new(&mut ledger, alice());
        let manager = OrderManager::new();

        let first = manager
            .place_order(&mut ctx, PlaceOrder::new("ACME", Side::Sell, 1, 5, 1))
            .unwrap();
        let second = manager
            .place_order(&mut ctx, PlaceOrder::new("ACME", Side::Sell, 1, 5, 1))
            .unwrap();

        // Identical terms at different keys commit differently
        assert_ne!(first.commitment, second.commitment);
        assert_eq!(second.order_key.as_str(), "2");
        assert_eq!(manager.all_orders(&ctx).unwrap().len(), 2);
    }
}
