//! Settlement engine - verifies and settles a buy/sell pair

use account::AccountRegistry;
use common::{DomainEvent, Error, Result};
use instrument::SecurityRegistry;
use oms::{Order, OrderLedger, OrderRecord};
use storage::TxContext;
use tracing::{error, info};

use crate::types::{SettleRequest, SettlementReceipt};

/// Settlement engine
///
/// All checks run against in-memory copies of the two accounts; nothing is
/// written until every check has passed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine;

impl SettlementEngine {
    pub fn new() -> Self {
        Self
    }

    /// Settle the caller's buy order against `request.seller_id`'s sell order
    ///
    /// Flow:
    /// 1. Verify both orders against the presented terms
    /// 2. Require both trader accounts and the security
    /// 3. Buyer pays `quantity * price` and receives `quantity`; seller the reverse
    /// 4. Store both orders as settled and emit `OrderSettled`
    #[tracing::instrument(
        skip(self, ctx, request),
        fields(buyer = %ctx.caller(), buy_key = %request.buy_key, sell_key = %request.sell_key)
    )]
    pub fn settle(&self, ctx: &mut TxContext<'_>, request: &SettleRequest) -> Result<SettlementReceipt> {
        let buyer_id = ctx.caller().clone();

        if request.seller_id == buyer_id {
            return Err(Error::invalid_argument("buyer and seller must be different traders"));
        }
        if request.buy_key == request.sell_key {
            return Err(Error::invalid_argument("buy and sell orders must be different orders"));
        }
        let total_value = request.total_value()?;

        let buy = verify_order(ctx, &request.expected_buy(&buyer_id))?;
        let sell = verify_order(ctx, &request.expected_sell())?;

        let mut buyer = AccountRegistry::require_active(ctx, &buyer_id)?;
        let mut seller = AccountRegistry::require_active(ctx, &request.seller_id)?;
        let asset = SecurityRegistry::get(ctx, &request.symbol)?;

        let quantity = i64::try_from(request.quantity)
            .map_err(|_| Error::invalid_argument("settled quantity is too large"))?;

        buyer.ensure_funds(total_value)?;
        seller.ensure_holds(&asset.symbol, request.quantity)?;

        buyer.adjust_holding(&asset.symbol, quantity)?;
        buyer.adjust_balance(-total_value)?;
        seller.adjust_holding(&asset.symbol, -quantity)?;
        seller.adjust_balance(total_value)?;

        AccountRegistry::save(ctx, &buyer)?;
        AccountRegistry::save(ctx, &seller)?;

        let settled_buy = OrderRecord::new(buy.order.as_settled());
        let settled_sell = OrderRecord::new(sell.order.as_settled());
        OrderLedger::save(ctx, &settled_buy)?;
        OrderLedger::save(ctx, &settled_sell)?;

        ctx.emit(DomainEvent::OrderSettled {
            buy_key: request.buy_key.clone(),
            sell_key: request.sell_key.clone(),
        });

        info!(
            symbol = %asset.symbol,
            quantity = request.quantity,
            price = request.price,
            total_value,
            seller = %request.seller_id,
            "Orders settled"
        );

        Ok(SettlementReceipt {
            buy_key: request.buy_key.clone(),
            sell_key: request.sell_key.clone(),
            symbol: asset.symbol,
            quantity: request.quantity,
            price: request.price,
            total_value,
            buyer_id,
            seller_id: request.seller_id.clone(),
            buy_commitment: settled_buy.commitment,
            sell_commitment: settled_sell.commitment,
        })
    }
}

/// Load the record at `expected.order_key` and check it against `expected`
///
/// The record must be present, must still match its own commitment, must
/// commit to the same value as `expected`, and must agree with the index.
fn verify_order(ctx: &TxContext<'_>, expected: &Order) -> Result<OrderRecord> {
    let key = &expected.order_key;

    let reject = |reason: &str| {
        error!(order_key = %key, reason, "Order integrity check failed");
        Err(Error::integrity(key.as_str(), reason))
    };

    let Some(record) = OrderLedger::load(ctx, key)? else {
        return reject("no order recorded at this key");
    };
    if !record.is_intact() {
        return reject("stored order does not match its recorded commitment");
    }
    if expected.commitment() != record.commitment {
        return reject("presented terms do not match the recorded commitment");
    }
    if OrderLedger::index_entry(ctx, key)? != Some(record.commitment) {
        return reject("order index disagrees with the order record");
    }

    Ok(record)
}
