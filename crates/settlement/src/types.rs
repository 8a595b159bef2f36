//! Settlement request and receipt

use common::{HolderId, OrderKey, Result, Side};
use oms::{Commitment, Order};
use serde::{Deserialize, Serialize};

/// Terms of a buy/sell pair as presented by the buyer
///
/// Every field must reproduce the commitment recorded when the orders were
/// placed. The caller is the buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    pub buy_key: OrderKey,
    pub sell_key: OrderKey,
    pub symbol: String,
    pub price: u64,
    pub quantity: u64,
    pub buy_timestamp: i64,
    pub sell_timestamp: i64,
    pub seller_id: HolderId,
}

impl SettleRequest {
    /// Buy order the caller claims to have placed
    pub fn expected_buy(&self, buyer: &HolderId) -> Order {
        Order::placed(
            self.buy_key.clone(),
            Side::Buy,
            self.symbol.clone(),
            self.quantity,
            self.price,
            self.buy_timestamp,
            buyer.clone(),
        )
    }

    /// Sell order the caller claims the seller placed
    pub fn expected_sell(&self) -> Order {
        Order::placed(
            self.sell_key.clone(),
            Side::Sell,
            self.symbol.clone(),
            self.quantity,
            self.price,
            self.sell_timestamp,
            self.seller_id.clone(),
        )
    }

    /// `quantity * price`
    pub fn total_value(&self) -> Result<i64> {
        oms::types::notional(self.quantity, self.price)
    }
}

/// Outcome of a successful settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub buy_key: OrderKey,
    pub sell_key: OrderKey,
    pub symbol: String,
    pub quantity: u64,
    pub price: u64,
    pub total_value: i64,
    pub buyer_id: HolderId,
    pub seller_id: HolderId,
    /// Commitment now stored for the buy order
    pub buy_commitment: Commitment,
    /// Commitment now stored for the sell order
    pub sell_commitment: Commitment,
}
