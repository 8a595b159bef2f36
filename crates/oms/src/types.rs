//! Order Management System domain types
//!
//! This module defines the core domain types for the OMS.

use common::{Error, HolderId, OrderKey, Result, Side};
use serde::{Deserialize, Serialize};

use crate::commitment::{self, Commitment};

/// Logical terms of an order
///
/// Every field takes part in the order's commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Storage slot of the order
    pub order_key: OrderKey,
    /// Buy or sell
    pub side: Side,
    /// Security being traded
    pub symbol: String,
    /// Number of units
    pub quantity: u64,
    /// Price per unit in currency units
    pub price: u64,
    /// Caller-supplied placement time
    pub timestamp: i64,
    /// Both counterparties committed; always true once placed
    pub locked: bool,
    /// Set once the order has been settled
    pub settled: bool,
    /// Holder who placed the order
    pub owner_id: HolderId,
}

impl Order {
    /// Create an order in the placed state (locked, not settled)
    pub fn placed(
        order_key: OrderKey,
        side: Side,
        symbol: impl Into<String>,
        quantity: u64,
        price: u64,
        timestamp: i64,
        owner_id: HolderId,
    ) -> Self {
        Self {
            order_key,
            side,
            symbol: symbol.into(),
            quantity,
            price,
            timestamp,
            locked: true,
            settled: false,
            owner_id,
        }
    }

    /// The same terms in the settled state
    pub fn as_settled(&self) -> Self {
        Self {
            settled: true,
            ..self.clone()
        }
    }

    /// Commitment over the current terms
    pub fn commitment(&self) -> Commitment {
        commitment::commit(self)
    }

    /// `quantity * price`, failing on overflow
    pub fn notional(&self) -> Result<i64> {
        notional(self.quantity, self.price)
    }
}

/// `quantity * price` as a signed balance delta, failing on overflow
pub fn notional(quantity: u64, price: u64) -> Result<i64> {
    quantity
        .checked_mul(price)
        .and_then(|value| i64::try_from(value).ok())
        .ok_or_else(|| {
            Error::invalid_argument(format!(
                "order value {} x {} overflows the balance range",
                quantity, price
            ))
        })
}

/// Persisted order slot: the terms and the commitment recorded at write time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order: Order,
    pub commitment: Commitment,
}

impl OrderRecord {
    /// Record `order` together with its freshly computed commitment
    pub fn new(order: Order) -> Self {
        let commitment = order.commitment();
        Self { order, commitment }
    }

    /// True if the stored terms still produce the stored commitment
    pub fn is_intact(&self) -> bool {
        commitment::verify(&self.order, &self.commitment)
    }
}

/// Handle returned to the caller after placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub order_key: OrderKey,
    pub commitment: Commitment,
}

/// Order placement request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub symbol: String,
    pub side: Side,
    pub quantity: u64,
    pub price: u64,
    pub timestamp: i64,
    /// Caller-supplied slot; the sequence counter assigns one when absent
    pub order_key: Option<OrderKey>,
}

impl PlaceOrder {
    pub fn new(symbol: impl Into<String>, side: Side, quantity: u64, price: u64, timestamp: i64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            price,
            timestamp,
            order_key: None,
        }
    }

    /// Place the order at a caller-chosen key
    pub fn with_key(mut self, order_key: OrderKey) -> Self {
        self.order_key = Some(order_key);
        self
    }

    /// Basic parameter validation
    pub fn validate(&self) -> Result<()> {
        instrument::types::validate_symbol(&self.symbol)?;

        if self.quantity == 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }
        if self.price == 0 {
            return Err(Error::invalid_argument("price must be greater than 0"));
        }

        notional(self.quantity, self.price).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order::placed(
            OrderKey::from_sequence(1),
            Side::Sell,
            "ACME",
            10,
            5,
            1_700_000_000,
            HolderId::derive("alice").unwrap(),
        )
    }

    #[test]
    fn test_placed_state() {
        let order = order();
        assert!(order.locked);
        assert!(!order.settled);
        assert_eq!(order.notional().unwrap(), 50);
    }

    #[test]
    fn test_as_settled_changes_commitment() {
        let order = order();
        let settled = order.as_settled();

        assert!(settled.settled);
        assert_eq!(settled.quantity, order.quantity);
        assert_ne!(settled.commitment(), order.commitment());
    }

    #[test]
    fn test_record_detects_tampering() {
        let mut record = OrderRecord::new(order());
        assert!(record.is_intact());

        record.order.price = 1;
        assert!(!record.is_intact());
    }

    #[test]
    fn test_place_order_validation() {
        assert!(PlaceOrder::new("ACME", Side::Buy, 1, 1, 0).validate().is_ok());
        assert!(PlaceOrder::new("ACME", Side::Buy, 0, 1, 0).validate().is_err());
        assert!(PlaceOrder::new("ACME", Side::Buy, 1, 0, 0).validate().is_err());
        assert!(PlaceOrder::new("", Side::Buy, 1, 1, 0).validate().is_err());
        assert!(PlaceOrder::new("ACME", Side::Buy, u64::MAX, 2, 0).validate().is_err());
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let json = serde_json::to_value(order()).unwrap();
        assert_eq!(json["orderKey"], "1");
        assert_eq!(json["side"], "sell");
        assert!(json.get("ownerId").is_some());
    }
}
