//! Settlement engine for HypExchange
//!
//! Settles a placed buy/sell pair: verifies both order commitments against
//! the terms the caller presents, moves funds and securities between the two
//! accounts, and marks both orders settled.
//!
//! Settlement is full-fill only. A settled order carries a new commitment
//! (`settled = true`), so replaying the same request fails the integrity
//! check and no second transfer happens.

pub mod engine;
pub mod types;

pub use engine::SettlementEngine;
pub use types::{SettleRequest, SettlementReceipt};
