//! Store module exports

pub mod ledger;

pub use ledger::OrderLedger;
