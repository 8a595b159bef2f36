//! Trader accounts for HypExchange
//!
//! This crate owns the [`TraderAccount`] entity and the operations that
//! create, load, mutate and remove it on the ledger.
//!
//! # Invariants
//!
//! - balance never goes negative through [`TraderAccount::adjust_balance`]
//! - a holding of quantity 0 is removed, never retained

pub mod registry;
pub mod types;

pub use registry::{AccountRegistry, DEFAULT_STARTING_BALANCE};
pub use types::TraderAccount;
