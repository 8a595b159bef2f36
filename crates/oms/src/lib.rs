//! Order Management System for HypExchange
//!
//! This crate handles the order lifecycle up to settlement.
//!
//! # Features
//!
//! - Order terms and their canonical encoding
//! - Hash commitments as tamper-evident order identity
//! - Order placement with solvency / holdings validation
//! - Persisted order records and the derived order index
//!
//! # Lifecycle
//!
//! ```text
//! Placed (settled = false) ──settle──▶ Settled (settled = true)
//! ```

pub mod commitment;
pub mod manager;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use commitment::{canonicalize, commit, verify, Commitment};
pub use manager::OrderManager;
pub use store::OrderLedger;
pub use types::{Order, OrderRecord, OrderRef, PlaceOrder};
