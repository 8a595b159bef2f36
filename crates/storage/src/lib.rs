//! Ledger storage for HypExchange
//!
//! The ledger is the only persistence mechanism of the exchange core. This
//! crate provides:
//!
//! - [`LedgerStore`] - byte-oriented key-value interface
//! - [`InMemoryLedger`] and [`FileLedger`] - store implementations
//! - [`Transaction`] - buffered, all-or-nothing write overlay
//! - [`TxContext`] - per-invocation caller, transaction and event buffer
//! - [`keys`] - persisted key layout

pub mod codec;
pub mod context;
pub mod error;
pub mod file;
pub mod keys;
pub mod ledger;
pub mod memory;
pub mod transaction;

pub use codec::LedgerExt;
pub use context::TxContext;
pub use error::StorageError;
pub use file::FileLedger;
pub use ledger::LedgerStore;
pub use memory::InMemoryLedger;
pub use transaction::Transaction;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
