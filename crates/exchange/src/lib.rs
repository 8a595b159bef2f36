//! HypExchange request surface
//!
//! [`Exchange`] runs each logical request as one transaction against a
//! [`storage::LedgerStore`]: the operation either commits every write and
//! publishes its events, or fails and leaves the ledger untouched.
//!
//! # Example
//!
//! ```ignore
//! use common::{LogEmitter, StaticIdentity};
//! use exchange::{Exchange, ExchangeSettings};
//! use storage::InMemoryLedger;
//!
//! let mut exchange = Exchange::new(InMemoryLedger::new(), LogEmitter, ExchangeSettings::default());
//! let alice = StaticIdentity::new("alice");
//! exchange.register(&alice)?;
//! exchange.issue(&alice, "ACME", "Acme Corp", 100)?;
//! ```

pub mod service;
pub mod settings;

pub use service::Exchange;
pub use settings::ExchangeSettings;

// Request and response types used by the surface
pub use account::TraderAccount;
pub use instrument::SecurityAsset;
pub use oms::{Commitment, OrderRecord, OrderRef, PlaceOrder};
pub use settlement::{SettleRequest, SettlementReceipt};
