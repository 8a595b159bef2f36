//! Domain events published for off-chain consumers
//!
//! Events are fire-and-forget: the core hands them to an [`EventEmitter`]
//! once the operation that raised them has committed, and never retries.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::{HolderId, OrderKey, Side};

/// Notification raised by a committed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// A security was issued
    SecurityCreated {
        symbol: String,
        name: String,
        quantity: u64,
    },

    /// An order was placed
    #[serde(rename_all = "camelCase")]
    OrderCreated {
        order_key: OrderKey,
        symbol: String,
        side: Side,
        quantity: u64,
        price: u64,
        timestamp: i64,
        owner_id: HolderId,
    },

    /// A buy/sell pair was settled
    #[serde(rename_all = "camelCase")]
    OrderSettled { buy_key: OrderKey, sell_key: OrderKey },
}

impl DomainEvent {
    /// Event name as published to the host
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::SecurityCreated { .. } => "SecurityCreated",
            DomainEvent::OrderCreated { .. } => "OrderCreated",
            DomainEvent::OrderSettled { .. } => "OrderSettled",
        }
    }

    /// JSON payload bytes
    pub fn payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Sink for domain events
pub trait EventEmitter {
    fn emit(&self, name: &str, payload: &[u8]);
}

/// Emitter that writes every event to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmitter;

impl EventEmitter for LogEmitter {
    fn emit(&self, name: &str, payload: &[u8]) {
        tracing::info!(
            target: "hypx::events",
            event = name,
            payload = %String::from_utf8_lossy(payload),
            "Event emitted"
        );
    }
}

/// Emitter that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the recorded events in emission order
    pub fn names(&self) -> Vec<String> {
        self.events.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Recorded events decoded back into [`DomainEvent`]; undecodable payloads are skipped
    pub fn decoded(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .iter()
            .filter_map(|(_, payload)| serde_json::from_slice(payload).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventEmitter for RecordingEmitter {
    fn emit(&self, name: &str, payload: &[u8]) {
        self.events.lock().push((name.to_string(), payload.to_vec()));
    }
}
