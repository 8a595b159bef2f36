//! Persisted key layout
//!
//! ```text
//! account:<holder id>       TraderAccount document
//! security:<symbol>         SecurityAsset document
//! order:<order key>         order record (terms + commitment)
//! orderIndex:<order key>    commitment of the order's current state
//! sequence:orderKey         last assigned order key
//! ```

pub const ACCOUNT_PREFIX: &str = "account:";
pub const SECURITY_PREFIX: &str = "security:";
pub const ORDER_PREFIX: &str = "order:";
pub const ORDER_INDEX_PREFIX: &str = "orderIndex:";
pub const ORDER_SEQUENCE: &str = "sequence:orderKey";

pub fn account(holder: &str) -> String {
    format!("{}{}", ACCOUNT_PREFIX, holder)
}

pub fn security(symbol: &str) -> String {
    format!("{}{}", SECURITY_PREFIX, symbol)
}

pub fn order(order_key: &str) -> String {
    format!("{}{}", ORDER_PREFIX, order_key)
}

pub fn order_index(order_key: &str) -> String {
    format!("{}{}", ORDER_INDEX_PREFIX, order_key)
}

/// Strip `prefix` from a scanned key
pub fn suffix<'k>(key: &'k str, prefix: &str) -> Option<&'k str> {
    key.strip_prefix(prefix)
}
