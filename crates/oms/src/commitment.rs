//! Order commitments
//!
//! An order's identity is the SHA-256 digest of its canonical encoding. The
//! encoding is a domain tag followed by every field as a netstring
//! (`<len>:<bytes>,`) in this fixed order:
//!
//! ```text
//! order_key, side, symbol, quantity, price, timestamp, locked, settled, owner_id
//! ```
//!
//! Length prefixes keep field boundaries unambiguous whatever the field
//! contents, so two different orders never share an encoding.

use std::fmt;
use std::str::FromStr;

use common::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::types::Order;

const DOMAIN_TAG: &str = "hypx/order/v1";

/// Fixed-length commitment to an order's terms
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment([u8; 32]);

impl Commitment {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.to_hex())
    }
}

impl FromStr for Commitment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| Error::invalid_argument(format!("invalid commitment '{}': {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

fn push_field(buf: &mut Vec<u8>, field: &[u8]) {
    buf.extend_from_slice(field.len().to_string().as_bytes());
    buf.push(b':');
    buf.extend_from_slice(field);
    buf.push(b',');
}

/// Canonical byte encoding of an order's terms
pub fn canonicalize(order: &Order) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);
    push_field(&mut buf, DOMAIN_TAG.as_bytes());
    push_field(&mut buf, order.order_key.as_str().as_bytes());
    push_field(&mut buf, order.side.as_str().as_bytes());
    push_field(&mut buf, order.symbol.as_bytes());
    push_field(&mut buf, order.quantity.to_string().as_bytes());
    push_field(&mut buf, order.price.to_string().as_bytes());
    push_field(&mut buf, order.timestamp.to_string().as_bytes());
    push_field(&mut buf, order.locked.to_string().as_bytes());
    push_field(&mut buf, order.settled.to_string().as_bytes());
    push_field(&mut buf, order.owner_id.as_str().as_bytes());
    buf
}

/// Commitment over an order's canonical encoding
pub fn commit(order: &Order) -> Commitment {
    Commitment(Sha256::digest(canonicalize(order)).into())
}

/// True if `order` commits to exactly `expected`
pub fn verify(order: &Order, expected: &Commitment) -> bool {
    commit(order) == *expected
}
