//! Common error types for HypExchange
//!
//! Every operation surfaces one of these variants. Validation failures are
//! raised before any write reaches the ledger, so an `Err` never leaves
//! partial state behind.

use std::fmt;

use thiserror::Error;

/// Kind of entity a lookup or uniqueness check refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Trader,
    Security,
    Order,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Trader => write!(f, "trader"),
            Entity::Security => write!(f, "security"),
            Entity::Order => write!(f, "order"),
        }
    }
}

/// Error type used across HypExchange crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Entity with this identifier is already present
    #[error("{entity} {id} already exists")]
    AlreadyExists { entity: Entity, id: String },

    /// Entity is absent from the ledger
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: String },

    /// Caller has no active trading account
    #[error("Trader {0} is not registered with this exchange")]
    TraderNotRegistered(String),

    /// Balance would not cover the operation
    #[error("Insufficient funds for {holder}: required {required}, available {available}")]
    InsufficientFunds {
        holder: String,
        required: i64,
        available: i64,
    },

    /// Holding would not cover the operation
    #[error("Insufficient holdings of {symbol} for {holder}: required {required}, available {available}")]
    InsufficientHoldings {
        holder: String,
        symbol: String,
        required: u64,
        available: u64,
    },

    /// An order with an identical commitment is already indexed
    #[error("Duplicate order {order_key} (commitment {commitment})")]
    DuplicateOrder { order_key: String, commitment: String },

    /// Stored order does not match the expected terms
    #[error("Order integrity mismatch for {order_key}: {reason}")]
    OrderIntegrityMismatch { order_key: String, reason: String },

    /// Malformed or out-of-range argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Ledger backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Fieldless discriminant of [`Error`], used for metric labels and boundary handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    TraderNotRegistered,
    InsufficientFunds,
    InsufficientHoldings,
    DuplicateOrder,
    OrderIntegrityMismatch,
    InvalidArgument,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::NotFound => "not_found",
            ErrorKind::TraderNotRegistered => "trader_not_registered",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::InsufficientHoldings => "insufficient_holdings",
            ErrorKind::DuplicateOrder => "duplicate_order",
            ErrorKind::OrderIntegrityMismatch => "order_integrity_mismatch",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias using the common Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::TraderNotRegistered(_) => ErrorKind::TraderNotRegistered,
            Error::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Error::InsufficientHoldings { .. } => ErrorKind::InsufficientHoldings,
            Error::DuplicateOrder { .. } => ErrorKind::DuplicateOrder,
            Error::OrderIntegrityMismatch { .. } => ErrorKind::OrderIntegrityMismatch,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Tampering and replay signals, kept apart from ordinary rejections
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::DuplicateOrder | ErrorKind::OrderIntegrityMismatch
        )
    }

    /// Create an already-exists error
    pub fn already_exists(entity: Entity, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an integrity mismatch error
    pub fn integrity(order_key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OrderIntegrityMismatch {
            order_key: order_key.into(),
            reason: reason.into(),
        }
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_relevant_kinds() {
        assert!(Error::integrity("7", "commitment differs").is_security_relevant());
        assert!(Error::DuplicateOrder {
            order_key: "7".to_string(),
            commitment: "ab".to_string(),
        }
        .is_security_relevant());

        assert!(!Error::not_found(Entity::Order, "7").is_security_relevant());
        assert!(!Error::TraderNotRegistered("h".to_string()).is_security_relevant());
    }

    #[test]
    fn test_display_names_entity() {
        let err = Error::not_found(Entity::Security, "ACME");
        assert_eq!(err.to_string(), "security ACME not found");
        assert_eq!(err.kind().as_str(), "not_found");
    }
}
