//! # Instrument Crate
//!
//! The security registry of HypExchange. A [`SecurityAsset`] is a tradable
//! instrument identified by its symbol; issuing one credits the whole issued
//! quantity to the issuer's holdings.
//!
//! ## Key Components
//!
//! - **Domain Types**: `SecurityAsset`
//! - **Registry**: `SecurityRegistry` for issue / get / remove / list
//!
//! Removing a security does not touch any account's holdings of it.

pub mod registry;
pub mod types;

pub use registry::SecurityRegistry;
pub use types::SecurityAsset;
