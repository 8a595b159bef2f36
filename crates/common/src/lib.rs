//! Common types and utilities for HypExchange
//!
//! This crate provides shared types and the seams to the host runtime used
//! across all HypExchange crates.
//!
//! # Modules
//!
//! - [`error`] - Closed error taxonomy surfaced to callers
//! - [`types`] - Shared domain types (HolderId, Side, OrderKey)
//! - [`identity`] - Caller identity resolution
//! - [`events`] - Domain events and the event emitter interface

pub mod error;
pub mod events;
pub mod identity;
pub mod types;

pub use error::{Entity, Error, ErrorKind, Result};
pub use events::{DomainEvent, EventEmitter, LogEmitter, RecordingEmitter};
pub use identity::{IdentityProvider, StaticIdentity};
pub use types::*;
