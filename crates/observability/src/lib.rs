//! Observability infrastructure for HypExchange
//!
//! This crate provides:
//! - Structured logging via tracing
//! - Prometheus metrics for exchange operations
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("hypx", LogFormat::Pretty, "info")?;
//!
//! // Optional; render with `handle.render()`
//! let handle = observability::init_metrics()?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, ExchangeMetrics, OperationTimer};
