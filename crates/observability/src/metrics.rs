//! Prometheus metrics for exchange operations
//!
//! Metrics go through the `metrics` facade. Without an installed recorder
//! every call is a no-op, so the core can record unconditionally.

use std::time::{Duration, Instant};

use common::ErrorKind;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering
///
/// No HTTP listener is started; the caller decides where the rendered
/// snapshot goes.
///
/// # Example
///
/// ```ignore
/// let handle = observability::init_metrics()?;
/// // ... run operations ...
/// println!("{}", handle.render());
/// ```
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::debug!("Metrics recorder installed");
    Ok(handle)
}

/// Exchange operation metrics
///
/// # Metrics
///
/// * `exchange_operations_total{operation,outcome}` - completed operations
/// * `exchange_rejections_total{operation,kind}` - failures by error kind
/// * `exchange_security_events_total{kind}` - integrity mismatches and duplicate orders
/// * `exchange_settled_value_total` - currency moved by settlements
/// * `exchange_operation_duration_seconds{operation}` - operation latency
#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeMetrics;

impl ExchangeMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Record a committed operation
    pub fn record_success(&self, operation: &'static str) {
        counter!("exchange_operations_total", "operation" => operation, "outcome" => "success")
            .increment(1);
    }

    /// Record a failed operation
    pub fn record_failure(&self, operation: &'static str, kind: ErrorKind, security_relevant: bool) {
        counter!("exchange_operations_total", "operation" => operation, "outcome" => "failure")
            .increment(1);
        counter!("exchange_rejections_total", "operation" => operation, "kind" => kind.as_str())
            .increment(1);

        if security_relevant {
            counter!("exchange_security_events_total", "kind" => kind.as_str()).increment(1);
        }
    }

    /// Add the value of a settlement
    pub fn record_settled_value(&self, value: i64) {
        counter!("exchange_settled_value_total").increment(value.unsigned_abs());
    }

    /// Record how long an operation took
    pub fn record_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("exchange_operation_duration_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }
}

/// Records the operation duration when dropped
///
/// # Example
///
/// ```ignore
/// let metrics = ExchangeMetrics::new();
/// {
///     let _timer = OperationTimer::start(metrics, "settle");
///     // ... run the operation ...
/// } // Duration recorded here
/// ```
pub struct OperationTimer {
    metrics: ExchangeMetrics,
    operation: &'static str,
    start: Instant,
}

impl OperationTimer {
    pub fn start(metrics: ExchangeMetrics, operation: &'static str) -> Self {
        Self {
            metrics,
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        self.metrics
            .record_duration(self.operation, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let metrics = ExchangeMetrics::new();
        metrics.record_success("register");
        metrics.record_failure("settle", ErrorKind::OrderIntegrityMismatch, true);
        metrics.record_settled_value(50);
        drop(OperationTimer::start(metrics, "settle"));
    }

    #[test]
    fn test_counters_render_with_labels() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            let metrics = ExchangeMetrics::new();
            metrics.record_success("register");
            metrics.record_failure("place_order", ErrorKind::DuplicateOrder, true);
            metrics.record_settled_value(50);
        });

        let rendered = handle.render();
        assert!(rendered.contains("exchange_operations_total"));
        assert!(rendered.contains("operation=\"register\""));
        assert!(rendered.contains("kind=\"duplicate_order\""));
        assert!(rendered.contains("exchange_security_events_total"));
        assert!(rendered.contains("exchange_settled_value_total 50"));
    }
}
