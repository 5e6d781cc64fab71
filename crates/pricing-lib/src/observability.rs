//! Observability infrastructure for the price service
//!
//! Provides:
//! - Prometheus metrics (prediction latency and counts, error kinds, artifact info)
//! - Structured lifecycle logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge_vec, GaugeVec, Histogram, IntCounter, IntCounterVec, IntGaugeVec,
};
use std::sync::OnceLock;
use tracing::info;

/// Histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PricingMetricsInner> = OnceLock::new();

struct PricingMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    prediction_errors_total: IntCounterVec,
    model_info: GaugeVec,
    encoder_classes: IntGaugeVec,
}

impl PricingMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "car_price_prediction_latency_seconds",
                "Time spent encoding a request and running the price model",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "car_price_predictions_total",
                "Total number of successful price predictions"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter_vec!(
                "car_price_prediction_errors_total",
                "Total number of rejected or failed prediction requests",
                &["kind"]
            )
            .expect("Failed to register prediction_errors_total"),

            model_info: register_gauge_vec!(
                "car_price_model_info",
                "Information about the loaded model artifacts",
                &["model_sha256", "encoders_sha256"]
            )
            .expect("Failed to register model_info"),

            encoder_classes: register_int_gauge_vec!(
                "car_price_encoder_classes",
                "Number of known categories per encoded field",
                &["field"]
            )
            .expect("Failed to register encoder_classes"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance. Clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct PricingMetrics {
    _private: (),
}

impl Default for PricingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PricingMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PricingMetricsInner {
        GLOBAL_METRICS.get_or_init(PricingMetricsInner::new)
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    /// Count a failed request by error kind
    pub fn inc_prediction_errors(&self, kind: &str) {
        self.inner()
            .prediction_errors_total
            .with_label_values(&[kind])
            .inc();
    }

    pub fn set_model_info(&self, model_sha256: &str, encoders_sha256: &str) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[model_sha256, encoders_sha256])
            .set(1.0);
    }

    pub fn set_encoder_classes(&self, field: &str, classes: usize) {
        self.inner()
            .encoder_classes
            .with_label_values(&[field])
            .set(classes as i64);
    }
}

/// Structured logger for service lifecycle events
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, model_sha256: &str, addr: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            model_sha256 = %model_sha256,
            addr = %addr,
            "Price service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Price service shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_handles_share_registry() {
        let metrics = PricingMetrics::new();
        let other = metrics.clone();

        metrics.observe_prediction_latency(0.002);
        metrics.inc_predictions();
        other.inc_prediction_errors("unknown_category");
        other.set_model_info("abc", "def");
        other.set_encoder_classes("brand", 12);

        let families = prometheus::gather();
        let names: Vec<&str> = families.iter().map(|f| f.get_name()).collect();
        assert!(names.contains(&"car_price_predictions_total"));
        assert!(names.contains(&"car_price_prediction_errors_total"));
        assert!(names.contains(&"car_price_encoder_classes"));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("car-price-service");
        assert_eq!(logger.service, "car-price-service");
    }
}
