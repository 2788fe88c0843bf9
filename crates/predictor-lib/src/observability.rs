//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, outcome counters, model info)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, GaugeVec, Histogram, IntCounter,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct PredictorMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    prediction_errors_total: IntCounter,
    missing_features_total: IntCounter,
    model_info: GaugeVec,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "price_predictor_prediction_latency_seconds",
                "Time spent on feature engineering and model inference per request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "price_predictor_predictions_total",
                "Total number of successful predictions"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter!(
                "price_predictor_prediction_errors_total",
                "Total number of failed predictions"
            )
            .expect("Failed to register prediction_errors_total"),

            missing_features_total: register_int_counter!(
                "price_predictor_missing_features_total",
                "Declared model features that had to be defaulted during alignment"
            )
            .expect("Failed to register missing_features_total"),

            model_info: register_gauge_vec!(
                "price_predictor_model_info",
                "Information about the currently loaded model",
                &["model_type", "model_version"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Prediction metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new)
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    pub fn inc_missing_features(&self, count: u64) {
        self.inner().missing_features_total.inc_by(count);
    }

    /// Update model info
    pub fn set_model_info(&self, model_type: &str, model_version: &str) {
        // Reset previous model
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[model_type, model_version])
            .set(1.0);
    }

    pub fn predictions(&self) -> u64 {
        self.inner().predictions_total.get()
    }

    pub fn prediction_errors(&self) -> u64 {
        self.inner().prediction_errors_total.get()
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for start-up, model
/// loading, predictions and shutdown.
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, model_dir: &str) {
        info!(
            event = "service_started",
            service = %self.service_name,
            version = %version,
            model_dir = %model_dir,
            "Price prediction service started"
        );
    }

    /// Log a successful model load
    pub fn log_model_loaded(
        &self,
        artifact_file: &str,
        model_type: &str,
        model_version: &str,
        feature_count: usize,
        checksum: &str,
    ) {
        info!(
            event = "model_loaded",
            service = %self.service_name,
            artifact_file = %artifact_file,
            model_type = %model_type,
            model_version = %model_version,
            feature_count = feature_count,
            checksum = %checksum,
            "Model artifact loaded"
        );
    }

    /// Log a failed model load; the service keeps running but cannot predict
    pub fn log_model_load_failed(&self, model_dir: &str, reason: &str) {
        error!(
            event = "model_load_failed",
            service = %self.service_name,
            model_dir = %model_dir,
            reason = %reason,
            "Model artifact could not be loaded, predictions unavailable"
        );
    }

    /// Log a prediction served to a client
    pub fn log_prediction(&self, area: f64, bedrooms: u8, price: f64, confidence: &str) {
        info!(
            event = "prediction_generated",
            service = %self.service_name,
            area = area,
            bedrooms = bedrooms,
            price = price,
            confidence = %confidence,
            "Generated price prediction"
        );
    }

    /// Log a failed prediction with the full error
    pub fn log_prediction_failed(&self, area: f64, bedrooms: u8, error: &str) {
        warn!(
            event = "prediction_failed",
            service = %self.service_name,
            area = area,
            bedrooms = bedrooms,
            error = %error,
            "Price prediction failed"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Price prediction service shutting down"
        );
    }
}
