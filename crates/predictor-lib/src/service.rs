//! Service handle exposed to the transport layer
//!
//! The handle is built once at start-up and cloned into request handlers.
//! A handle without a predictor represents a process whose artifact failed
//! to load: every operation then reports the model as unavailable.

use crate::artifact::{ArtifactConfig, ArtifactLoader};
use crate::error::{PredictorError, Result};
use crate::models::{ModelInfo, PredictionResult, RawAttributes};
use crate::observability::PredictorMetrics;
use crate::predictor::PricePredictor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response of a successful health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub timestamp: DateTime<Utc>,
    /// Process-wide counters since start-up
    pub predictions_total: u64,
    pub prediction_errors_total: u64,
}

/// Shared, read-only access to the loaded predictor
#[derive(Clone, Default)]
pub struct ServiceHandle {
    predictor: Option<Arc<PricePredictor>>,
    metrics: PredictorMetrics,
}

impl ServiceHandle {
    /// Load the artifact from `config.model_dir`; blocks on file I/O
    pub fn initialize(config: &ArtifactConfig) -> Result<Self> {
        let artifact = ArtifactLoader::new(config.clone()).load()?;
        Ok(Self::from_predictor(PricePredictor::new(artifact)))
    }

    pub fn from_predictor(predictor: PricePredictor) -> Self {
        Self {
            predictor: Some(Arc::new(predictor)),
            metrics: PredictorMetrics::new(),
        }
    }

    /// A handle with no model loaded
    pub fn unavailable() -> Self {
        Self {
            predictor: None,
            metrics: PredictorMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &PredictorMetrics {
        &self.metrics
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.is_some()
    }

    fn predictor(&self) -> Result<&PricePredictor> {
        self.predictor
            .as_deref()
            .ok_or(PredictorError::ModelUnavailable)
    }

    pub fn predict(&self, raw: &RawAttributes) -> Result<PredictionResult> {
        self.predictor()?.predict(raw)
    }

    pub fn model_info(&self) -> Result<ModelInfo> {
        Ok(self.predictor()?.info())
    }

    pub fn health_status(&self) -> Result<HealthStatus> {
        if !self.is_loaded() {
            return Err(PredictorError::ServiceUnavailable(
                "model not loaded".to_string(),
            ));
        }
        Ok(HealthStatus {
            status: "healthy".to_string(),
            model_loaded: true,
            timestamp: Utc::now(),
            predictions_total: self.metrics.predictions(),
            prediction_errors_total: self.metrics.prediction_errors(),
        })
    }
}

impl std::fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{DataInfo, ModelArtifact, TrainingMetadata};
    use crate::model::LinearRegressor;
    use std::fs;
    use tempfile::TempDir;

    fn linear_handle() -> ServiceHandle {
        let metadata = TrainingMetadata {
            data_info: DataInfo {
                feature_names: vec!["area".to_string(), "rooms_total".to_string()],
            },
            ..Default::default()
        };
        let artifact = ModelArtifact::new(
            Box::new(LinearRegressor::new(vec![100.0, 20_000.0], 0.0)),
            metadata,
            "best_model_test.json",
            "deadbeef",
        );
        ServiceHandle::from_predictor(PricePredictor::new(artifact))
    }

    #[test]
    fn test_unavailable_handle() {
        let handle = ServiceHandle::unavailable();
        assert!(!handle.is_loaded());
        assert!(matches!(
            handle.predict(&RawAttributes::reference()),
            Err(PredictorError::ModelUnavailable)
        ));
        assert!(matches!(
            handle.model_info(),
            Err(PredictorError::ModelUnavailable)
        ));
        assert!(matches!(
            handle.health_status(),
            Err(PredictorError::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn test_loaded_handle() {
        let handle = linear_handle();
        let status = handle.health_status().unwrap();
        assert_eq!(status.status, "healthy");
        assert!(status.model_loaded);

        let result = handle.predict(&RawAttributes::reference()).unwrap();
        assert_eq!(result.price, 742_000.0 + 100_000.0);

        let info = handle.model_info().unwrap();
        assert_eq!(info.artifact_checksum, "deadbeef");
    }

    #[test]
    fn test_health_status_reports_prediction_counters() {
        let handle = linear_handle();
        let before = handle.health_status().unwrap().predictions_total;

        handle.predict(&RawAttributes::reference()).unwrap();

        // Counters are process-wide; other tests may bump them concurrently
        let after = handle.health_status().unwrap();
        assert!(after.predictions_total > before);
        assert!(handle.metrics().predictions() >= after.predictions_total);
    }

    #[test]
    fn test_clones_share_predictor_across_threads() {
        let handle = linear_handle();
        let expected = handle.predict(&RawAttributes::reference()).unwrap().price;

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                std::thread::spawn(move || handle.predict(&RawAttributes::reference()).unwrap().price)
            })
            .collect();

        for worker in workers {
            assert_eq!(worker.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_initialize_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("best_model_1.json"),
            r#"{"coefficients": [150.0], "intercept": 10000.0}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("model_metadata_1.json"),
            r#"{"data_info": {"feature_names": ["area"]}, "model_version": "3.0.0"}"#,
        )
        .unwrap();

        let handle = ServiceHandle::initialize(&ArtifactConfig {
            model_dir: dir.path().to_path_buf(),
        })
        .unwrap();

        assert_eq!(handle.model_info().unwrap().model_version, "3.0.0");
        let result = handle.predict(&RawAttributes::reference()).unwrap();
        assert_eq!(result.price, 10_000.0 + 150.0 * 7420.0);
    }

    #[test]
    fn test_initialize_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = ServiceHandle::initialize(&ArtifactConfig {
            model_dir: dir.path().join("missing"),
        });
        assert!(matches!(result, Err(PredictorError::ArtifactNotFound(_))));
    }
}
