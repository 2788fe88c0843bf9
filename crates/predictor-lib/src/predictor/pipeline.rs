//! End-to-end prediction for a single property
//!
//! raw attributes -> engineered features -> declared-order vector ->
//! model invocation -> price, price per sqft and confidence.

use super::alignment::FeatureAligner;
use super::features::FeatureEngineer;
use super::output::OutputFormatter;
use crate::artifact::ModelArtifact;
use crate::error::{PredictorError, Result};
use crate::models::{ModelInfo, PredictionResult, RawAttributes};
use crate::observability::PredictorMetrics;
use anyhow::{anyhow, Context};
use std::time::Instant;
use tracing::{debug, warn};

const DEFAULT_TRAINING_DATE: &str = "unknown";
const DEFAULT_MODEL_VERSION: &str = "1.0.0";

/// Applies a loaded model artifact to raw property attributes
pub struct PricePredictor {
    artifact: ModelArtifact,
    engineer: FeatureEngineer,
    aligner: FeatureAligner,
    formatter: OutputFormatter,
    metrics: PredictorMetrics,
}

impl PricePredictor {
    pub fn new(artifact: ModelArtifact) -> Self {
        let aligner = FeatureAligner::new(artifact.feature_names().to_vec());
        let metrics = PredictorMetrics::new();
        metrics.set_model_info(artifact.model_type(), &model_version(&artifact));
        Self {
            artifact,
            engineer: FeatureEngineer::new(),
            aligner,
            formatter: OutputFormatter::new(),
            metrics,
        }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Predict the price of one property. Inputs are assumed pre-validated.
    pub fn predict(&self, raw: &RawAttributes) -> Result<PredictionResult> {
        let start = Instant::now();
        let result = self.run(raw);
        self.metrics
            .observe_prediction_latency(start.elapsed().as_secs_f64());

        match &result {
            Ok(prediction) => {
                self.metrics.inc_predictions();
                debug!(
                    price = prediction.price,
                    confidence = %prediction.confidence,
                    elapsed_us = start.elapsed().as_micros(),
                    "Prediction completed"
                );
            }
            Err(_) => self.metrics.inc_prediction_errors(),
        }
        result
    }

    fn run(&self, raw: &RawAttributes) -> Result<PredictionResult> {
        let features = self.engineer.derive(raw);
        let aligned = self.aligner.align(&features);
        if !aligned.missing.is_empty() {
            self.metrics.inc_missing_features(aligned.missing.len() as u64);
        }

        if let Some(pos) = aligned.values.iter().position(|v| !v.is_finite()) {
            return Err(PredictorError::Prediction(format!(
                "feature {} is not finite ({})",
                self.aligner.declared_order()[pos],
                aligned.values[pos]
            )));
        }

        let price = self
            .artifact
            .model()
            .invoke(&aligned.values)
            .with_context(|| format!("{} invocation failed", self.artifact.model().name()))
            .map_err(PredictorError::prediction)?;

        if !price.is_finite() {
            return Err(PredictorError::prediction(anyhow!(
                "model returned a non-finite price ({})",
                price
            )));
        }
        if price <= 0.0 {
            warn!(price, area = raw.area, "Model predicted a non-positive price");
        }

        Ok(self.formatter.format(raw, price))
    }

    /// Describe the loaded model
    pub fn info(&self) -> ModelInfo {
        let metadata = self.artifact.metadata();
        ModelInfo {
            model_type: self.artifact.model_type().to_string(),
            performance_metrics: metadata.performance.clone(),
            feature_names: self.artifact.feature_names().to_vec(),
            training_date: metadata
                .training_date
                .clone()
                .unwrap_or_else(|| DEFAULT_TRAINING_DATE.to_string()),
            model_version: model_version(&self.artifact),
            artifact_file: self.artifact.file_name().to_string(),
            artifact_checksum: self.artifact.checksum().to_string(),
        }
    }
}

fn model_version(artifact: &ModelArtifact) -> String {
    artifact
        .metadata()
        .model_version
        .clone()
        .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string())
}
