//! Error taxonomy for the prediction service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictorError>;

/// Failures surfaced by the prediction core to its callers
#[derive(Debug, Error)]
pub enum PredictorError {
    /// The model directory or model file could not be found (start-up)
    #[error("model artifact not found: {0}")]
    ArtifactNotFound(String),

    /// The model or its metadata could not be read or deserialized (start-up)
    #[error("model artifact corrupt: {0}")]
    ArtifactCorrupt(String),

    /// No model has been loaded into the service
    #[error("model not loaded")]
    ModelUnavailable,

    /// Raw attributes outside the accepted bounds
    #[error("invalid input: {0}")]
    Validation(String),

    /// Any fault during feature computation or model invocation
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// The service cannot serve requests at all
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl PredictorError {
    /// Wrap an internal error, keeping its full context chain in the message
    pub fn prediction(err: anyhow::Error) -> Self {
        PredictorError::Prediction(format!("{:#}", err))
    }

    /// Whether the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PredictorError::ModelUnavailable | PredictorError::ServiceUnavailable(_)
        )
    }
}
