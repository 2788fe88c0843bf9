//! Regression model backends
//!
//! A model is anything that maps one row of N features to a price. Each
//! supported serialization format gets its own adapter.

mod linear;
mod onnx;

pub use linear::LinearRegressor;
pub use onnx::OnnxRegressor;

use anyhow::{bail, Result};
use std::path::Path;

/// Invocation contract shared by every model backend
pub trait RegressionModel: Send + Sync {
    /// Predict a single price from features in declared order
    fn invoke(&self, features: &[f64]) -> Result<f64>;

    /// Human-readable backend or estimator name
    fn name(&self) -> &str;
}

/// Supported on-disk model formats, keyed by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Onnx,
    LinearJson,
}

impl ModelFormat {
    pub const EXTENSIONS: [&'static str; 2] = ["onnx", "json"];

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("onnx") => Some(ModelFormat::Onnx),
            Some("json") => Some(ModelFormat::LinearJson),
            _ => None,
        }
    }
}

/// Deserialize a model of the given format expecting `num_features` inputs
pub fn load_model(
    format: ModelFormat,
    bytes: &[u8],
    num_features: usize,
) -> Result<Box<dyn RegressionModel>> {
    if num_features == 0 {
        bail!("Model must declare at least one input feature");
    }
    let model: Box<dyn RegressionModel> = match format {
        ModelFormat::Onnx => Box::new(OnnxRegressor::from_bytes(bytes, num_features)?),
        ModelFormat::LinearJson => Box::new(LinearRegressor::from_bytes(bytes, num_features)?),
    };
    Ok(model)
}
