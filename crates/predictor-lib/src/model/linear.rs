//! Linear regression model stored as JSON coefficients

use super::RegressionModel;
use anyhow::{bail, Context, Result};
use serde::Deserialize;

const DEFAULT_NAME: &str = "LinearRegression";

#[derive(Debug, Deserialize)]
struct LinearParams {
    #[serde(default)]
    model_type: Option<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

/// `intercept + Σ coefficient·x` over the declared features
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    name: String,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            coefficients,
            intercept,
        }
    }

    /// Parse the JSON document and check it matches the declared feature count
    pub fn from_bytes(bytes: &[u8], num_features: usize) -> Result<Self> {
        let params: LinearParams =
            serde_json::from_slice(bytes).context("Failed to parse linear model JSON")?;

        if params.coefficients.len() != num_features {
            bail!(
                "Linear model has {} coefficients, expected {}",
                params.coefficients.len(),
                num_features
            );
        }
        if !params.intercept.is_finite() || params.coefficients.iter().any(|c| !c.is_finite()) {
            bail!("Linear model contains non-finite parameters");
        }

        Ok(Self {
            name: params.model_type.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            coefficients: params.coefficients,
            intercept: params.intercept,
        })
    }
}

impl RegressionModel for LinearRegressor {
    fn invoke(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            bail!(
                "Input has {} features, model expects {}",
                features.len(),
                self.coefficients.len()
            );
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
