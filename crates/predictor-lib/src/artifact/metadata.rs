//! Training metadata document written next to the model

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Dataset section of the metadata document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataInfo {
    #[serde(default)]
    pub feature_names: Vec<String>,
}

/// Metadata produced by the training run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    #[serde(default)]
    pub data_info: DataInfo,
    #[serde(default)]
    pub performance: Option<serde_json::Value>,
    #[serde(default)]
    pub training_date: Option<String>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
}

impl TrainingMetadata {
    /// Parse a metadata document; it must declare a non-empty feature order
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let metadata: TrainingMetadata =
            serde_json::from_slice(bytes).context("Failed to parse metadata JSON")?;

        if metadata.data_info.feature_names.is_empty() {
            bail!("Metadata does not declare data_info.feature_names");
        }

        Ok(metadata)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.data_info.feature_names
    }
}
