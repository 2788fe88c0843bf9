//! Loading of the trained model artifact
//!
//! This module provides:
//! - Discovery of the model and metadata files in the artifact directory
//! - Checksum computation for the loaded model
//! - Deserialization into a model backend plus its declared feature order

mod discovery;
mod metadata;

pub use discovery::{
    find_candidates, select_metadata, select_newest, Candidate, METADATA_PREFIX, MODEL_PREFIX,
};
pub use metadata::{DataInfo, TrainingMetadata};

use crate::error::{PredictorError, Result};
use crate::model::{load_model, ModelFormat, RegressionModel};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where to look for artifacts
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub model_dir: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
        }
    }
}

/// Trained model, its declared feature order and training metadata
pub struct ModelArtifact {
    model: Box<dyn RegressionModel>,
    metadata: TrainingMetadata,
    file_name: String,
    checksum: String,
}

impl ModelArtifact {
    /// Assemble an artifact from an in-memory model
    pub fn new(
        model: Box<dyn RegressionModel>,
        metadata: TrainingMetadata,
        file_name: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        Self {
            model,
            metadata,
            file_name: file_name.into(),
            checksum: checksum.into(),
        }
    }

    pub fn model(&self) -> &dyn RegressionModel {
        self.model.as_ref()
    }

    pub fn feature_names(&self) -> &[String] {
        self.metadata.feature_names()
    }

    pub fn metadata(&self) -> &TrainingMetadata {
        &self.metadata
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Estimator name from metadata, else the backend's own name
    pub fn model_type(&self) -> &str {
        self.metadata
            .model_type
            .as_deref()
            .unwrap_or_else(|| self.model.name())
    }
}

impl std::fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("model", &self.model.name())
            .field("file_name", &self.file_name)
            .field("checksum", &self.checksum)
            .field("features", &self.feature_names().len())
            .finish()
    }
}

/// Loads the model artifact from the configured directory
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    config: ArtifactConfig,
}

impl ArtifactLoader {
    pub fn new(config: ArtifactConfig) -> Self {
        Self { config }
    }

    pub fn model_dir(&self) -> &Path {
        &self.config.model_dir
    }

    /// Locate, verify and deserialize the model and its metadata
    pub fn load(&self) -> Result<ModelArtifact> {
        let dir = &self.config.model_dir;
        if !dir.is_dir() {
            return Err(PredictorError::ArtifactNotFound(format!(
                "model directory {:?} does not exist",
                dir
            )));
        }

        let models = find_candidates(dir, MODEL_PREFIX, &ModelFormat::EXTENSIONS)
            .map_err(|e| PredictorError::ArtifactNotFound(format!("{:#}", e)))?;
        let model_file = select_newest(&models).ok_or_else(|| {
            PredictorError::ArtifactNotFound(format!(
                "no {}*.{{onnx,json}} file in {:?}",
                MODEL_PREFIX, dir
            ))
        })?;
        info!(
            path = ?model_file.path,
            candidates = models.len(),
            "Selected model artifact"
        );

        let metadata = self.load_metadata(dir, model_file)?;

        let bytes = fs::read(&model_file.path).map_err(|e| {
            PredictorError::ArtifactCorrupt(format!("failed to read {:?}: {}", model_file.path, e))
        })?;
        let checksum = compute_checksum(&bytes);

        let format = ModelFormat::from_path(&model_file.path).ok_or_else(|| {
            PredictorError::ArtifactCorrupt(format!("unsupported model format {:?}", model_file.path))
        })?;
        let model = load_model(format, &bytes, metadata.feature_names().len()).map_err(|e| {
            PredictorError::ArtifactCorrupt(format!("{}: {:#}", model_file.file_name(), e))
        })?;

        info!(
            model = %model.name(),
            features = metadata.feature_names().len(),
            checksum = %checksum,
            "Model artifact loaded"
        );

        Ok(ModelArtifact::new(model, metadata, model_file.file_name(), checksum))
    }

    fn load_metadata(&self, dir: &Path, model_file: &Candidate) -> Result<TrainingMetadata> {
        let candidates = find_candidates(dir, METADATA_PREFIX, &["json"])
            .map_err(|e| PredictorError::ArtifactCorrupt(format!("{:#}", e)))?;

        let (metadata_file, paired) = select_metadata(&candidates, &model_file.suffix)
            .ok_or_else(|| {
                PredictorError::ArtifactCorrupt(format!(
                    "no {}*.json metadata next to {}; the feature order is unknown",
                    METADATA_PREFIX,
                    model_file.file_name()
                ))
            })?;
        if !paired {
            warn!(
                model = %model_file.file_name(),
                metadata = %metadata_file.file_name(),
                "No metadata with a matching suffix, using the newest metadata file"
            );
        }

        let bytes = fs::read(&metadata_file.path).map_err(|e| {
            PredictorError::ArtifactCorrupt(format!(
                "failed to read {:?}: {}",
                metadata_file.path, e
            ))
        })?;
        TrainingMetadata::from_bytes(&bytes).map_err(|e| {
            PredictorError::ArtifactCorrupt(format!("{}: {:#}", metadata_file.file_name(), e))
        })
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    const METADATA: &str = r#"{
        "data_info": {"feature_names": ["area", "bedrooms", "luxury_score"]},
        "performance": {"test_r2": 0.67},
        "training_date": "2024-06-01",
        "model_version": "1.2.0"
    }"#;

    fn linear_model(intercept: f64) -> String {
        format!(
            r#"{{"coefficients": [100.0, 10000.0, 5000.0], "intercept": {}}}"#,
            intercept
        )
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn set_mtime(path: &Path, secs: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn loader(dir: &Path) -> ArtifactLoader {
        ArtifactLoader::new(ArtifactConfig {
            model_dir: dir.to_path_buf(),
        })
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = loader(&dir.path().join("models")).load();
        assert!(matches!(result, Err(PredictorError::ArtifactNotFound(_))));
    }

    #[test]
    fn test_no_model_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "model_metadata_1.json", METADATA);
        write(dir.path(), "best_model_1.pkl", "pickle");
        let result = loader(dir.path()).load();
        assert!(matches!(result, Err(PredictorError::ArtifactNotFound(_))));
    }

    #[test]
    fn test_missing_metadata_is_corrupt() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "best_model_1.json", &linear_model(0.0));
        let result = loader(dir.path()).load();
        assert!(matches!(result, Err(PredictorError::ArtifactCorrupt(_))));
    }

    #[test]
    fn test_metadata_without_feature_names_is_corrupt() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "best_model_1.json", &linear_model(0.0));
        write(dir.path(), "model_metadata_1.json", r#"{"performance": {}}"#);
        let result = loader(dir.path()).load();
        assert!(matches!(result, Err(PredictorError::ArtifactCorrupt(_))));
    }

    #[test]
    fn test_corrupt_model_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "best_model_1.json", "\u{0080}garbage");
        write(dir.path(), "model_metadata_1.json", METADATA);
        let result = loader(dir.path()).load();
        assert!(matches!(result, Err(PredictorError::ArtifactCorrupt(_))));

        let dir = TempDir::new().unwrap();
        write(dir.path(), "best_model_1.onnx", "not an onnx graph");
        write(dir.path(), "model_metadata_1.json", METADATA);
        let result = loader(dir.path()).load();
        assert!(matches!(result, Err(PredictorError::ArtifactCorrupt(_))));
    }

    #[test]
    fn test_feature_count_mismatch_is_corrupt() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "best_model_1.json",
            r#"{"coefficients": [1.0], "intercept": 0.0}"#,
        );
        write(dir.path(), "model_metadata_1.json", METADATA);
        let result = loader(dir.path()).load();
        assert!(matches!(result, Err(PredictorError::ArtifactCorrupt(_))));
    }

    #[test]
    fn test_loads_model_and_metadata() {
        let dir = TempDir::new().unwrap();
        let content = linear_model(1000.0);
        write(dir.path(), "best_model_20240601.json", &content);
        write(dir.path(), "model_metadata_20240601.json", METADATA);

        let artifact = loader(dir.path()).load().unwrap();
        assert_eq!(artifact.feature_names(), ["area", "bedrooms", "luxury_score"]);
        assert_eq!(artifact.file_name(), "best_model_20240601.json");
        assert_eq!(artifact.checksum(), compute_checksum(content.as_bytes()));
        assert_eq!(artifact.model_type(), "LinearRegression");
        assert_eq!(artifact.metadata().model_version.as_deref(), Some("1.2.0"));

        let price = artifact.model().invoke(&[2000.0, 3.0, 1.0]).unwrap();
        assert_eq!(price, 1000.0 + 200_000.0 + 30_000.0 + 5000.0);
    }

    #[test]
    fn test_newest_model_selected() {
        let dir = TempDir::new().unwrap();
        let old = write(dir.path(), "best_model_b.json", &linear_model(1.0));
        let new = write(dir.path(), "best_model_a.json", &linear_model(2.0));
        set_mtime(&old, 1_000);
        set_mtime(&new, 2_000);
        write(dir.path(), "model_metadata_a.json", METADATA);
        write(dir.path(), "model_metadata_b.json", METADATA);

        let artifact = loader(dir.path()).load().unwrap();
        assert_eq!(artifact.file_name(), "best_model_a.json");
        assert_eq!(artifact.model().invoke(&[0.0, 0.0, 0.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_paired_metadata_preferred() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "best_model_v1.json", &linear_model(0.0));
        let paired = write(dir.path(), "model_metadata_v1.json", METADATA);
        let newer = write(
            dir.path(),
            "model_metadata_v2.json",
            r#"{"data_info": {"feature_names": ["area"]}}"#,
        );
        set_mtime(&paired, 1_000);
        set_mtime(&newer, 5_000);

        let artifact = loader(dir.path()).load().unwrap();
        assert_eq!(artifact.feature_names().len(), 3);
    }

    #[test]
    fn test_checksum() {
        let checksum = compute_checksum(b"hello world");
        assert_eq!(
            checksum,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
