//! Discovery of model and metadata files in the artifact directory
//!
//! When several files match a pattern the most recently modified one wins;
//! equal modification times fall back to the greatest file name.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File name prefix of serialized models
pub const MODEL_PREFIX: &str = "best_model_";

/// File name prefix of metadata documents
pub const METADATA_PREFIX: &str = "model_metadata_";

/// A file matching `<prefix><stem>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// The part of the file stem after the prefix
    pub suffix: String,
    pub modified: SystemTime,
}

impl Candidate {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// List files in `dir` named `<prefix>*.<ext>` for any of `extensions`
pub fn find_candidates(dir: &Path, prefix: &str, extensions: &[&str]) -> Result<Vec<Candidate>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read artifact directory {:?}", dir))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {:?}", dir))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !extensions.contains(&ext) {
            continue;
        }
        let Some(suffix) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_prefix(prefix))
        else {
            continue;
        };

        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to stat {:?}", path))?;

        candidates.push(Candidate {
            suffix: suffix.to_string(),
            path,
            modified,
        });
    }

    Ok(candidates)
}

/// Pick the newest candidate, breaking ties on file name
pub fn select_newest(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates
        .iter()
        .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)))
}

/// Prefer the metadata sharing the model's suffix, else the newest one
pub fn select_metadata<'a>(
    candidates: &'a [Candidate],
    model_suffix: &str,
) -> Option<(&'a Candidate, bool)> {
    if let Some(paired) = candidates.iter().find(|c| c.suffix == model_suffix) {
        return Some((paired, true));
    }
    select_newest(candidates).map(|c| (c, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"{}").unwrap();
        path
    }

    fn candidate(name: &str, suffix: &str, secs: u64) -> Candidate {
        Candidate {
            path: PathBuf::from(name),
            suffix: suffix.to_string(),
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_find_filters_prefix_and_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "best_model_a.onnx");
        touch(dir.path(), "best_model_b.json");
        touch(dir.path(), "best_model_c.pkl");
        touch(dir.path(), "model_metadata_a.json");
        touch(dir.path(), "notes.txt");
        fs::create_dir(dir.path().join("best_model_dir.onnx")).unwrap();

        let mut found = find_candidates(dir.path(), MODEL_PREFIX, &["onnx", "json"]).unwrap();
        found.sort_by(|a, b| a.suffix.cmp(&b.suffix));

        let suffixes: Vec<_> = found.iter().map(|c| c.suffix.as_str()).collect();
        assert_eq!(suffixes, vec!["a", "b"]);
    }

    #[test]
    fn test_find_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        assert!(find_candidates(&dir.path().join("absent"), MODEL_PREFIX, &["onnx"]).is_err());
    }

    #[test]
    fn test_newest_wins() {
        let candidates = vec![
            candidate("best_model_z.onnx", "z", 100),
            candidate("best_model_a.onnx", "a", 200),
        ];
        assert_eq!(select_newest(&candidates).unwrap().suffix, "a");
    }

    #[test]
    fn test_tie_broken_by_name() {
        let candidates = vec![
            candidate("best_model_20240101.onnx", "20240101", 100),
            candidate("best_model_20240301.onnx", "20240301", 100),
            candidate("best_model_20240201.onnx", "20240201", 100),
        ];
        assert_eq!(select_newest(&candidates).unwrap().suffix, "20240301");
        assert!(select_newest(&[]).is_none());
    }

    #[test]
    fn test_metadata_pairs_with_model_suffix() {
        let candidates = vec![
            candidate("model_metadata_old.json", "old", 100),
            candidate("model_metadata_new.json", "new", 300),
        ];
        let (chosen, paired) = select_metadata(&candidates, "old").unwrap();
        assert_eq!(chosen.suffix, "old");
        assert!(paired);

        let (chosen, paired) = select_metadata(&candidates, "other").unwrap();
        assert_eq!(chosen.suffix, "new");
        assert!(!paired);
    }
}
