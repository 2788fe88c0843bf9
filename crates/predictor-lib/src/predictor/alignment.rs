//! Alignment of engineered features to the model's declared input order

use crate::models::EngineeredFeatures;
use tracing::warn;

/// Value used for a declared feature that cannot be resolved
pub const MISSING_FEATURE_DEFAULT: f64 = 0.0;

/// Feature values in declared order, plus the names that had to be defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFeatures {
    pub values: Vec<f64>,
    pub missing: Vec<String>,
}

impl AlignedFeatures {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Maps engineered features onto an ordered list of feature names
#[derive(Debug, Clone)]
pub struct FeatureAligner {
    declared_order: Vec<String>,
}

impl FeatureAligner {
    pub fn new(declared_order: Vec<String>) -> Self {
        Self { declared_order }
    }

    pub fn declared_order(&self) -> &[String] {
        &self.declared_order
    }

    /// Never fails; unknown names are defaulted and reported.
    pub fn align(&self, features: &EngineeredFeatures) -> AlignedFeatures {
        let mut values = Vec::with_capacity(self.declared_order.len());
        let mut missing = Vec::new();

        for name in &self.declared_order {
            match features.get(name) {
                Some(value) => values.push(value),
                None => {
                    warn!(feature = %name, "Missing feature, substituting default");
                    values.push(MISSING_FEATURE_DEFAULT);
                    missing.push(name.clone());
                }
            }
        }

        AlignedFeatures { values, missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawAttributes;
    use crate::predictor::FeatureEngineer;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn reference_features() -> EngineeredFeatures {
        FeatureEngineer::new().derive(&RawAttributes::reference())
    }

    #[test]
    fn test_follows_declared_order() {
        let aligner = FeatureAligner::new(names(&["luxury_score", "area", "bedrooms", "has_luxury"]));
        let aligned = aligner.align(&reference_features());

        assert_eq!(aligned.values, vec![3.0, 7420.0, 4.0, 1.0]);
        assert!(aligned.missing.is_empty());
    }

    #[test]
    fn test_missing_feature_defaults_to_zero() {
        let aligner = FeatureAligner::new(names(&["area", "garden_size", "stories"]));
        let aligned = aligner.align(&reference_features());

        assert_eq!(aligned.values, vec![7420.0, 0.0, 3.0]);
        assert_eq!(aligned.missing, vec!["garden_size".to_string()]);
    }

    #[test]
    fn test_large_bucket_has_no_column() {
        let aligner = FeatureAligner::new(names(&["size_category_large"]));
        let aligned = aligner.align(&reference_features());
        assert_eq!(aligned.values, vec![0.0]);
        assert_eq!(aligned.missing.len(), 1);
    }

    #[test]
    fn test_length_matches_declared_order() {
        let pool = [
            "area",
            "unknown_a",
            "rooms_total",
            "size_category_small",
            "unknown_b",
            "price_per_sqft",
            "parking",
        ];
        let features = reference_features();
        for take in 0..=pool.len() {
            let aligner = FeatureAligner::new(names(&pool[..take]));
            let aligned = aligner.align(&features);
            assert_eq!(aligned.len(), take);
        }
    }

    #[test]
    fn test_empty_declared_order() {
        let aligned = FeatureAligner::new(Vec::new()).align(&reference_features());
        assert!(aligned.is_empty());
        assert!(aligned.missing.is_empty());
    }
}
