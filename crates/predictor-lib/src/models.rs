//! Core data models for the prediction service

use crate::error::{PredictorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw feature names in the order the attributes are declared
pub const RAW_FEATURE_NAMES: [&str; 12] = [
    "area",
    "bedrooms",
    "bathrooms",
    "stories",
    "mainroad",
    "guestroom",
    "basement",
    "hotwaterheating",
    "airconditioning",
    "parking",
    "prefarea",
    "furnishingstatus",
];

/// Engineered feature names, in the order the training notebook created them
pub const ENGINEERED_FEATURE_NAMES: [&str; 11] = [
    "rooms_total",
    "area_per_room",
    "bathroom_bedroom_ratio",
    "luxury_score",
    "has_luxury",
    "area_bedrooms_interaction",
    "luxury_area_interaction",
    "size_category_small",
    "size_category_medium",
    "size_category_very_large",
    "price_per_sqft",
];

/// Attributes describing a single property, as supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawAttributes {
    /// Living area in square feet
    pub area: f64,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub stories: u8,
    pub mainroad: u8,
    pub guestroom: u8,
    pub basement: u8,
    pub hotwaterheating: u8,
    pub airconditioning: u8,
    pub parking: u8,
    pub prefarea: u8,
    /// 0 = unfurnished, 1 = semi-furnished, 2 = furnished
    pub furnishingstatus: u8,
}

impl RawAttributes {
    /// Check the bounds the HTTP layer guarantees before calling the pipeline
    pub fn validate(&self) -> Result<()> {
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(PredictorError::Validation(
                "area must be a positive number".to_string(),
            ));
        }
        if !(1000.0..=20000.0).contains(&self.area) {
            return Err(PredictorError::Validation(
                "area must be between 1,000 and 20,000 sq ft".to_string(),
            ));
        }

        check_range("bedrooms", self.bedrooms, 1, 10)?;
        check_range("bathrooms", self.bathrooms, 1, 10)?;
        check_range("stories", self.stories, 1, 5)?;
        check_range("parking", self.parking, 0, 5)?;
        check_range("furnishingstatus", self.furnishingstatus, 0, 2)?;

        for (name, value) in [
            ("mainroad", self.mainroad),
            ("guestroom", self.guestroom),
            ("basement", self.basement),
            ("hotwaterheating", self.hotwaterheating),
            ("airconditioning", self.airconditioning),
            ("prefarea", self.prefarea),
        ] {
            check_range(name, value, 0, 1)?;
        }

        Ok(())
    }

    /// Look up a raw attribute by its wire name
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "area" => self.area,
            "bedrooms" => self.bedrooms as f64,
            "bathrooms" => self.bathrooms as f64,
            "stories" => self.stories as f64,
            "mainroad" => self.mainroad as f64,
            "guestroom" => self.guestroom as f64,
            "basement" => self.basement as f64,
            "hotwaterheating" => self.hotwaterheating as f64,
            "airconditioning" => self.airconditioning as f64,
            "parking" => self.parking as f64,
            "prefarea" => self.prefarea as f64,
            "furnishingstatus" => self.furnishingstatus as f64,
            _ => return None,
        };
        Some(value)
    }

    /// The reference house used by the example endpoint
    pub fn reference() -> Self {
        Self {
            area: 7420.0,
            bedrooms: 4,
            bathrooms: 1,
            stories: 3,
            mainroad: 1,
            guestroom: 0,
            basement: 0,
            hotwaterheating: 0,
            airconditioning: 1,
            parking: 2,
            prefarea: 1,
            furnishingstatus: 1,
        }
    }
}

fn check_range(name: &str, value: u8, min: u8, max: u8) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PredictorError::Validation(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )))
    }
}

/// Area bucket used during training; `Large` is the one-hot baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    VeryLarge,
}

impl SizeCategory {
    pub fn from_area(area: f64) -> Self {
        if area <= 3000.0 {
            SizeCategory::Small
        } else if area <= 6000.0 {
            SizeCategory::Medium
        } else if area <= 10000.0 {
            SizeCategory::Large
        } else {
            SizeCategory::VeryLarge
        }
    }
}

/// Full feature set rebuilt from raw attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineeredFeatures {
    pub raw: RawAttributes,
    pub rooms_total: f64,
    pub area_per_room: f64,
    pub bathroom_bedroom_ratio: f64,
    pub luxury_score: f64,
    pub has_luxury: f64,
    pub area_bedrooms_interaction: f64,
    pub luxury_area_interaction: f64,
    pub size_category: SizeCategory,
    pub size_category_small: f64,
    pub size_category_medium: f64,
    pub size_category_very_large: f64,
}

impl EngineeredFeatures {
    /// Resolve a raw or engineered feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "rooms_total" => self.rooms_total,
            "area_per_room" => self.area_per_room,
            "bathroom_bedroom_ratio" => self.bathroom_bedroom_ratio,
            "luxury_score" => self.luxury_score,
            "has_luxury" => self.has_luxury,
            "area_bedrooms_interaction" => self.area_bedrooms_interaction,
            "luxury_area_interaction" => self.luxury_area_interaction,
            "size_category_small" => self.size_category_small,
            "size_category_medium" => self.size_category_medium,
            "size_category_very_large" => self.size_category_very_large,
            // Zero placeholder column present in the training frame
            "price_per_sqft" => 0.0,
            other => return self.raw.get(other),
        };
        Some(value)
    }
}

/// Qualitative confidence attached to a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::High => "High",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single price prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub price: f64,
    pub formatted_price: String,
    pub price_per_sqft: f64,
    pub confidence: ConfidenceLevel,
    pub features_used: RawAttributes,
    pub prediction_time: DateTime<Utc>,
}

/// Description of the loaded model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub performance_metrics: Option<serde_json::Value>,
    pub feature_names: Vec<String>,
    pub training_date: String,
    pub model_version: String,
    pub artifact_file: String,
    pub artifact_checksum: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_house_is_valid() {
        assert!(RawAttributes::reference().validate().is_ok());
    }

    #[test]
    fn test_area_bounds() {
        let mut attrs = RawAttributes::reference();
        attrs.area = 999.0;
        assert!(matches!(attrs.validate(), Err(PredictorError::Validation(_))));
        attrs.area = 20000.5;
        assert!(attrs.validate().is_err());
        attrs.area = 0.0;
        assert!(attrs.validate().is_err());
        attrs.area = f64::NAN;
        assert!(attrs.validate().is_err());
        attrs.area = 1000.0;
        assert!(attrs.validate().is_ok());
        attrs.area = 20000.0;
        assert!(attrs.validate().is_ok());
    }

    #[test]
    fn test_validation_names_offending_field() {
        let mut attrs = RawAttributes::reference();
        attrs.bedrooms = 0;
        let err = attrs.validate().unwrap_err();
        assert!(err.to_string().contains("bedrooms"));

        let mut attrs = RawAttributes::reference();
        attrs.basement = 2;
        let err = attrs.validate().unwrap_err();
        assert!(err.to_string().contains("basement"));

        let mut attrs = RawAttributes::reference();
        attrs.furnishingstatus = 3;
        assert!(attrs.validate().is_err());

        let mut attrs = RawAttributes::reference();
        attrs.parking = 6;
        assert!(attrs.validate().is_err());
    }

    #[test]
    fn test_raw_lookup_covers_every_name() {
        let attrs = RawAttributes::reference();
        for name in RAW_FEATURE_NAMES {
            assert!(attrs.get(name).is_some(), "missing raw feature {}", name);
        }
        assert_eq!(attrs.get("area"), Some(7420.0));
        assert_eq!(attrs.get("parking"), Some(2.0));
        assert_eq!(attrs.get("lot_size"), None);
    }

    #[test]
    fn test_size_category_thresholds() {
        assert_eq!(SizeCategory::from_area(1500.0), SizeCategory::Small);
        assert_eq!(SizeCategory::from_area(3000.0), SizeCategory::Small);
        assert_eq!(SizeCategory::from_area(3000.1), SizeCategory::Medium);
        assert_eq!(SizeCategory::from_area(6000.0), SizeCategory::Medium);
        assert_eq!(SizeCategory::from_area(7420.0), SizeCategory::Large);
        assert_eq!(SizeCategory::from_area(10000.0), SizeCategory::Large);
        assert_eq!(SizeCategory::from_area(10000.5), SizeCategory::VeryLarge);
    }

    #[test]
    fn test_raw_attributes_wire_format() {
        let json = r#"{"area":7420,"bedrooms":4,"bathrooms":1,"stories":3,"mainroad":1,
            "guestroom":0,"basement":0,"hotwaterheating":0,"airconditioning":1,
            "parking":2,"prefarea":1,"furnishingstatus":1}"#;
        let attrs: RawAttributes = serde_json::from_str(json).unwrap();
        assert_eq!(attrs, RawAttributes::reference());
    }

    #[test]
    fn test_confidence_serializes_as_label() {
        let json = serde_json::to_string(&ConfidenceLevel::High).unwrap();
        assert_eq!(json, "\"High\"");
        assert_eq!(ConfidenceLevel::Low.to_string(), "Low");
    }
}
