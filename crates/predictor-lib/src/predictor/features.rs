//! Feature engineering for price inference
//!
//! Rebuilds the derived features the model was trained on from raw
//! property attributes: room ratios, a luxury score, interaction terms
//! and one-hot size buckets. Formulas must stay identical to training.

use crate::models::{EngineeredFeatures, RawAttributes, SizeCategory};

/// Luxury score above which a property counts as having luxury amenities
pub const LUXURY_THRESHOLD: f64 = 2.0;

/// Derives the engineered feature set from raw attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEngineer;

impl FeatureEngineer {
    pub fn new() -> Self {
        Self
    }

    /// Bedrooms must be at least 1; the HTTP layer guarantees it.
    pub fn derive(&self, raw: &RawAttributes) -> EngineeredFeatures {
        let area = raw.area;
        let bedrooms = raw.bedrooms as f64;
        let bathrooms = raw.bathrooms as f64;

        let rooms_total = bedrooms + bathrooms;
        let luxury_score = luxury_score(raw);
        let size_category = SizeCategory::from_area(area);

        EngineeredFeatures {
            raw: *raw,
            rooms_total,
            area_per_room: area / rooms_total,
            bathroom_bedroom_ratio: bathrooms / bedrooms,
            luxury_score,
            has_luxury: indicator(luxury_score > LUXURY_THRESHOLD),
            area_bedrooms_interaction: area * bedrooms,
            luxury_area_interaction: luxury_score * area,
            size_category,
            size_category_small: indicator(size_category == SizeCategory::Small),
            size_category_medium: indicator(size_category == SizeCategory::Medium),
            size_category_very_large: indicator(size_category == SizeCategory::VeryLarge),
        }
    }
}

/// Summed left to right, as the training frame did
fn luxury_score(raw: &RawAttributes) -> f64 {
    raw.airconditioning as f64
        + raw.parking as f64 / 2.0
        + raw.prefarea as f64
        + raw.guestroom as f64
        + raw.basement as f64
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
