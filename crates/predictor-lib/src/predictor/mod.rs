//! Price prediction pipeline

mod alignment;
mod confidence;
mod features;
mod output;
mod pipeline;

pub use alignment::{AlignedFeatures, FeatureAligner, MISSING_FEATURE_DEFAULT};
pub use confidence::{confidence, PLAUSIBLE_PRICE_PER_SQFT};
pub use features::{FeatureEngineer, LUXURY_THRESHOLD};
pub use output::{format_price, OutputFormatter};
pub use pipeline::PricePredictor;
