//! Prediction output formatting and post-processing
//!
//! Turns the raw model output into a PredictionResult with the derived
//! price per square foot, the confidence label and a display string.

use super::confidence::confidence;
use crate::models::{PredictionResult, RawAttributes};
use chrono::Utc;

/// Formats raw model outputs into a PredictionResult
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFormatter;

impl OutputFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Build the result for `price`, using the caller's area rather than an engineered copy
    pub fn format(&self, raw: &RawAttributes, price: f64) -> PredictionResult {
        PredictionResult {
            price,
            formatted_price: format_price(price),
            price_per_sqft: price / raw.area,
            confidence: confidence(raw, price),
            features_used: *raw,
            prediction_time: Utc::now(),
        }
    }
}

/// Format a price as whole dollars with thousands separators, e.g. `$1,234,567`
pub fn format_price(price: f64) -> String {
    let rounded = format!("{:.0}", price);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}{}", sign, grouped)
}
