//! Rule-based confidence label for a predicted price
//!
//! This is a sanity check on the inputs and the implied price per square
//! foot, not a statistical interval. Rules are evaluated in order and the
//! first match wins.

use crate::models::{ConfidenceLevel, RawAttributes};

/// Price per square foot range considered plausible
pub const PLAUSIBLE_PRICE_PER_SQFT: std::ops::RangeInclusive<f64> = 50.0..=200.0;

pub fn confidence(raw: &RawAttributes, price: f64) -> ConfidenceLevel {
    let area = raw.area;
    let bedrooms = raw.bedrooms;

    if area < 2000.0 && bedrooms > 4 {
        // Too many bedrooms for the floor space
        ConfidenceLevel::Low
    } else if area > 10000.0 && bedrooms < 3 {
        ConfidenceLevel::Medium
    } else if PLAUSIBLE_PRICE_PER_SQFT.contains(&(price / area)) {
        ConfidenceLevel::High
    } else {
        ConfidenceLevel::Medium
    }
}
