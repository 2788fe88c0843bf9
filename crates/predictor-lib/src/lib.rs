//! Prediction core for the house price service
//!
//! This crate provides the core functionality for:
//! - Loading a trained regression model and its training metadata
//! - Rebuilding the training-time feature set from raw property attributes
//! - Aligning features to the model's declared input order
//! - Model invocation and confidence scoring
//! - Health checks and observability

pub mod artifact;
pub mod error;
pub mod health;
pub mod model;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod service;

pub use error::{PredictorError, Result};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{PredictorMetrics, StructuredLogger};
pub use service::{HealthStatus, ServiceHandle};
