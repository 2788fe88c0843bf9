//! HTTP transport for the house price predictor

pub mod api;
pub mod config;
