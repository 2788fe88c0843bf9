//! Price Server - house price prediction service
//!
//! Loads the trained model once at start-up, then serves predictions,
//! model info, health and metrics over HTTP.

use anyhow::Result;
use predictor_lib::{
    health::{components, HealthRegistry},
    observability::StructuredLogger,
    ServiceHandle,
};
use price_server::{
    api,
    config::{LogFormat, ServerConfig},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load()?;
    init_tracing(config.log_format);

    let logger = StructuredLogger::new("price-server");
    let model_dir = config.model_dir.display().to_string();
    logger.log_startup(SERVICE_VERSION, &model_dir);

    let health_registry = HealthRegistry::new();
    health_registry.register(components::ARTIFACT).await;
    health_registry.register(components::INFERENCE).await;

    // Load before binding so no request sees a half-initialized service
    let artifact_config = config.artifact_config();
    let service = match tokio::task::spawn_blocking(move || ServiceHandle::initialize(&artifact_config)).await? {
        Ok(service) => {
            let info = service.model_info()?;
            logger.log_model_loaded(
                &info.artifact_file,
                &info.model_type,
                &info.model_version,
                info.feature_names.len(),
                &info.artifact_checksum,
            );
            health_registry.set_ready(true).await;
            service
        }
        Err(e) => {
            logger.log_model_load_failed(&model_dir, &e.to_string());
            health_registry
                .set_unhealthy(components::ARTIFACT, e.to_string())
                .await;
            ServiceHandle::unavailable()
        }
    };

    let app_state = Arc::new(api::AppState::new(
        service,
        health_registry,
        logger.clone(),
    ));

    api::serve(&config.bind_addr(), app_state).await?;

    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
