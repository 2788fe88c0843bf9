//! HTTP API for predictions, model info, health checks and Prometheus metrics

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    observability::StructuredLogger,
    PredictionResult, PredictorError, RawAttributes, ServiceHandle,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seconds a client should wait before retrying a 503
const RETRY_AFTER_SECS: &str = "30";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: ServiceHandle,
    pub health_registry: HealthRegistry,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        service: ServiceHandle,
        health_registry: HealthRegistry,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            service,
            health_registry,
            logger,
        }
    }
}

/// Error body in the shape `{"detail": "..."}`
pub struct ApiError(PredictorError);

impl From<PredictorError> for ApiError {
    fn from(err: PredictorError) -> Self {
        ApiError(err)
    }
}

/// Malformed or incomplete bodies are validation failures too
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(PredictorError::Validation(rejection.body_text()))
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            PredictorError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PredictorError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PredictorError::ModelUnavailable
            | PredictorError::ServiceUnavailable(_)
            | PredictorError::ArtifactNotFound(_)
            | PredictorError::ArtifactCorrupt(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "detail": self.0.to_string() }));

        if self.0.is_retryable() || status == StatusCode::SERVICE_UNAVAILABLE {
            (status, [(header::RETRY_AFTER, RETRY_AFTER_SECS)], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

#[derive(Serialize)]
struct ExampleResponse {
    example_input: RawAttributes,
    prediction: PredictionResult,
}

/// Service banner with the endpoint map
async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = if state.service.is_loaded() {
        "active"
    } else {
        "error"
    };
    Json(json!({
        "message": "House Price Predictor API",
        "version": SERVICE_VERSION,
        "status": status,
        "endpoints": {
            "predict": "/predict",
            "example": "/predict/example",
            "health": "/health",
            "ready": "/readyz",
            "model_info": "/model/info",
            "metrics": "/metrics",
        },
    }))
}

/// Health check - 200 when a model is loaded, 503 otherwise
async fn health(State(state): State<Arc<AppState>>) -> Response {
    let components = state.health_registry.health().await;

    match state.service.health_status() {
        Ok(status) => {
            let code = match components.status {
                ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
                ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
            };
            let body = json!({
                "status": status.status,
                "model_loaded": status.model_loaded,
                "timestamp": status.timestamp,
                "predictions_total": status.predictions_total,
                "prediction_errors_total": status.prediction_errors_total,
                "components": components.components,
            });
            (code, Json(body)).into_response()
        }
        Err(err) => ApiError(err).into_response(),
    }
}

/// Readiness check - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawAttributes>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(raw) = payload?;
    raw.validate()?;
    run_prediction(&state, &raw).await.map(Json)
}

async fn model_info(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.model_info()?))
}

/// Prediction for the reference house
async fn predict_example(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExampleResponse>, ApiError> {
    let example_input = RawAttributes::reference();
    let prediction = run_prediction(&state, &example_input).await?;
    Ok(Json(ExampleResponse {
        example_input,
        prediction,
    }))
}

/// Run the pipeline and keep the inference component status current
async fn run_prediction(state: &AppState, raw: &RawAttributes) -> Result<PredictionResult, ApiError> {
    match state.service.predict(raw) {
        Ok(result) => {
            state.health_registry.recover(components::INFERENCE).await;
            state
                .logger
                .log_prediction(raw.area, raw.bedrooms, result.price, result.confidence.as_str());
            Ok(result)
        }
        Err(err) => {
            if let PredictorError::Prediction(detail) = &err {
                error!(error = %detail, area = raw.area, "Prediction error");
                state
                    .health_registry
                    .set_degraded(components::INFERENCE, detail.clone())
                    .await;
            }
            state
                .logger
                .log_prediction_failed(raw.area, raw.bedrooms, &err.to_string());
            Err(err.into())
        }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/predict", post(predict))
        .route("/predict/example", get(predict_example))
        .route("/model/info", get(model_info))
        .with_state(state)
}

/// Start the API server
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
