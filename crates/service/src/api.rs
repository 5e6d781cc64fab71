//! HTTP API: price prediction, status, health checks and Prometheus metrics

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pricing_lib::{
    health::HealthRegistry, CarFeatures, PredictionResult, PricePredictor, PricingError,
    PricingMetrics, ServiceStatus,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Shared application state
pub struct AppState {
    pub predictor: PricePredictor,
    pub health_registry: HealthRegistry,
    pub metrics: PricingMetrics,
}

impl AppState {
    pub fn new(
        predictor: PricePredictor,
        health_registry: HealthRegistry,
        metrics: PricingMetrics,
    ) -> Self {
        Self {
            predictor,
            health_registry,
            metrics,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors returned by the handlers
#[derive(Debug)]
pub enum ApiError {
    /// Body did not match the request schema
    Validation(JsonRejection),
    /// Any failure after validation; the body stays opaque
    Internal(PricingError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(rejection) => (
                rejection.status(),
                Json(ErrorBody {
                    error: rejection.body_text(),
                }),
            )
                .into_response(),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Internal Server Error".to_string(),
                }),
            )
                .into_response(),
        }
    }
}

async fn home() -> Json<ServiceStatus> {
    Json(ServiceStatus::online())
}

async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CarFeatures>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(car) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected prediction request");
        state.metrics.inc_prediction_errors("validation");
        ApiError::Validation(rejection)
    })?;

    let start = Instant::now();
    let result = state.predictor.predict(&car);
    state
        .metrics
        .observe_prediction_latency(start.elapsed().as_secs_f64());

    match result {
        Ok(prediction) => {
            state.metrics.inc_predictions();
            debug!(
                brand = %car.brand,
                model = %car.model,
                estimated_price_usd = prediction.estimated_price_usd,
                "Prediction served"
            );
            Ok(Json(prediction))
        }
        Err(err) => {
            state.metrics.inc_prediction_errors(err.kind());
            match &err {
                PricingError::UnknownCategory { field, value } => {
                    warn!(field = %field, value = %value, "Category unknown to encoder")
                }
                other => error!(error = %other, kind = other.kind(), "Prediction failed"),
            }
            Err(ApiError::Internal(err))
        }
    }
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = if health.status.is_operational() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
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
        [("content-type", encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves
pub async fn serve(
    addr: &str,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Starting API server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
