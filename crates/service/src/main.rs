//! Car price service - ONNX-backed used car price estimates
//!
//! Loads the price model and label encoders once at startup and serves
//! predictions over HTTP until interrupted.

use anyhow::{Context, Result};
use car_price_service::{api, ServiceConfig};
use pricing_lib::{
    artifacts,
    health::{components, HealthRegistry},
    PricePredictor, PricingMetrics, StructuredLogger,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_NAME: &str = "car-price-service";
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting {}", SERVICE_NAME);

    let config = ServiceConfig::load().context("Failed to load configuration")?;
    let paths = config.artifact_paths()?;
    info!(model = ?paths.model, encoders = ?paths.encoders, "Service configured");

    // Without its artifacts the service has nothing to serve
    let loaded = artifacts::load(&paths).context("Failed to load model artifacts")?;

    let metrics = PricingMetrics::new();
    metrics.set_model_info(&loaded.model_sha256, &loaded.encoders_sha256);
    for (field, classes) in loaded.encoders.class_counts() {
        metrics.set_encoder_classes(field.name(), classes);
        info!(field = %field, classes, "Encoder loaded");
    }

    let health_registry = HealthRegistry::new(SERVICE_VERSION);
    health_registry
        .set_healthy(components::MODEL, Some(loaded.model_sha256.clone()))
        .await;
    health_registry
        .set_healthy(components::ENCODERS, Some(loaded.encoders_sha256.clone()))
        .await;

    let logger = StructuredLogger::new(SERVICE_NAME);
    let model_sha256 = loaded.model_sha256.clone();
    let predictor = PricePredictor::new(loaded.encoders, Box::new(loaded.regressor));
    let app_state = Arc::new(api::AppState::new(
        predictor,
        health_registry.clone(),
        metrics,
    ));

    health_registry.set_ready(true).await;

    let addr = config.bind_addr();
    logger.log_startup(SERVICE_VERSION, &model_sha256, &addr);

    let shutdown_logger = logger.clone();
    api::serve(&addr, app_state, async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => shutdown_logger.log_shutdown("SIGINT received"),
            Err(e) => {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await
            }
        }
    })
    .await?;

    info!("Shutting down");
    Ok(())
}
