//! Library for the car price prediction service
//!
//! This crate provides the core functionality for:
//! - Loading the ONNX price model and label encoders
//! - Encoding requests and running inference
//! - Converting estimates to US dollars
//! - Health checks and observability

pub mod artifacts;
pub mod encoder;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use artifacts::{ArtifactPaths, LoadedArtifacts};
pub use encoder::{CategoricalField, EncoderSet, LabelEncoder};
pub use error::{PricingError, Result};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{PricingMetrics, StructuredLogger};
pub use predictor::{PricePredictor, Regressor};
