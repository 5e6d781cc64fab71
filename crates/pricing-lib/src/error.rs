//! Error types for artifact loading and the prediction pipeline

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PricingError>;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Failed to read artifact {path:?}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {artifact}: {message}")]
    ArtifactFormat { artifact: String, message: String },

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("No encoder registered for categorical field '{field}'")]
    MissingEncoder { field: String },

    #[error("Encoder registered for unknown field '{field}'")]
    UnexpectedEncoder { field: String },

    /// The value was never seen when the field's encoder was fitted.
    /// Surfaces to clients as an opaque server error.
    #[error("Unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PricingError {
    /// True for errors that can only happen while loading artifacts
    pub fn is_startup_failure(&self) -> bool {
        matches!(
            self,
            PricingError::ArtifactIo { .. }
                | PricingError::ArtifactFormat { .. }
                | PricingError::ModelLoad(_)
                | PricingError::MissingEncoder { .. }
                | PricingError::UnexpectedEncoder { .. }
        )
    }

    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::ArtifactIo { .. } => "artifact_io",
            PricingError::ArtifactFormat { .. } => "artifact_format",
            PricingError::ModelLoad(_) => "model_load",
            PricingError::MissingEncoder { .. } => "missing_encoder",
            PricingError::UnexpectedEncoder { .. } => "unexpected_encoder",
            PricingError::UnknownCategory { .. } => "unknown_category",
            PricingError::Inference(_) => "inference",
        }
    }
}
