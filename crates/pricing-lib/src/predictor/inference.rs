//! ONNX inference using tract
//!
//! The price model is exported to ONNX and run through tract-onnx. It
//! takes one `[1, 9]` f32 row and the first output value is the price.

use super::features::{EncodedRow, NUM_FEATURES};
use super::Regressor;
use crate::error::{PricingError, Result};
use anyhow::Context;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Maximum inference latency before warning
const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Regression model backed by a tract execution plan
///
/// The plan is immutable once built and shared across requests.
pub struct OnnxRegressor {
    model: TractModel,
}

impl OnnxRegressor {
    /// Load and optimize an ONNX model from bytes
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self> {
        let model = Self::load_model(model_bytes)
            .map_err(|e| PricingError::ModelLoad(format!("{:#}", e)))?;
        Ok(Self { model })
    }

    fn load_model(model_bytes: &[u8]) -> TractResult<TractModel> {
        tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")
    }

    fn row_to_tensor(row: &EncodedRow) -> TractResult<Tensor> {
        let data: Vec<f32> = row.values().iter().map(|v| *v as f32).collect();
        let array = tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), data)?;
        Ok(array.into())
    }

    fn run(&self, row: &EncodedRow) -> TractResult<f64> {
        let input = Self::row_to_tensor(row)?;
        let result = self.model.run(tvec!(input.into()))?;
        let output = result.first().context("No output from model")?;
        let widened = output.cast_to::<f64>()?;
        let view = widened.to_array_view::<f64>()?;
        let value = view.iter().next().copied().context("Model output is empty")?;
        Ok(value)
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, row: &EncodedRow) -> Result<f64> {
        let start = Instant::now();

        let value = self
            .run(row)
            .map_err(|e| PricingError::Inference(format!("{:#}", e)))?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Ok(value)
    }
}
