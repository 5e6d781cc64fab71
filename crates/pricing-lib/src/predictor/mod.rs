//! Price prediction pipeline

mod features;
mod inference;
mod output;

pub use features::{column_index, EncodedRow, FeatureRow, FeatureValue, COLUMNS, NUM_FEATURES};
pub use inference::OnnxRegressor;
pub use output::{format_usd, round_cents, to_usd, PriceFormatter, PKR_PER_USD};

use crate::encoder::EncoderSet;
use crate::error::Result;
use crate::models::{CarFeatures, PredictionResult};

/// Trait for regression model implementations
pub trait Regressor: Send + Sync {
    /// Predict a raw price from one encoded row
    fn predict(&self, row: &EncodedRow) -> Result<f64>;
}

/// Encodes a request, runs the model and formats the estimate
///
/// Holds only read-only state, so one instance serves every request.
pub struct PricePredictor {
    encoders: EncoderSet,
    regressor: Box<dyn Regressor>,
    formatter: PriceFormatter,
}

impl PricePredictor {
    pub fn new(encoders: EncoderSet, regressor: Box<dyn Regressor>) -> Self {
        Self {
            encoders,
            regressor,
            formatter: PriceFormatter::new(),
        }
    }

    /// Encode the request into a numeric row
    pub fn encode(&self, car: &CarFeatures) -> Result<EncodedRow> {
        FeatureRow::from_features(car).encode(&self.encoders)
    }

    /// Model output before currency conversion
    pub fn raw_prediction(&self, car: &CarFeatures) -> Result<f64> {
        let row = self.encode(car)?;
        self.regressor.predict(&row)
    }

    pub fn predict(&self, car: &CarFeatures) -> Result<PredictionResult> {
        let raw = self.raw_prediction(car)?;
        self.formatter.format(raw)
    }
}
