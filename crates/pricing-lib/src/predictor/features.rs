//! Single-row feature table built from a request
//!
//! The row keeps the request's column names and order. Categorical cells
//! start out as text and are replaced in place by their encoder codes.

use crate::encoder::{CategoricalField, EncoderSet};
use crate::error::{PricingError, Result};
use crate::models::CarFeatures;

/// Number of input features expected by the model
pub const NUM_FEATURES: usize = 9;

/// Column names, in the order the model was trained on
pub const COLUMNS: [&str; NUM_FEATURES] = [
    "brand",
    "model",
    "year",
    "engine_size",
    "fuel_type",
    "transmission",
    "mileage",
    "car_type",
    "drive_type",
];

/// Position of a column in the feature row
pub fn column_index(name: &str) -> Option<usize> {
    COLUMNS.iter().position(|column| *column == name)
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Category(String),
    Numeric(f64),
}

/// One row of features, cells addressed by column name
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    cells: Vec<FeatureValue>,
}

impl FeatureRow {
    pub fn from_features(car: &CarFeatures) -> Self {
        let cells = vec![
            FeatureValue::Category(car.brand.clone()),
            FeatureValue::Category(car.model.clone()),
            FeatureValue::Numeric(car.year as f64),
            FeatureValue::Numeric(car.engine_size),
            FeatureValue::Category(car.fuel_type.clone()),
            FeatureValue::Category(car.transmission.clone()),
            FeatureValue::Numeric(car.mileage as f64),
            FeatureValue::Category(car.car_type.clone()),
            FeatureValue::Category(car.drive_type.clone()),
        ];
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        column_index(column).map(|idx| &self.cells[idx])
    }

    /// Replace every categorical cell with its encoder code
    ///
    /// Walks the fixed list of categorical fields; numeric columns are
    /// left untouched. Stops at the first category the encoder does not
    /// know.
    pub fn encode(mut self, encoders: &EncoderSet) -> Result<EncodedRow> {
        for field in CategoricalField::ALL {
            let idx = column_index(field.name())
                .ok_or_else(|| PricingError::Inference(format!("no column named {}", field)))?;
            if let FeatureValue::Category(value) = &self.cells[idx] {
                let code = encoders.encode(field, value)?;
                self.cells[idx] = FeatureValue::Numeric(code as f64);
            }
        }
        self.into_encoded()
    }

    fn into_encoded(self) -> Result<EncodedRow> {
        let mut values = [0.0; NUM_FEATURES];
        for (idx, cell) in self.cells.into_iter().enumerate() {
            values[idx] = match cell {
                FeatureValue::Numeric(v) => v,
                FeatureValue::Category(value) => {
                    return Err(PricingError::Inference(format!(
                        "column {} still holds category '{}'",
                        COLUMNS[idx], value
                    )))
                }
            };
        }
        Ok(EncodedRow { values })
    }
}

/// Fully numeric row ready for inference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedRow {
    values: [f64; NUM_FEATURES],
}

impl EncodedRow {
    pub fn new(values: [f64; NUM_FEATURES]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64; NUM_FEATURES] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        column_index(column).map(|idx| self.values[idx])
    }
}
