//! Label encoders for the categorical car attributes
//!
//! Encoders are fitted at training time and shipped as a JSON object
//! mapping each field name to its ordered class list. A category's code
//! is its position in that list.

use crate::error::{PricingError, Result};
use crate::models::CarFeatures;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Categorical columns of the feature row, each of which needs an encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Brand,
    Model,
    FuelType,
    Transmission,
    CarType,
    DriveType,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 6] = [
        CategoricalField::Brand,
        CategoricalField::Model,
        CategoricalField::FuelType,
        CategoricalField::Transmission,
        CategoricalField::CarType,
        CategoricalField::DriveType,
    ];

    /// Column name, identical to the request field name
    pub fn name(&self) -> &'static str {
        match self {
            CategoricalField::Brand => "brand",
            CategoricalField::Model => "model",
            CategoricalField::FuelType => "fuel_type",
            CategoricalField::Transmission => "transmission",
            CategoricalField::CarType => "car_type",
            CategoricalField::DriveType => "drive_type",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// The raw category submitted for this field
    pub fn value_of<'a>(&self, car: &'a CarFeatures) -> &'a str {
        match self {
            CategoricalField::Brand => &car.brand,
            CategoricalField::Model => &car.model,
            CategoricalField::FuelType => &car.fuel_type,
            CategoricalField::Transmission => &car.transmission,
            CategoricalField::CarType => &car.car_type,
            CategoricalField::DriveType => &car.drive_type,
        }
    }

    fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fitted label encoder for one field
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

impl LabelEncoder {
    /// Build an encoder from its fitted class list
    pub fn from_classes(field: &str, classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(PricingError::ArtifactFormat {
                artifact: "label encoders".to_string(),
                message: format!("encoder for '{}' has no classes", field),
            });
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code as i64).is_some() {
                return Err(PricingError::ArtifactFormat {
                    artifact: "label encoders".to_string(),
                    message: format!("encoder for '{}' lists class '{}' twice", field, class),
                });
            }
        }

        Ok(Self { classes, codes })
    }

    /// Integer code for a category, if it was seen during fitting
    pub fn transform(&self, value: &str) -> Option<i64> {
        self.codes.get(value).copied()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// One encoder per categorical field
#[derive(Debug, Clone)]
pub struct EncoderSet {
    // indexed by CategoricalField ordinal
    encoders: Vec<LabelEncoder>,
}

impl EncoderSet {
    /// Parse the encoder artifact
    ///
    /// Every categorical field must have an encoder and no other field may
    /// carry one.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> =
            serde_json::from_slice(bytes).map_err(|e| PricingError::ArtifactFormat {
                artifact: "label encoders".to_string(),
                message: e.to_string(),
            })?;
        Self::from_class_lists(raw)
    }

    pub fn from_class_lists(mut raw: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut encoders = Vec::with_capacity(CategoricalField::ALL.len());
        for field in CategoricalField::ALL {
            let classes = raw
                .remove(field.name())
                .ok_or_else(|| PricingError::MissingEncoder {
                    field: field.name().to_string(),
                })?;
            encoders.push(LabelEncoder::from_classes(field.name(), classes)?);
        }

        if let Some(field) = raw.into_keys().next() {
            return Err(PricingError::UnexpectedEncoder { field });
        }

        Ok(Self { encoders })
    }

    pub fn get(&self, field: CategoricalField) -> &LabelEncoder {
        &self.encoders[field.ordinal()]
    }

    /// Encode one value, failing loudly on categories the encoder never saw
    pub fn encode(&self, field: CategoricalField, value: &str) -> Result<i64> {
        self.get(field)
            .transform(value)
            .ok_or_else(|| PricingError::UnknownCategory {
                field: field.name().to_string(),
                value: value.to_string(),
            })
    }

    /// (field, class count) pairs, in column order
    pub fn class_counts(&self) -> impl Iterator<Item = (CategoricalField, usize)> + '_ {
        CategoricalField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field).len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample_json() -> String {
        serde_json::json!({
            "brand": ["Honda", "Suzuki", "Toyota"],
            "model": ["Civic", "Corolla", "Mehran"],
            "fuel_type": ["Diesel", "Hybrid", "Petrol"],
            "transmission": ["Automatic", "Manual"],
            "car_type": ["Hatchback", "SUV", "Sedan"],
            "drive_type": ["4WD", "FWD", "RWD"]
        })
        .to_string()
    }

    #[test]
    fn test_codes_follow_class_order() {
        let encoder =
            LabelEncoder::from_classes("brand", classes(&["Honda", "Suzuki", "Toyota"])).unwrap();
        assert_eq!(encoder.transform("Honda"), Some(0));
        assert_eq!(encoder.transform("Toyota"), Some(2));
        assert_eq!(encoder.transform("Tesla"), None);
        assert_eq!(encoder.len(), 3);
    }

    #[test]
    fn test_transform_is_case_sensitive() {
        let encoder = LabelEncoder::from_classes("brand", classes(&["Toyota"])).unwrap();
        assert_eq!(encoder.transform("toyota"), None);
    }

    #[test]
    fn test_empty_class_list_rejected() {
        let err = LabelEncoder::from_classes("brand", Vec::new()).unwrap_err();
        assert!(matches!(err, PricingError::ArtifactFormat { .. }));
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let err = LabelEncoder::from_classes("brand", classes(&["Honda", "Honda"])).unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn test_encoder_set_from_json() {
        let set = EncoderSet::from_json_slice(sample_json().as_bytes()).unwrap();
        assert_eq!(set.encode(CategoricalField::Model, "Corolla").unwrap(), 1);
        assert_eq!(set.encode(CategoricalField::DriveType, "FWD").unwrap(), 1);
        assert_eq!(set.get(CategoricalField::Transmission).len(), 2);
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let set = EncoderSet::from_json_slice(sample_json().as_bytes()).unwrap();
        let err = set.encode(CategoricalField::Brand, "Tesla").unwrap_err();
        match err {
            PricingError::UnknownCategory { field, value } => {
                assert_eq!(field, "brand");
                assert_eq!(value, "Tesla");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_encoder_rejected() {
        let mut raw: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&sample_json()).unwrap();
        raw.remove("car_type");
        let err = EncoderSet::from_class_lists(raw).unwrap_err();
        assert!(matches!(err, PricingError::MissingEncoder { ref field } if field == "car_type"));
    }

    #[test]
    fn test_encoder_for_numeric_column_rejected() {
        let mut raw: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&sample_json()).unwrap();
        raw.insert("year".to_string(), classes(&["2018"]));
        let err = EncoderSet::from_class_lists(raw).unwrap_err();
        assert!(matches!(err, PricingError::UnexpectedEncoder { ref field } if field == "year"));
    }

    #[test]
    fn test_corrupt_json_rejected() {
        let err = EncoderSet::from_json_slice(b"{not json").unwrap_err();
        assert!(err.is_startup_failure());
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in CategoricalField::ALL {
            assert_eq!(CategoricalField::from_name(field.name()), Some(field));
        }
        assert_eq!(CategoricalField::from_name("mileage"), None);
    }
}
