//! Core data models for the price prediction service

use serde::{Deserialize, Serialize};

/// Currency every estimate is reported in
pub const CURRENCY: &str = "USD";

/// Greeting returned by the status endpoint
pub const WELCOME_MESSAGE: &str = "Welcome to CarMarket Pro AI Pricing Engine";

/// Car attributes submitted for a price estimate
///
/// Every field is required. Values are only checked for shape and
/// primitive type; ranges are not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarFeatures {
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub engine_size: f64,
    pub fuel_type: String,
    pub transmission: String,
    pub mileage: i64,
    pub car_type: String,
    pub drive_type: String,
}

/// Price estimate returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub estimated_price_usd: f64,
    pub currency: String,
    pub formatted_price: String,
}

/// Static status record for the root endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub message: String,
    pub status: String,
    pub currency: String,
}

impl ServiceStatus {
    pub fn online() -> Self {
        Self {
            message: WELCOME_MESSAGE.to_string(),
            status: "Online".to_string(),
            currency: CURRENCY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_features_rejects_missing_field() {
        let body = r#"{"brand":"Toyota","model":"Corolla","year":2018,"engine_size":1.8,
            "fuel_type":"Petrol","transmission":"Automatic","mileage":45000,"car_type":"Sedan"}"#;
        let err = serde_json::from_str::<CarFeatures>(body).unwrap_err();
        assert!(err.to_string().contains("drive_type"));
    }

    #[test]
    fn test_car_features_rejects_wrong_type() {
        let body = r#"{"brand":"Toyota","model":"Corolla","year":"2018","engine_size":1.8,
            "fuel_type":"Petrol","transmission":"Automatic","mileage":45000,"car_type":"Sedan",
            "drive_type":"FWD"}"#;
        assert!(serde_json::from_str::<CarFeatures>(body).is_err());
    }

    #[test]
    fn test_car_features_accepts_out_of_range_values() {
        let body = r#"{"brand":"Toyota","model":"Corolla","year":-5,"engine_size":0,
            "fuel_type":"Petrol","transmission":"Automatic","mileage":-1,"car_type":"Sedan",
            "drive_type":"FWD"}"#;
        let car: CarFeatures = serde_json::from_str(body).unwrap();
        assert_eq!(car.year, -5);
        assert_eq!(car.engine_size, 0.0);
    }

    #[test]
    fn test_service_status_online() {
        let status = ServiceStatus::online();
        assert_eq!(status.status, "Online");
        assert_eq!(status.currency, "USD");
    }
}
