//! Loading of the model and encoder artifacts
//!
//! Artifacts live in a `models` directory next to the service executable,
//! so startup does not depend on the working directory. They are read
//! once; any failure here is fatal for the service.

use crate::encoder::EncoderSet;
use crate::error::{PricingError, Result};
use crate::predictor::OnnxRegressor;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Subdirectory holding the artifacts
pub const ARTIFACT_SUBDIR: &str = "models";

/// Serialized regression model
pub const MODEL_FILE: &str = "car_price_model.onnx";

/// Serialized label encoders
pub const ENCODERS_FILE: &str = "label_encoders.json";

/// Locations of the two artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub encoders: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::with_files(dir, MODEL_FILE, ENCODERS_FILE)
    }

    pub fn with_files(dir: impl AsRef<Path>, model_file: &str, encoders_file: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(model_file),
            encoders: dir.join(encoders_file),
        }
    }

    /// The `models` directory beside the running executable
    pub fn default_dir() -> Result<PathBuf> {
        let exe = std::env::current_exe().map_err(|source| PricingError::ArtifactIo {
            path: PathBuf::from("<current executable>"),
            source,
        })?;
        let exe = fs::canonicalize(&exe).unwrap_or(exe);
        let base = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(base.join(ARTIFACT_SUBDIR))
    }
}

/// Everything read from disk at startup
pub struct LoadedArtifacts {
    pub encoders: EncoderSet,
    pub regressor: OnnxRegressor,
    pub model_sha256: String,
    pub encoders_sha256: String,
}

impl std::fmt::Debug for LoadedArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedArtifacts")
            .field("encoders", &self.encoders)
            .field("model_sha256", &self.model_sha256)
            .field("encoders_sha256", &self.encoders_sha256)
            .finish_non_exhaustive()
    }
}

/// Read and deserialize both artifacts
pub fn load(paths: &ArtifactPaths) -> Result<LoadedArtifacts> {
    let model_bytes = read_artifact(&paths.model)?;
    let encoder_bytes = read_artifact(&paths.encoders)?;

    let model_sha256 = sha256_hex(&model_bytes);
    let encoders_sha256 = sha256_hex(&encoder_bytes);

    let encoders = EncoderSet::from_json_slice(&encoder_bytes)?;
    debug!(path = ?paths.encoders, "Label encoders parsed");

    let regressor = OnnxRegressor::from_bytes(&model_bytes)?;

    info!(
        model = ?paths.model,
        model_sha256 = %model_sha256,
        encoders = ?paths.encoders,
        encoders_sha256 = %encoders_sha256,
        "Artifacts loaded"
    );

    Ok(LoadedArtifacts {
        encoders,
        regressor,
        model_sha256,
        encoders_sha256,
    })
}

fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| PricingError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Hex-encoded SHA-256 of an artifact's bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CarFeatures;
    use crate::predictor::PricePredictor;
    use tempfile::tempdir;

    const ENCODERS: &str = r#"{
        "brand": ["Honda", "Toyota"],
        "model": ["Civic", "Corolla"],
        "fuel_type": ["Petrol"],
        "transmission": ["Automatic"],
        "car_type": ["Sedan"],
        "drive_type": ["FWD"]
    }"#;

    #[test]
    fn test_paths_in_dir() {
        let paths = ArtifactPaths::in_dir("/opt/pricing/models");
        assert_eq!(
            paths.model,
            PathBuf::from("/opt/pricing/models/car_price_model.onnx")
        );
        assert_eq!(
            paths.encoders,
            PathBuf::from("/opt/pricing/models/label_encoders.json")
        );
    }

    #[test]
    fn test_default_dir_is_beside_executable() {
        let dir = ArtifactPaths::default_dir().unwrap();
        assert!(dir.ends_with(ARTIFACT_SUBDIR));
        assert!(dir.is_absolute());
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(ENCODERS_FILE), ENCODERS).unwrap();

        let err = load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        assert!(err.is_startup_failure());
        assert!(matches!(err, PricingError::ArtifactIo { ref path, .. } if path.ends_with(MODEL_FILE)));
    }

    #[test]
    fn test_missing_encoders_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MODEL_FILE), b"model").unwrap();

        let err = load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, PricingError::ArtifactIo { ref path, .. } if path.ends_with(ENCODERS_FILE)));
    }

    #[test]
    fn test_corrupt_model_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MODEL_FILE), b"\x00\x01not-onnx").unwrap();
        fs::write(dir.path().join(ENCODERS_FILE), ENCODERS).unwrap();

        let err = load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, PricingError::ModelLoad(_)));
    }

    #[test]
    fn test_corrupt_encoders_are_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MODEL_FILE), b"model").unwrap();
        fs::write(dir.path().join(ENCODERS_FILE), b"[1, 2, 3]").unwrap();

        let err = load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, PricingError::ArtifactFormat { .. }));
    }

    #[test]
    fn test_load_and_predict_end_to_end() {
        let model = include_bytes!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/linear.onnx"
        ));
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MODEL_FILE), model).unwrap();
        fs::write(dir.path().join(ENCODERS_FILE), ENCODERS).unwrap();

        let loaded = load(&ArtifactPaths::in_dir(dir.path())).unwrap();
        assert_eq!(loaded.model_sha256, sha256_hex(model));
        assert_eq!(loaded.encoders_sha256, sha256_hex(ENCODERS.as_bytes()));

        let predictor = PricePredictor::new(loaded.encoders, Box::new(loaded.regressor));
        let car = CarFeatures {
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2018,
            engine_size: 1.8,
            fuel_type: "Petrol".to_string(),
            transmission: "Automatic".to_string(),
            mileage: 45000,
            car_type: "Sedan".to_string(),
            drive_type: "FWD".to_string(),
        };

        let result = predictor.predict(&car).unwrap();
        assert_eq!(result.estimated_price_usd, 3019.0);
        assert_eq!(result.formatted_price, "$3,019.00");
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
