//! Service configuration

use anyhow::Result;
use pricing_lib::artifacts::{ArtifactPaths, ENCODERS_FILE, MODEL_FILE};
use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration, read from `PRICING_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the prediction, health and metrics endpoints
    #[serde(default = "default_port")]
    pub port: u16,

    /// Artifact directory; defaults to `models` beside the executable
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    #[serde(default = "default_model_file")]
    pub model_file: String,

    #[serde(default = "default_encoders_file")]
    pub encoders_file: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model_file() -> String {
    MODEL_FILE.to_string()
}

fn default_encoders_file() -> String {
    ENCODERS_FILE.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_dir: None,
            model_file: default_model_file(),
            encoders_file: default_encoders_file(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix("PRICING").try_parsing(true))
    }

    fn from_source(source: config::Environment) -> Result<Self> {
        let config = config::Config::builder().add_source(source).build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve where the artifacts are read from
    pub fn artifact_paths(&self) -> Result<ArtifactPaths> {
        let dir = match &self.model_dir {
            Some(dir) => dir.clone(),
            None => ArtifactPaths::default_dir()?,
        };
        Ok(ArtifactPaths::with_files(
            dir,
            &self.model_file,
            &self.encoders_file,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("PRICING")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_source(env(&[])).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert!(config.model_dir.is_none());
        assert_eq!(config.model_file, "car_price_model.onnx");
        assert_eq!(config.encoders_file, "label_encoders.json");
    }

    #[test]
    fn test_environment_overrides() {
        let config = ServiceConfig::from_source(env(&[
            ("PRICING_PORT", "9100"),
            ("PRICING_MODEL_DIR", "/srv/models"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9100);

        let paths = config.artifact_paths().unwrap();
        assert_eq!(paths.model, PathBuf::from("/srv/models/car_price_model.onnx"));
        assert_eq!(paths.encoders, PathBuf::from("/srv/models/label_encoders.json"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(ServiceConfig::from_source(env(&[("PRICING_PORT", "not-a-port")])).is_err());
    }

    #[test]
    fn test_default_artifact_dir_is_models() {
        let paths = ServiceConfig::default().artifact_paths().unwrap();
        assert!(paths.model.parent().unwrap().ends_with("models"));
    }
}
