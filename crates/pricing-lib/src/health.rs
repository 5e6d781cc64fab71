//! Health check infrastructure for the price service
//!
//! Tracks the state of the loaded artifacts and whether startup has
//! finished, for liveness and readiness probes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Unhealthy,
}

impl ComponentStatus {
    pub fn is_operational(&self) -> bool {
        matches!(self, ComponentStatus::Healthy)
    }
}

/// A component's health, with an optional human-readable detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub updated_at: i64,
}

impl ComponentHealth {
    fn with_status(status: ComponentStatus, detail: Option<String>) -> Self {
        Self {
            status,
            detail,
            updated_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn healthy(detail: Option<String>) -> Self {
        Self::with_status(ComponentStatus::Healthy, detail)
    }

    pub fn unhealthy(detail: impl Into<String>) -> Self {
        Self::with_status(ComponentStatus::Unhealthy, Some(detail.into()))
    }
}

/// Body of `/healthz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub version: String,
    pub components: BTreeMap<String, ComponentHealth>,
}

/// Unhealthy if any component is; healthy when there are none
pub fn overall_status<'a>(
    components: impl IntoIterator<Item = &'a ComponentHealth>,
) -> ComponentStatus {
    if components
        .into_iter()
        .any(|health| !health.status.is_operational())
    {
        ComponentStatus::Unhealthy
    } else {
        ComponentStatus::Healthy
    }
}

/// Body of `/readyz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Component names for health tracking
pub mod components {
    pub const MODEL: &str = "model";
    pub const ENCODERS: &str = "encoders";
}

/// Shared registry of component health
#[derive(Debug, Clone)]
pub struct HealthRegistry {
    version: String,
    components: Arc<RwLock<BTreeMap<String, ComponentHealth>>>,
    ready: Arc<RwLock<bool>>,
}

impl HealthRegistry {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            components: Arc::new(RwLock::new(BTreeMap::new())),
            ready: Arc::new(RwLock::new(false)),
        }
    }

    /// Record a component's health, replacing any previous entry
    pub async fn update(&self, name: &str, health: ComponentHealth) {
        self.components
            .write()
            .await
            .insert(name.to_string(), health);
    }

    pub async fn set_healthy(&self, name: &str, detail: Option<String>) {
        self.update(name, ComponentHealth::healthy(detail)).await;
    }

    pub async fn set_unhealthy(&self, name: &str, detail: impl Into<String>) {
        self.update(name, ComponentHealth::unhealthy(detail)).await;
    }

    pub async fn set_ready(&self, ready: bool) {
        *self.ready.write().await = ready;
    }

    pub async fn health(&self) -> HealthResponse {
        let components = self.components.read().await.clone();
        HealthResponse {
            status: overall_status(components.values()),
            version: self.version.clone(),
            components,
        }
    }

    /// Ready once startup completed and no component is unhealthy
    pub async fn readiness(&self) -> ReadinessResponse {
        if !*self.ready.read().await {
            return ReadinessResponse {
                ready: false,
                reason: Some("Artifacts not yet loaded".to_string()),
            };
        }

        let components = self.components.read().await;
        if let Some((name, _)) = components
            .iter()
            .find(|(_, health)| !health.status.is_operational())
        {
            return ReadinessResponse {
                ready: false,
                reason: Some(format!("Component {} unhealthy", name)),
            };
        }

        ReadinessResponse {
            ready: true,
            reason: None,
        }
    }
}
