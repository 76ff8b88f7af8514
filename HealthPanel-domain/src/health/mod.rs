//! Domain layer health check functionality
//! This module reports on the session store and the PDF engine

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::services::record::MedicalRecordServiceTrait;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Build from components; the worst component decides the overall status
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        Self { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Number of live sessions, or an error if the store cannot be read
    async fn check_session_store(&self) -> Result<usize, String>;
}

/// Health service reporting on a medical record service
pub struct HealthService {
    records: Arc<dyn MedicalRecordServiceTrait>,
}

impl HealthService {
    /// Create a new health service
    pub fn new(records: Arc<dyn MedicalRecordServiceTrait>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        let store = match self.check_session_store().await {
            Ok(count) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(format!("{} active session(s)", count)),
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            },
        };
        components.insert("session_store".to_string(), store);

        components.insert(
            "pdf_engine".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(self.records.engine_name().to_string()),
            },
        );

        SystemHealth::from_components(components)
    }

    async fn check_session_store(&self) -> Result<usize, String> {
        self.records
            .session_count()
            .await
            .map_err(|e| format!("Session store unavailable: {}", e))
    }
}
