use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Extension;

use vitalink_domain::health::{
    ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus,
};

use crate::api::handlers::health::{health_check, initialize_server_start_time};

/// Health service stub reporting a fixed status
#[derive(Debug)]
struct StubHealthService {
    status: SystemStatus,
}

#[async_trait]
impl HealthServiceTrait for StubHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();
        components.insert(
            "database".to_string(),
            HealthComponent {
                status: match self.status {
                    SystemStatus::Healthy => ComponentStatus::Healthy,
                    SystemStatus::Degraded => ComponentStatus::Degraded,
                    SystemStatus::Unhealthy => ComponentStatus::Unhealthy,
                },
                details: None,
            },
        );
        SystemHealth {
            status: self.status.clone(),
            components,
        }
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        Ok(self.status == SystemStatus::Healthy)
    }
}

#[tokio::test]
async fn healthy_system_reports_ok() {
    initialize_server_start_time();

    let service = Arc::new(StubHealthService {
        status: SystemStatus::Healthy,
    }) as Arc<dyn HealthServiceTrait + Send + Sync>;

    let response = health_check(Extension(service)).await.unwrap().into_response();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn degraded_system_reports_service_unavailable() {
    initialize_server_start_time();

    let service = Arc::new(StubHealthService {
        status: SystemStatus::Degraded,
    }) as Arc<dyn HealthServiceTrait + Send + Sync>;

    let response = health_check(Extension(service)).await.unwrap().into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
