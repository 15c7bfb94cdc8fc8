use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::{ml::ArtifactKind, state::AppState};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
}

/// Individual health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    scaler: ComponentHealth,
    model: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentHealth {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            error: Some(error),
        }
    }

    fn artifact(kind: ArtifactKind, loaded: bool) -> Self {
        if loaded {
            Self::healthy()
        } else {
            Self::unhealthy(format!("{kind} not loaded"))
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// GET /health - Health check endpoint
///
/// Reports whether each artifact was loaded at startup
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let scaler = ComponentHealth::artifact(ArtifactKind::Scaler, state.pipeline.scaler_loaded());
    let model = ComponentHealth::artifact(ArtifactKind::Model, state.pipeline.model_loaded());

    let all_healthy = scaler.is_healthy() && model.is_healthy();

    let response = HealthResponse {
        status: if all_healthy {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        timestamp: chrono::Utc::now(),
        checks: HealthChecks { scaler, model },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

/// GET /health/ready - Readiness probe
///
/// Returns 200 only when both artifacts are available
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.pipeline.scaler_loaded() && state.pipeline.model_loaded() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
