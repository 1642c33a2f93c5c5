//! Health check and metrics endpoints
//!
//! - /health - Basic health check
//! - /health/ready - Readiness probe (database reachable)
//! - /health/live - Liveness probe
//! - /metrics - Prometheus exposition

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::time::Instant;

const SERVICE_NAME: &str = "wellness-coach-backend";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub agent_service: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    fn new(status: &str, checks: Option<HealthChecks>) -> Self {
        Self {
            status: status.to_string(),
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy", None))
}

/// Readiness probe, 503 when the database is unreachable
///
/// A disabled agent service is reported but does not fail readiness.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let started = Instant::now();
    let database = match db::health_check(state.db()).await {
        Ok(_) => CheckStatus {
            status: "healthy".to_string(),
            latency_ms: Some(started.elapsed().as_millis()),
            message: None,
        },
        Err(e) => CheckStatus {
            status: "unhealthy".to_string(),
            latency_ms: None,
            message: Some(e.to_string()),
        },
    };
    let agent_service = CheckStatus {
        status: if state.config().agent.enabled {
            "configured"
        } else {
            "disabled"
        }
        .to_string(),
        latency_ms: None,
        message: None,
    };

    let is_ready = database.status == "healthy";
    let response = HealthResponse::new(
        if is_ready { "ready" } else { "not_ready" },
        Some(HealthChecks {
            database,
            agent_service,
        }),
    );

    if is_ready {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("alive", None))
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, SERVICE_NAME);
        assert!(!response.version.is_empty());
    }

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
        assert!(response.checks.is_none());
    }
}
