//! Emergency alert API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::AlertService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use wellness_coach_shared::{AlertResponse, EscalateAlertRequest, ResolveAlertRequest};

/// Create emergency alert routes
pub fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/:id/acknowledge", post(acknowledge_alert))
        .route("/:id/resolve", post(resolve_alert))
        .route("/:id/escalate", post(escalate_alert))
}

/// GET /api/v1/user/emergency-alerts - Newest first
async fn list_alerts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AlertResponse>>, ApiError> {
    Ok(Json(AlertService::list_alerts(state.db(), auth.user_id).await?))
}

async fn acknowledge_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AlertResponse>, ApiError> {
    Ok(Json(AlertService::acknowledge(state.db(), id, auth.user_id).await?))
}

async fn resolve_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ResolveAlertRequest>,
) -> Result<Json<AlertResponse>, ApiError> {
    Ok(Json(AlertService::resolve(state.db(), id, auth.user_id, req).await?))
}

async fn escalate_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<EscalateAlertRequest>,
) -> Result<Json<AlertResponse>, ApiError> {
    Ok(Json(AlertService::escalate(state.db(), id, auth.user_id, req).await?))
}
