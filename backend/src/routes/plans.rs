//! Wellness plan API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{PlanService, UserService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use wellness_coach_shared::{
    CreatePlanRequest, PauseRequest, PauseResponse, PlanCreation, PlanDetailResponse,
    PlanListResponse, ProgressEntry, ProgressUpdateRequest, ProgressUpdateResponse,
    ResumeRequest, ResumeResponse,
};

/// Create wellness plan routes
pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/wellness-plan", post(create_plan))
        .route("/wellness-plans", get(list_plans))
        .route("/wellness-plan/:id", get(get_plan))
        .route(
            "/wellness-plan/:id/progress",
            get(list_progress).put(update_progress),
        )
        .route("/wellness-plan/:id/pause", post(pause_plan))
        .route("/wellness-plan/:id/resume", post(resume_plan))
}

/// POST /api/v1/user/wellness-plan
///
/// 201 with the stored plan, or 200 when the agent service recommends a
/// professional consultation instead.
async fn create_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanCreation>), ApiError> {
    let user = UserService::current(state.db(), &auth).await?;
    let resources = state.config().emergency.resources();
    let creation = PlanService::create_plan(state.db(), state.agent(), resources, user, req).await?;

    let status = match creation {
        PlanCreation::Created(_) => StatusCode::CREATED,
        PlanCreation::ConsultationRecommended(_) => StatusCode::OK,
    };
    Ok((status, Json(creation)))
}

/// GET /api/v1/user/wellness-plans
async fn list_plans(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PlanListResponse>, ApiError> {
    Ok(Json(PlanService::list_plans(state.db(), auth.user_id).await?))
}

/// GET /api/v1/user/wellness-plan/:id
async fn get_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanDetailResponse>, ApiError> {
    Ok(Json(PlanService::get_plan(state.db(), id, auth.user_id).await?))
}

/// GET /api/v1/user/wellness-plan/:id/progress
async fn list_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ProgressEntry>>, ApiError> {
    Ok(Json(PlanService::list_progress(state.db(), id, auth.user_id).await?))
}

/// PUT /api/v1/user/wellness-plan/:id/progress
async fn update_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ProgressUpdateRequest>,
) -> Result<Json<ProgressUpdateResponse>, ApiError> {
    let resources = state.config().emergency.resources();
    Ok(Json(
        PlanService::update_progress(state.db(), id, auth.user_id, req, resources).await?,
    ))
}

/// POST /api/v1/user/wellness-plan/:id/pause
async fn pause_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<PauseRequest>,
) -> Result<Json<PauseResponse>, ApiError> {
    let user = UserService::current(state.db(), &auth).await?;
    Ok(Json(PlanService::pause(state.db(), user, id, req).await?))
}

/// POST /api/v1/user/wellness-plan/:id/resume
async fn resume_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ResumeRequest>,
) -> Result<Json<ResumeResponse>, ApiError> {
    Ok(Json(PlanService::resume(state.db(), id, auth.user_id, req).await?))
}
