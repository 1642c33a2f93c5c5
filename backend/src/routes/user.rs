//! User risk state, disclaimer, health profile and health concern routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{AlertService, ProfileService, UserService};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use wellness_coach_shared::{
    AcceptDisclaimerRequest, CreateHealthProfileRequest, CreateProfileResponse,
    DisclaimerResponse, HealthConcernRequest, HealthConcernResponse, ProfileResponse,
    UpdateHealthProfileRequest, UpdateProfileResponse, UserResponse,
};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_user))
        .route("/health-disclaimer", post(accept_disclaimer))
        .route(
            "/health-profile",
            post(create_profile).get(get_profile).put(update_profile),
        )
        .route("/health-concern", post(report_concern))
}

/// GET /api/v1/user - Risk state, disclaimer state and safety flags
async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserService::get_user(state.db(), &auth).await?))
}

/// POST /api/v1/user/health-disclaimer
async fn accept_disclaimer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AcceptDisclaimerRequest>,
) -> Result<Json<DisclaimerResponse>, ApiError> {
    Ok(Json(UserService::accept_disclaimer(state.db(), &auth, req).await?))
}

/// POST /api/v1/user/health-profile
async fn create_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateHealthProfileRequest>,
) -> Result<(StatusCode, Json<CreateProfileResponse>), ApiError> {
    let user = UserService::current(state.db(), &auth).await?;
    let response = ProfileService::create_profile(state.db(), user, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/user/health-profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(ProfileService::get_profile(state.db(), auth.user_id).await?))
}

/// PUT /api/v1/user/health-profile
///
/// The safety check only re-runs when age, goal, conditions, medications
/// or injuries change.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateHealthProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, ApiError> {
    let user = UserService::current(state.db(), &auth).await?;
    Ok(Json(ProfileService::update_profile(state.db(), user, req).await?))
}

/// POST /api/v1/user/health-concern
async fn report_concern(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<HealthConcernRequest>,
) -> Result<Json<HealthConcernResponse>, ApiError> {
    let user = UserService::current(state.db(), &auth).await?;
    let resources = state.config().emergency.resources();
    Ok(Json(
        AlertService::report_concern(state.db(), user, req, resources).await?,
    ))
}
