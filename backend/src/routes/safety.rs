//! Stateless health-safety check API routes
//!
//! Thin wrappers over the shared validator. Nothing here touches the
//! database or requires authentication.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use validator::Validate;
use wellness_coach_shared::safety::{
    self, CalorieCheck, DietaryCheck, EmergencyCheck, ProfileSafetyInput, ProfileSafetyResult,
    WorkoutCheck,
};
use wellness_coach_shared::{
    CalorieCheckRequest, DietaryCheckRequest, DisclaimersResponse, SymptomsCheckRequest,
    WorkoutCheckRequest,
};

/// Create safety check routes
pub fn safety_routes() -> Router<AppState> {
    Router::new()
        .route("/profile-check", post(profile_check))
        .route("/symptoms-check", post(symptoms_check))
        .route("/calorie-check", post(calorie_check))
        .route("/workout-check", post(workout_check))
        .route("/dietary-check", post(dietary_check))
        .route("/disclaimers", get(disclaimers))
}

/// POST /api/v1/safety/profile-check
///
/// Malformed fields are treated as absent rather than rejected.
async fn profile_check(Json(input): Json<ProfileSafetyInput>) -> Json<ProfileSafetyResult> {
    Json(safety::validate_user_profile_safety(&input))
}

/// POST /api/v1/safety/symptoms-check
async fn symptoms_check(
    Json(req): Json<SymptomsCheckRequest>,
) -> Result<Json<EmergencyCheck>, ApiError> {
    req.validate()?;
    Ok(Json(safety::detect_emergency_symptoms(&req.symptoms)))
}

/// POST /api/v1/safety/calorie-check
///
/// Unknown goals and non-numeric ages are ignored rather than rejected.
async fn calorie_check(Json(req): Json<CalorieCheckRequest>) -> Json<CalorieCheck> {
    Json(safety::validate_calorie_target(req.calories, req.age, req.goal))
}

/// POST /api/v1/safety/workout-check
async fn workout_check(Json(req): Json<WorkoutCheckRequest>) -> Json<WorkoutCheck> {
    Json(safety::validate_workout_plan(req.minutes, req.activity_level, req.age))
}

/// POST /api/v1/safety/dietary-check
async fn dietary_check(Json(req): Json<DietaryCheckRequest>) -> Json<DietaryCheck> {
    Json(safety::validate_dietary_tags(&req.restrictions, req.goal))
}

/// GET /api/v1/safety/disclaimers
async fn disclaimers() -> Json<DisclaimersResponse> {
    Json(DisclaimersResponse {
        general: safety::safety_disclaimer().to_string(),
        exercise: safety::exercise_disclaimer().to_string(),
        nutrition: safety::nutrition_disclaimer().to_string(),
    })
}
