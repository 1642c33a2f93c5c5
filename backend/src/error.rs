//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;
use wellness_coach_shared::validation::ValidationError;
use wellness_coach_shared::{ConsultationGuidance, DomainError, ErrorDetail, ErrorResponse};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields")]
    InvalidFields(Vec<ValidationError>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The user must be cleared by a professional before continuing
    #[error("Professional consultation required")]
    ConsultationRequired(Box<ConsultationGuidance>),

    #[error("Health concern resolution required")]
    HealthConcernUnresolved,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidField { field, message } => {
                ApiError::InvalidFields(vec![ValidationError::new(&field, &message)])
            }
            DomainError::HealthConcernUnresolved => ApiError::HealthConcernUnresolved,
            DomainError::InvalidPlanState { .. } | DomainError::InvalidAlertTransition { .. } => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<Vec<ValidationError>> for ApiError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ApiError::InvalidFields(errors)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<ValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                    ValidationError::new(&field, &message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::InvalidFields(fields)
    }
}

fn detail(code: &str, message: String) -> ErrorDetail {
    ErrorDetail {
        code: code.to_string(),
        message,
        field: None,
        details: None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, detail("VALIDATION_ERROR", msg)),
            ApiError::InvalidFields(fields) => {
                let message = fields
                    .first()
                    .map(ValidationError::user_message)
                    .unwrap_or_else(|| "Invalid input".to_string());
                let details = fields
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "field": f.field,
                            "label": f.display_label,
                            "message": f.message,
                        })
                    })
                    .collect::<Vec<_>>();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorDetail {
                        code: "VALIDATION_ERROR".to_string(),
                        message,
                        field: fields.first().map(|f| f.field.clone()),
                        details: Some(serde_json::Value::Array(details)),
                    },
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, detail("NOT_FOUND", msg)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, detail("UNAUTHORIZED", msg)),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, detail("FORBIDDEN", msg)),
            ApiError::ConsultationRequired(guidance) => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "PROFESSIONAL_CONSULTATION_REQUIRED".to_string(),
                    message: "Professional medical consultation required before creating wellness plan"
                        .to_string(),
                    field: None,
                    details: serde_json::to_value(*guidance).ok(),
                },
            ),
            ApiError::HealthConcernUnresolved => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "HEALTH_CONCERN_RESOLUTION_REQUIRED".to_string(),
                    message: DomainError::HealthConcernUnresolved.to_string(),
                    field: Some("health_concern_resolved".to_string()),
                    details: Some(serde_json::json!({
                        "health_concern_resolution_required": true
                    })),
                },
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, detail("CONFLICT", msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, detail("BAD_REQUEST", msg)),
            ApiError::Upstream(msg) => {
                error!("Upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, detail("UPSTREAM_ERROR", msg))
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    detail("INTERNAL_ERROR", "An internal error occurred".to_string()),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    detail("DATABASE_ERROR", "A database error occurred".to_string()),
                )
            }
        };

        (status, Json(ErrorResponse { error: body })).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use wellness_coach_shared::{PlanStatus, ProfessionalResources};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error_status() {
        let error = ApiError::Validation("Invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status() {
        let error = ApiError::NotFound("Wellness plan not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_error_status() {
        let error = ApiError::Unauthorized("Invalid token".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_upstream_is_bad_gateway() {
        let response = ApiError::Upstream("agent timeout".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_plan_state_maps_to_bad_request() {
        let err: ApiError = DomainError::InvalidPlanState {
            action: "pause",
            status: PlanStatus::Completed,
        }
        .into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Cannot pause completed plan"));
    }

    #[tokio::test]
    async fn test_consultation_required_body() {
        let guidance = ConsultationGuidance {
            concerns: vec!["Health condition \"diabetes\" requires professional medical evaluation".to_string()],
            recommendations: vec!["Medical clearance required before starting any fitness program".to_string()],
            next_steps: vec!["Schedule consultation with primary care physician".to_string()],
            professional_resources: ProfessionalResources::default(),
        };
        let response = ApiError::ConsultationRequired(Box::new(guidance)).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "PROFESSIONAL_CONSULTATION_REQUIRED");
        assert_eq!(json["error"]["details"]["concerns"].as_array().unwrap().len(), 1);
        assert!(json["error"]["details"]["professional_resources"]["find_doctor"].is_string());
    }

    #[tokio::test]
    async fn test_field_errors_carry_labels() {
        let response = ApiError::InvalidFields(vec![ValidationError::new(
            "date_of_birth",
            "Date of birth cannot be in the future",
        )])
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["field"], "date_of_birth");
        assert_eq!(
            json["error"]["message"],
            "Date of Birth: Date of birth cannot be in the future"
        );
        assert_eq!(json["error"]["details"][0]["label"], "Date of Birth");
    }

    #[tokio::test]
    async fn test_health_concern_unresolved_flag() {
        let response = ApiError::from(DomainError::HealthConcernUnresolved).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json["error"]["details"]["health_concern_resolution_required"],
            true
        );
    }
}
