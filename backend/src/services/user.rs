//! User risk state and disclaimer acceptance

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::UserRepository;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use wellness_coach_shared::validation::{validate_disclaimer_version, ValidationError};
use wellness_coach_shared::{AcceptDisclaimerRequest, DisclaimerResponse, User, UserResponse};

pub struct UserService;

impl UserService {
    /// Load the caller's user row, creating it on first access
    pub async fn current(pool: &PgPool, auth: &AuthUser) -> Result<User, ApiError> {
        UserRepository::get_or_create(pool, auth.user_id, auth.email.as_deref())
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn get_user(pool: &PgPool, auth: &AuthUser) -> Result<UserResponse, ApiError> {
        let user = Self::current(pool, auth).await?;
        Ok(Self::to_response(user))
    }

    pub fn to_response(user: User) -> UserResponse {
        let requires_immediate_consultation = user.requires_immediate_consultation();
        UserResponse {
            id: user.id,
            email: user.email,
            risk_level: user.risk_level,
            health_status: user.health_status,
            requires_professional_consultation: user.requires_professional_consultation,
            requires_immediate_consultation,
            health_disclaimer_accepted: user.health_disclaimer_accepted,
            health_disclaimer_version: user.health_disclaimer_version,
            last_risk_assessment: user.last_risk_assessment,
            safety_flags: user.safety_flags,
        }
    }

    fn validate_acceptance(req: &AcceptDisclaimerRequest) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if !req.accept_terms {
            errors.push(ValidationError::new(
                "accept_terms",
                "Must accept health disclaimer terms",
            ));
        }
        if let Err(message) = validate_disclaimer_version(&req.disclaimer_version) {
            errors.push(ValidationError::new("disclaimer_version", &message));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::InvalidFields(errors))
        }
    }

    /// Accept the health disclaimer; it can only be accepted once
    pub async fn accept_disclaimer(
        pool: &PgPool,
        auth: &AuthUser,
        req: AcceptDisclaimerRequest,
    ) -> Result<DisclaimerResponse, ApiError> {
        let user = Self::current(pool, auth).await?;
        if user.health_disclaimer_accepted {
            return Err(ApiError::BadRequest(
                "Health disclaimer already accepted".to_string(),
            ));
        }
        Self::validate_acceptance(&req)?;

        let now = Utc::now();
        UserRepository::accept_disclaimer(pool, user.id, &req.disclaimer_version, now)
            .await
            .map_err(ApiError::Internal)?
            // A concurrent request won the race
            .ok_or_else(|| ApiError::BadRequest("Health disclaimer already accepted".to_string()))?;

        info!(
            target: "wellness_health_audit",
            user_id = %user.id,
            version = %req.disclaimer_version,
            "Health disclaimer accepted"
        );

        Ok(DisclaimerResponse {
            disclaimer_version: req.disclaimer_version,
            accepted_at: now,
            next_steps: vec![
                "Complete your comprehensive health profile".to_string(),
                "Add emergency contact information".to_string(),
                "Consider scheduling a consultation with your healthcare provider".to_string(),
            ],
            important_reminders: vec![
                "This service provides general wellness information only".to_string(),
                "Professional medical consultation is recommended for personalized care"
                    .to_string(),
                "Report any concerning symptoms to healthcare providers immediately".to_string(),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use wellness_coach_shared::{FlagSeverity, RiskLevel};

    fn request(accept: bool, version: &str) -> AcceptDisclaimerRequest {
        AcceptDisclaimerRequest {
            accept_terms: accept,
            disclaimer_version: version.to_string(),
            understand_limitations: None,
            emergency_awareness: None,
        }
    }

    #[test]
    fn test_acceptance_requires_terms_and_version() {
        assert!(UserService::validate_acceptance(&request(true, "1.0")).is_ok());

        match UserService::validate_acceptance(&request(false, "v1")) {
            Err(ApiError::InvalidFields(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["accept_terms", "disclaimer_version"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_response_exposes_consultation_gate() {
        let now = Utc::now();
        let mut user = User::new(Uuid::new_v4(), Some("a@example.com".to_string()), now);
        user.add_safety_flag("user_reported_health_concern", FlagSeverity::High, "knee", now);

        let response = UserService::to_response(user);
        assert_eq!(response.risk_level, RiskLevel::High);
        assert!(response.requires_immediate_consultation);
        assert_eq!(response.safety_flags.len(), 1);
    }
}
