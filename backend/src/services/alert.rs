//! Health concerns and emergency alert lifecycle

use crate::error::ApiError;
use crate::repositories::{AlertRepository, UserRepository};
use crate::services::audit;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;
use wellness_coach_shared::safety::{classify_alert_type, detect_emergency_symptoms};
use wellness_coach_shared::{
    AlertResponse, EmergencyAlert, EmergencyResources, EscalateAlertRequest, FlagSeverity,
    HealthConcernRequest, HealthConcernResponse, ResolveAlertRequest, TriggerSource, User,
};

const PERFORMED_BY_USER: &str = "user";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Alert for a concern whose description contains an emergency phrase
pub fn concern_alert(user_id: Uuid, req: &HealthConcernRequest, now: DateTime<Utc>) -> Option<EmergencyAlert> {
    let check = detect_emergency_symptoms(&[req.description.as_str()]);
    if !check.has_emergency_symptoms {
        return None;
    }

    let mut symptoms = vec![req.description.clone()];
    symptoms.extend(req.symptoms.iter().cloned());

    Some(EmergencyAlert::new(
        user_id,
        None,
        classify_alert_type(&req.description),
        FlagSeverity::Critical,
        format!("Emergency health concern reported: {}", req.description),
        symptoms,
        TriggerSource::UserReport,
        now,
    ))
}

pub fn emergency_concern_response(
    alert_id: Uuid,
    resources: EmergencyResources,
) -> HealthConcernResponse {
    HealthConcernResponse {
        emergency_detected: true,
        message: "Emergency concern detected. Please seek immediate medical attention.".to_string(),
        alert_id: Some(alert_id),
        immediate_actions: strings(&[
            "Call emergency services (911) if experiencing severe symptoms",
            "Contact your healthcare provider immediately",
            "Go to the nearest emergency room if symptoms are severe",
            "Do not delay seeking professional medical help",
        ]),
        emergency_resources: Some(resources),
        recommendations: Vec::new(),
        next_steps: Vec::new(),
    }
}

pub fn recorded_concern_response() -> HealthConcernResponse {
    HealthConcernResponse {
        emergency_detected: false,
        message: "Health concern recorded".to_string(),
        alert_id: None,
        immediate_actions: Vec::new(),
        emergency_resources: None,
        recommendations: strings(&[
            "Consider consulting with your healthcare provider",
            "Monitor symptoms and seek professional help if they worsen",
            "Avoid strenuous activity until cleared by a medical professional",
            "Document any changes in your symptoms",
        ]),
        next_steps: strings(&[
            "Schedule appointment with healthcare provider if symptoms persist",
            "Contact emergency services if symptoms become severe",
            "Update your health profile with any new information",
        ]),
    }
}

pub struct AlertService;

impl AlertService {
    /// Record a user-reported health concern
    ///
    /// Emergency phrasing creates a critical alert; anything else becomes a
    /// safety flag on the user at the reported severity.
    pub async fn report_concern(
        pool: &PgPool,
        mut user: User,
        req: HealthConcernRequest,
        resources: EmergencyResources,
    ) -> Result<HealthConcernResponse, ApiError> {
        req.validate()?;
        let now = Utc::now();

        if let Some(alert) = concern_alert(user.id, &req, now) {
            AlertRepository::insert(pool, &alert)
                .await
                .map_err(ApiError::Internal)?;
            audit::record_alert(user.id, alert.id, alert.trigger_source);
            return Ok(emergency_concern_response(alert.id, resources));
        }

        let before = user.safety_flags.len();
        user.add_safety_flag(
            "user_reported_health_concern",
            FlagSeverity::from(req.severity),
            req.description.as_str(),
            now,
        );
        UserRepository::save_risk_state(pool, &user, user.flags_since(before))
            .await
            .map_err(ApiError::Internal)?;

        info!(
            target: "wellness_health_audit",
            user_id = %user.id,
            severity = %req.severity,
            related_to_exercise = req.related_to_exercise,
            "Health concern recorded"
        );
        Ok(recorded_concern_response())
    }

    pub async fn list_alerts(pool: &PgPool, user_id: Uuid) -> Result<Vec<AlertResponse>, ApiError> {
        let alerts = AlertRepository::list_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(alerts.into_iter().map(AlertResponse::from).collect())
    }

    async fn load(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<EmergencyAlert, ApiError> {
        AlertRepository::find_for_user(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Emergency alert not found".to_string()))
    }

    async fn store(pool: &PgPool, alert: EmergencyAlert) -> Result<AlertResponse, ApiError> {
        AlertRepository::save(pool, &alert)
            .await
            .map_err(ApiError::Internal)?;
        info!(
            target: "wellness_health_audit",
            user_id = %alert.user_id,
            alert_id = %alert.id,
            status = %alert.status,
            "Emergency alert updated"
        );
        Ok(AlertResponse::from(alert))
    }

    pub async fn acknowledge(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<AlertResponse, ApiError> {
        let mut alert = Self::load(pool, id, user_id).await?;
        alert.acknowledge(PERFORMED_BY_USER, Utc::now())?;
        Self::store(pool, alert).await
    }

    pub async fn resolve(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        req: ResolveAlertRequest,
    ) -> Result<AlertResponse, ApiError> {
        req.validate()?;
        let mut alert = Self::load(pool, id, user_id).await?;
        alert.resolve(req.resolution, PERFORMED_BY_USER, Utc::now())?;
        Self::store(pool, alert).await
    }

    pub async fn escalate(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        req: EscalateAlertRequest,
    ) -> Result<AlertResponse, ApiError> {
        req.validate()?;
        let mut alert = Self::load(pool, id, user_id).await?;
        alert.escalate(req.reason, Utc::now())?;
        Self::store(pool, alert).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wellness_coach_shared::{AlertStatus, AlertType, Severity};

    fn concern(description: &str) -> HealthConcernRequest {
        HealthConcernRequest {
            description: description.to_string(),
            severity: Severity::Moderate,
            symptoms: vec!["sweating".to_string()],
            related_to_exercise: true,
        }
    }

    #[test]
    fn test_emergency_concern_creates_critical_alert() {
        let user_id = Uuid::new_v4();
        let alert = concern_alert(user_id, &concern("Sudden chest pain after my run"), Utc::now())
            .expect("emergency phrase should produce an alert");

        assert_eq!(alert.user_id, user_id);
        assert_eq!(alert.alert_type, AlertType::ChestPain);
        assert_eq!(alert.severity, FlagSeverity::Critical);
        assert_eq!(alert.trigger_source, TriggerSource::UserReport);
        assert_eq!(alert.status, AlertStatus::New);
        assert!(alert.follow_up_required);
        assert_eq!(alert.symptoms.len(), 2);
    }

    #[test]
    fn test_ordinary_concern_has_no_alert() {
        assert!(concern_alert(Uuid::new_v4(), &concern("Sore calves"), Utc::now()).is_none());

        let response = recorded_concern_response();
        assert!(!response.emergency_detected);
        assert!(response.alert_id.is_none());
        assert_eq!(response.recommendations.len(), 4);
    }

    #[test]
    fn test_emergency_response_serializes_resources() {
        let resources = EmergencyResources {
            emergency_services: "911".to_string(),
            poison_control: "1-800-222-1222".to_string(),
            crisis_text_line: "741741".to_string(),
            suicide_prevention: "988".to_string(),
        };
        let json = serde_json::to_value(emergency_concern_response(Uuid::new_v4(), resources)).unwrap();
        assert_eq!(json["emergency_detected"], true);
        assert_eq!(json["emergency_resources"]["suicide_prevention"], "988");
        assert!(json.get("recommendations").is_none());
    }

    proptest! {
        #[test]
        fn prop_alert_symptoms_lead_with_description(extra in proptest::collection::vec("[a-z ]{1,20}", 0..5)) {
            let mut req = concern("shortness of breath on the stairs");
            req.symptoms = extra.clone();
            let alert = concern_alert(Uuid::new_v4(), &req, Utc::now()).unwrap();
            prop_assert_eq!(&alert.symptoms[0], &req.description);
            prop_assert_eq!(alert.symptoms.len(), extra.len() + 1);
        }
    }
}
