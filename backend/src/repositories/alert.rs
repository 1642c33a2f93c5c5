//! Emergency alert repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use wellness_coach_shared::models::ResponseAction;
use wellness_coach_shared::EmergencyAlert;

use super::parse_column;

/// Emergency alert record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wellness_plan_id: Option<Uuid>,
    pub alert_type: String,
    pub severity: String,
    pub description: String,
    pub symptoms: Vec<String>,
    pub trigger_source: String,
    pub status: String,
    pub response_actions: Json<Vec<ResponseAction>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution: Option<String>,
    pub follow_up_required: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AlertRecord> for EmergencyAlert {
    type Error = anyhow::Error;

    fn try_from(r: AlertRecord) -> Result<Self> {
        Ok(EmergencyAlert {
            id: r.id,
            user_id: r.user_id,
            wellness_plan_id: r.wellness_plan_id,
            alert_type: parse_column(&r.alert_type, "alert_type")?,
            severity: parse_column(&r.severity, "severity")?,
            description: r.description,
            symptoms: r.symptoms,
            trigger_source: parse_column(&r.trigger_source, "trigger_source")?,
            status: parse_column(&r.status, "status")?,
            response_actions: r.response_actions.0,
            resolved_at: r.resolved_at,
            resolution: r.resolution,
            follow_up_required: r.follow_up_required,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub struct AlertRepository;

impl AlertRepository {
    pub async fn insert<'e, E>(executor: E, alert: &EmergencyAlert) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO emergency_alerts (
                id, user_id, wellness_plan_id, alert_type, severity, description,
                symptoms, trigger_source, status, response_actions, resolved_at,
                resolution, follow_up_required, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(alert.id)
        .bind(alert.user_id)
        .bind(alert.wellness_plan_id)
        .bind(alert.alert_type.as_str())
        .bind(alert.severity.as_str())
        .bind(&alert.description)
        .bind(&alert.symptoms)
        .bind(alert.trigger_source.as_str())
        .bind(alert.status.as_str())
        .bind(Json(&alert.response_actions))
        .bind(alert.resolved_at)
        .bind(&alert.resolution)
        .bind(alert.follow_up_required)
        .bind(alert.created_at)
        .bind(alert.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<EmergencyAlert>> {
        let record = sqlx::query_as::<_, AlertRecord>(
            r#"
            SELECT id, user_id, wellness_plan_id, alert_type, severity, description,
                   symptoms, trigger_source, status, response_actions, resolved_at,
                   resolution, follow_up_required, created_at, updated_at
            FROM emergency_alerts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        record.map(EmergencyAlert::try_from).transpose()
    }

    /// A user's alerts, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<EmergencyAlert>> {
        let records = sqlx::query_as::<_, AlertRecord>(
            r#"
            SELECT id, user_id, wellness_plan_id, alert_type, severity, description,
                   symptoms, trigger_source, status, response_actions, resolved_at,
                   resolution, follow_up_required, created_at, updated_at
            FROM emergency_alerts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        records.into_iter().map(EmergencyAlert::try_from).collect()
    }

    /// Persist a status transition
    pub async fn save(pool: &PgPool, alert: &EmergencyAlert) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE emergency_alerts SET
                status = $2,
                response_actions = $3,
                resolved_at = $4,
                resolution = $5,
                follow_up_required = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(alert.id)
        .bind(alert.status.as_str())
        .bind(Json(&alert.response_actions))
        .bind(alert.resolved_at)
        .bind(&alert.resolution)
        .bind(alert.follow_up_required)
        .bind(alert.updated_at)
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellness_coach_shared::{AlertStatus, AlertType, FlagSeverity, TriggerSource};

    #[test]
    fn test_record_converts_to_alert() {
        let now = Utc::now();
        let record = AlertRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            wellness_plan_id: Some(Uuid::new_v4()),
            alert_type: "breathing_difficulty".to_string(),
            severity: "high".to_string(),
            description: "Concerning symptoms reported during progress update: shortness of breath"
                .to_string(),
            symptoms: vec!["shortness of breath".to_string()],
            trigger_source: "progress_tracking".to_string(),
            status: "acknowledged".to_string(),
            response_actions: Json(Vec::new()),
            resolved_at: None,
            resolution: None,
            follow_up_required: true,
            created_at: now,
            updated_at: now,
        };
        let alert = EmergencyAlert::try_from(record).unwrap();
        assert_eq!(alert.alert_type, AlertType::BreathingDifficulty);
        assert_eq!(alert.severity, FlagSeverity::High);
        assert_eq!(alert.trigger_source, TriggerSource::ProgressTracking);
        assert_eq!(alert.status, AlertStatus::Acknowledged);
    }
}
