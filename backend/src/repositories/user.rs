//! User repository for database operations
//!
//! Accounts are owned by the auth service; a row here is created on the
//! first authenticated request and only carries risk and disclaimer state.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use wellness_coach_shared::models::SafetyFlag;
use wellness_coach_shared::User;

use super::parse_column;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: Option<String>,
    pub risk_level: String,
    pub health_status: String,
    pub requires_professional_consultation: bool,
    pub safety_flags: Json<Vec<SafetyFlag>>,
    pub health_disclaimer_accepted: bool,
    pub health_disclaimer_version: Option<String>,
    pub health_disclaimer_accepted_at: Option<DateTime<Utc>>,
    pub last_risk_assessment: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = anyhow::Error;

    fn try_from(record: UserRecord) -> Result<Self> {
        Ok(User {
            id: record.id,
            email: record.email,
            risk_level: parse_column(&record.risk_level, "risk_level")?,
            health_status: parse_column(&record.health_status, "health_status")?,
            requires_professional_consultation: record.requires_professional_consultation,
            safety_flags: record.safety_flags.0,
            health_disclaimer_accepted: record.health_disclaimer_accepted,
            health_disclaimer_version: record.health_disclaimer_version,
            health_disclaimer_accepted_at: record.health_disclaimer_accepted_at,
            last_risk_assessment: record.last_risk_assessment,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Fetch the user row, creating it on first access
    pub async fn get_or_create(pool: &PgPool, id: Uuid, email: Option<&str>) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET email = COALESCE(users.email, EXCLUDED.email)
            RETURNING id, email, risk_level, health_status,
                      requires_professional_consultation, safety_flags,
                      health_disclaimer_accepted, health_disclaimer_version,
                      health_disclaimer_accepted_at, last_risk_assessment,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .fetch_one(pool)
        .await?;

        record.try_into()
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, risk_level, health_status,
                   requires_professional_consultation, safety_flags,
                   health_disclaimer_accepted, health_disclaimer_version,
                   health_disclaimer_accepted_at, last_risk_assessment,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        record.map(User::try_from).transpose()
    }

    /// Persist the risk state and append the flags raised by this request
    ///
    /// The stored flag list is only ever extended in SQL, never replaced
    /// from the in-memory snapshot.
    pub async fn save_risk_state<'e, E>(executor: E, user: &User, new_flags: &[SafetyFlag]) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            UPDATE users SET
                risk_level = $2,
                health_status = $3,
                requires_professional_consultation = $4,
                safety_flags = safety_flags || $5::jsonb,
                last_risk_assessment = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(user.risk_level.as_str())
        .bind(user.health_status.as_str())
        .bind(user.requires_professional_consultation)
        .bind(Json(new_flags))
        .bind(user.last_risk_assessment)
        .bind(user.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Record disclaimer acceptance
    ///
    /// Returns None when the disclaimer had already been accepted.
    pub async fn accept_disclaimer(
        pool: &PgPool,
        id: Uuid,
        version: &str,
        accepted_at: DateTime<Utc>,
    ) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users SET
                health_disclaimer_accepted = TRUE,
                health_disclaimer_version = $2,
                health_disclaimer_accepted_at = $3,
                updated_at = $3
            WHERE id = $1 AND health_disclaimer_accepted = FALSE
            RETURNING id, email, risk_level, health_status,
                      requires_professional_consultation, safety_flags,
                      health_disclaimer_accepted, health_disclaimer_version,
                      health_disclaimer_accepted_at, last_risk_assessment,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(version)
        .bind(accepted_at)
        .fetch_optional(pool)
        .await?;

        record.map(User::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellness_coach_shared::{FlagSeverity, HealthStatus, RiskLevel};

    fn record() -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id: Uuid::new_v4(),
            email: None,
            risk_level: "high".to_string(),
            health_status: "requires_supervision".to_string(),
            requires_professional_consultation: true,
            safety_flags: Json(vec![SafetyFlag {
                flag: "Age requires special consideration for health planning".to_string(),
                severity: FlagSeverity::Moderate,
                description: "Health profile indicates potential risk factors".to_string(),
                flagged_at: now,
                resolved: false,
            }]),
            health_disclaimer_accepted: false,
            health_disclaimer_version: None,
            health_disclaimer_accepted_at: None,
            last_risk_assessment: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_record_converts_to_user() {
        let user = User::try_from(record()).unwrap();
        assert_eq!(user.risk_level, RiskLevel::High);
        assert_eq!(user.health_status, HealthStatus::RequiresSupervision);
        assert_eq!(user.safety_flags.len(), 1);
        assert!(user.requires_immediate_consultation());
    }

    #[test]
    fn test_unknown_risk_level_is_an_error() {
        let mut bad = record();
        bad.risk_level = "catastrophic".to_string();
        assert!(User::try_from(bad).is_err());
    }
}
