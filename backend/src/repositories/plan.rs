//! Wellness plan repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use wellness_coach_shared::models::{
    HealthAnalysis, PlanFlag, PlanModification, ProfileSnapshot, WeeklyProgress,
};
use wellness_coach_shared::WellnessPlan;

use super::parse_column;

const PLAN_COLUMNS: &str = r#"
    id, user_id, plan_name, plan_description, status, plan_duration_weeks,
    current_week, user_profile_snapshot, health_analysis, plan_data,
    safety_notes, disclaimers, emergency_flags, weekly_progress,
    total_workouts_completed, modification_history, plan_start_date,
    paused_at, resumed_at, completed_at, last_accessed_at, created_at, updated_at
"#;

/// Wellness plan record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_name: String,
    pub plan_description: String,
    pub status: String,
    pub plan_duration_weeks: i32,
    pub current_week: i32,
    pub user_profile_snapshot: Json<ProfileSnapshot>,
    pub health_analysis: Json<HealthAnalysis>,
    pub plan_data: Json<serde_json::Value>,
    pub safety_notes: Vec<String>,
    pub disclaimers: Vec<String>,
    pub emergency_flags: Json<Vec<PlanFlag>>,
    pub weekly_progress: Json<Vec<WeeklyProgress>>,
    pub total_workouts_completed: i32,
    pub modification_history: Json<Vec<PlanModification>>,
    pub plan_start_date: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    pub resumed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRecord> for WellnessPlan {
    type Error = anyhow::Error;

    fn try_from(r: PlanRecord) -> Result<Self> {
        Ok(WellnessPlan {
            id: r.id,
            user_id: r.user_id,
            plan_name: r.plan_name,
            plan_description: r.plan_description,
            status: parse_column(&r.status, "status")?,
            plan_duration_weeks: r.plan_duration_weeks,
            current_week: r.current_week,
            user_profile_snapshot: r.user_profile_snapshot.0,
            health_analysis: r.health_analysis.0,
            plan_data: r.plan_data.0,
            safety_notes: r.safety_notes,
            disclaimers: r.disclaimers,
            emergency_flags: r.emergency_flags.0,
            weekly_progress: r.weekly_progress.0,
            total_workouts_completed: r.total_workouts_completed,
            modification_history: r.modification_history.0,
            plan_start_date: r.plan_start_date,
            paused_at: r.paused_at,
            resumed_at: r.resumed_at,
            completed_at: r.completed_at,
            last_accessed_at: r.last_accessed_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub struct PlanRepository;

impl PlanRepository {
    /// Insert a plan; a second open plan for the same user violates
    /// `idx_wellness_plans_one_open`
    pub async fn insert(pool: &PgPool, plan: &WellnessPlan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO wellness_plans (
                id, user_id, plan_name, plan_description, status, plan_duration_weeks,
                current_week, user_profile_snapshot, health_analysis, plan_data,
                safety_notes, disclaimers, emergency_flags, weekly_progress,
                total_workouts_completed, modification_history, plan_start_date,
                paused_at, resumed_at, completed_at, last_accessed_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
            "#,
        )
        .bind(plan.id)
        .bind(plan.user_id)
        .bind(&plan.plan_name)
        .bind(&plan.plan_description)
        .bind(plan.status.as_str())
        .bind(plan.plan_duration_weeks)
        .bind(plan.current_week)
        .bind(Json(&plan.user_profile_snapshot))
        .bind(Json(&plan.health_analysis))
        .bind(Json(&plan.plan_data))
        .bind(&plan.safety_notes)
        .bind(&plan.disclaimers)
        .bind(Json(&plan.emergency_flags))
        .bind(Json(&plan.weekly_progress))
        .bind(plan.total_workouts_completed)
        .bind(Json(&plan.modification_history))
        .bind(plan.plan_start_date)
        .bind(plan.paused_at)
        .bind(plan.resumed_at)
        .bind(plan.completed_at)
        .bind(plan.last_accessed_at)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Find a plan owned by `user_id`
    pub async fn find_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<WellnessPlan>> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS} FROM wellness_plans WHERE id = $1 AND user_id = $2"
        );
        let record = sqlx::query_as::<_, PlanRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        record.map(WellnessPlan::try_from).transpose()
    }

    /// All of a user's plans, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<WellnessPlan>> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS} FROM wellness_plans WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let records = sqlx::query_as::<_, PlanRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        records.into_iter().map(WellnessPlan::try_from).collect()
    }

    /// The user's draft or active plan, if any
    pub async fn find_open_for_user(pool: &PgPool, user_id: Uuid) -> Result<Option<WellnessPlan>> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS} FROM wellness_plans \
             WHERE user_id = $1 AND status IN ('draft', 'active') \
             ORDER BY created_at DESC LIMIT 1"
        );
        let record = sqlx::query_as::<_, PlanRecord>(&sql)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        record.map(WellnessPlan::try_from).transpose()
    }

    /// Write back the mutable lifecycle state of a plan
    pub async fn save<'e, E>(executor: E, plan: &WellnessPlan) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            UPDATE wellness_plans SET
                status = $2,
                current_week = $3,
                emergency_flags = $4,
                weekly_progress = $5,
                total_workouts_completed = $6,
                modification_history = $7,
                paused_at = $8,
                resumed_at = $9,
                completed_at = $10,
                last_accessed_at = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(plan.id)
        .bind(plan.status.as_str())
        .bind(plan.current_week)
        .bind(Json(&plan.emergency_flags))
        .bind(Json(&plan.weekly_progress))
        .bind(plan.total_workouts_completed)
        .bind(Json(&plan.modification_history))
        .bind(plan.paused_at)
        .bind(plan.resumed_at)
        .bind(plan.completed_at)
        .bind(plan.last_accessed_at)
        .bind(plan.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn touch_last_accessed(pool: &PgPool, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE wellness_plans SET last_accessed_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(pool)
            .await?;

        Ok(())
    }
}
