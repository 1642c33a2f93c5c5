//! Progress entry repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use wellness_coach_shared::models::{HealthMetrics, ProgressFlag, ReportedSymptom};
use wellness_coach_shared::ProgressEntry;

/// Progress entry record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wellness_plan_id: Uuid,
    pub week: i32,
    pub day: i32,
    pub workout_completed: Option<bool>,
    pub health_metrics: Json<HealthMetrics>,
    pub reported_symptoms: Json<Vec<ReportedSymptom>>,
    pub notes: String,
    pub concerns: String,
    pub safety_flags: Json<Vec<ProgressFlag>>,
    pub entry_date: DateTime<Utc>,
}

impl From<ProgressRecord> for ProgressEntry {
    fn from(r: ProgressRecord) -> Self {
        ProgressEntry {
            id: r.id,
            user_id: r.user_id,
            wellness_plan_id: r.wellness_plan_id,
            week: r.week,
            day: r.day,
            workout_completed: r.workout_completed,
            health_metrics: r.health_metrics.0,
            reported_symptoms: r.reported_symptoms.0,
            notes: r.notes,
            concerns: r.concerns,
            safety_flags: r.safety_flags.0,
            entry_date: r.entry_date,
        }
    }
}

pub struct ProgressRepository;

impl ProgressRepository {
    pub async fn insert<'e, E>(executor: E, entry: &ProgressEntry) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO progress_entries (
                id, user_id, wellness_plan_id, week, day, workout_completed,
                health_metrics, reported_symptoms, notes, concerns, safety_flags, entry_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.wellness_plan_id)
        .bind(entry.week)
        .bind(entry.day)
        .bind(entry.workout_completed)
        .bind(Json(&entry.health_metrics))
        .bind(Json(&entry.reported_symptoms))
        .bind(&entry.notes)
        .bind(&entry.concerns)
        .bind(Json(&entry.safety_flags))
        .bind(entry.entry_date)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Entries for one plan in week/day order
    pub async fn list_for_plan(pool: &PgPool, plan_id: Uuid) -> Result<Vec<ProgressEntry>> {
        let records = sqlx::query_as::<_, ProgressRecord>(
            r#"
            SELECT id, user_id, wellness_plan_id, week, day, workout_completed,
                   health_metrics, reported_symptoms, notes, concerns, safety_flags, entry_date
            FROM progress_entries
            WHERE wellness_plan_id = $1
            ORDER BY week, day, entry_date
            "#,
        )
        .bind(plan_id)
        .fetch_all(pool)
        .await?;

        Ok(records.into_iter().map(ProgressEntry::from).collect())
    }
}
