//! Health profile repository

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use wellness_coach_shared::models::{
    DataSharing, EmergencyContact, HealthCondition, Height, Injury, Medication,
    NutritionPreferences, RiskFactor, TimeAvailability, Weight,
};
use wellness_coach_shared::{DietaryRestriction, HealthGoal, HealthProfile};

use super::parse_column;

/// Health profile record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: i32,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub height: Json<Height>,
    pub weight: Json<Weight>,
    pub current_activity_level: String,
    pub primary_goal: String,
    pub secondary_goals: Json<Vec<HealthGoal>>,
    pub time_availability: Json<TimeAvailability>,
    pub preferred_workout_types: Vec<String>,
    pub available_equipment: Vec<String>,
    pub fitness_experience: Option<String>,
    pub dietary_restrictions: Json<Vec<DietaryRestriction>>,
    pub nutrition_preferences: Json<NutritionPreferences>,
    pub health_conditions: Json<Vec<HealthCondition>>,
    pub medications: Json<Vec<Medication>>,
    pub injuries: Json<Vec<Injury>>,
    pub risk_factors: Json<Vec<RiskFactor>>,
    pub emergency_contacts: Json<Vec<EmergencyContact>>,
    pub data_sharing: Json<DataSharing>,
    pub medical_clearance_required: bool,
    pub next_recommended_assessment: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRecord> for HealthProfile {
    type Error = anyhow::Error;

    fn try_from(r: ProfileRecord) -> Result<Self> {
        Ok(HealthProfile {
            id: r.id,
            user_id: r.user_id,
            age: r.age,
            date_of_birth: r.date_of_birth,
            gender: parse_column(&r.gender, "gender")?,
            height: r.height.0,
            weight: r.weight.0,
            current_activity_level: parse_column(
                &r.current_activity_level,
                "current_activity_level",
            )?,
            primary_goal: parse_column(&r.primary_goal, "primary_goal")?,
            secondary_goals: r.secondary_goals.0,
            time_availability: r.time_availability.0,
            preferred_workout_types: r.preferred_workout_types,
            available_equipment: r.available_equipment,
            fitness_experience: r.fitness_experience,
            dietary_restrictions: r.dietary_restrictions.0,
            nutrition_preferences: r.nutrition_preferences.0,
            health_conditions: r.health_conditions.0,
            medications: r.medications.0,
            injuries: r.injuries.0,
            risk_factors: r.risk_factors.0,
            emergency_contacts: r.emergency_contacts.0,
            data_sharing: r.data_sharing.0,
            medical_clearance_required: r.medical_clearance_required,
            next_recommended_assessment: r.next_recommended_assessment,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub struct ProfileRepository;

impl ProfileRepository {
    /// Insert a new profile; fails on the per-user unique constraint
    pub async fn insert<'e, E>(executor: E, p: &HealthProfile) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO health_profiles (
                id, user_id, age, date_of_birth, gender, height, weight,
                current_activity_level, primary_goal, secondary_goals,
                time_availability, preferred_workout_types, available_equipment,
                fitness_experience, dietary_restrictions, nutrition_preferences,
                health_conditions, medications, injuries, risk_factors,
                emergency_contacts, data_sharing, medical_clearance_required,
                next_recommended_assessment, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26)
            "#,
        )
        .bind(p.id)
        .bind(p.user_id)
        .bind(p.age)
        .bind(p.date_of_birth)
        .bind(p.gender.as_str())
        .bind(Json(&p.height))
        .bind(Json(&p.weight))
        .bind(p.current_activity_level.as_str())
        .bind(p.primary_goal.as_str())
        .bind(Json(&p.secondary_goals))
        .bind(Json(&p.time_availability))
        .bind(&p.preferred_workout_types)
        .bind(&p.available_equipment)
        .bind(&p.fitness_experience)
        .bind(Json(&p.dietary_restrictions))
        .bind(Json(&p.nutrition_preferences))
        .bind(Json(&p.health_conditions))
        .bind(Json(&p.medications))
        .bind(Json(&p.injuries))
        .bind(Json(&p.risk_factors))
        .bind(Json(&p.emergency_contacts))
        .bind(Json(&p.data_sharing))
        .bind(p.medical_clearance_required)
        .bind(p.next_recommended_assessment)
        .bind(p.created_at)
        .bind(p.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<HealthProfile>> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT id, user_id, age, date_of_birth, gender, height, weight,
                   current_activity_level, primary_goal, secondary_goals,
                   time_availability, preferred_workout_types, available_equipment,
                   fitness_experience, dietary_restrictions, nutrition_preferences,
                   health_conditions, medications, injuries, risk_factors,
                   emergency_contacts, data_sharing, medical_clearance_required,
                   next_recommended_assessment, created_at, updated_at
            FROM health_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        record.map(HealthProfile::try_from).transpose()
    }

    pub async fn exists_for_user(pool: &PgPool, user_id: Uuid) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM health_profiles WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists.0)
    }

    /// Write back every mutable column of a merged profile
    pub async fn save<'e, E>(executor: E, p: &HealthProfile) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            UPDATE health_profiles SET
                age = $2,
                date_of_birth = $3,
                gender = $4,
                height = $5,
                weight = $6,
                current_activity_level = $7,
                primary_goal = $8,
                secondary_goals = $9,
                time_availability = $10,
                preferred_workout_types = $11,
                available_equipment = $12,
                fitness_experience = $13,
                dietary_restrictions = $14,
                nutrition_preferences = $15,
                health_conditions = $16,
                medications = $17,
                injuries = $18,
                risk_factors = $19,
                emergency_contacts = $20,
                data_sharing = $21,
                medical_clearance_required = $22,
                next_recommended_assessment = $23,
                updated_at = $24
            WHERE id = $1
            "#,
        )
        .bind(p.id)
        .bind(p.age)
        .bind(p.date_of_birth)
        .bind(p.gender.as_str())
        .bind(Json(&p.height))
        .bind(Json(&p.weight))
        .bind(p.current_activity_level.as_str())
        .bind(p.primary_goal.as_str())
        .bind(Json(&p.secondary_goals))
        .bind(Json(&p.time_availability))
        .bind(&p.preferred_workout_types)
        .bind(&p.available_equipment)
        .bind(&p.fitness_experience)
        .bind(Json(&p.dietary_restrictions))
        .bind(Json(&p.nutrition_preferences))
        .bind(Json(&p.health_conditions))
        .bind(Json(&p.medications))
        .bind(Json(&p.injuries))
        .bind(Json(&p.risk_factors))
        .bind(Json(&p.emergency_contacts))
        .bind(Json(&p.data_sharing))
        .bind(p.medical_clearance_required)
        .bind(p.next_recommended_assessment)
        .bind(p.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }
}
