//! Profile service - health profile creation, retrieval and updates
//!
//! Creating a profile, or changing one of its critical fields, runs the
//! safety gate. The stored risk level is the higher of the rule verdict
//! and the additive risk score, and it is written to the user row in the
//! same transaction as the profile.

use crate::error::ApiError;
use crate::repositories::{is_unique_violation, ProfileRepository, UserRepository};
use crate::services::audit::{self, AuditEvent};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;
use wellness_coach_shared::models::{RiskFactor, TimeAvailability};
use wellness_coach_shared::safety::{
    self, assess_risk_level, validate_user_profile_safety, ProfileSafetyInput, ProfileSafetyResult,
};
use wellness_coach_shared::validation::{validate_new_profile, validate_profile_update};
use wellness_coach_shared::{
    CreateHealthProfileRequest, CreateProfileResponse, FlagSeverity, HealthProfile, HealthStatus,
    ProfessionalResources, ProfileResponse, RiskLevel, SafetyAssessment, SafetyReassessment,
    UpdateHealthProfileRequest, UpdateProfileResponse, User,
};

const PROFILE_NOT_FOUND: &str = "Health profile not found. Please create one first.";

/// Outcome of running the safety gate over a profile
#[derive(Debug, Clone)]
pub struct ProfileVerdict {
    pub verdict: ProfileSafetyResult,
    /// Higher of the rule verdict and the additive score
    pub risk_level: RiskLevel,
}

impl ProfileVerdict {
    pub fn evaluate(profile: &HealthProfile) -> Self {
        let verdict = validate_user_profile_safety(&ProfileSafetyInput::from(profile));
        let risk_level = verdict.risk_level.raise(assess_risk_level(profile));
        Self {
            verdict,
            risk_level,
        }
    }

    fn risk_factors(&self) -> Vec<RiskFactor> {
        if self.verdict.is_safe {
            return Vec::new();
        }
        self.verdict
            .concerns
            .iter()
            .map(|concern| RiskFactor {
                factor: concern.clone(),
                severity: FlagSeverity::from(self.risk_level),
                requires_professional_consultation: true,
            })
            .collect()
    }

    /// Copy the verdict onto the profile's derived safety fields
    pub fn apply_to_profile(&self, profile: &mut HealthProfile, now: DateTime<Utc>) {
        profile.risk_factors = self.risk_factors();
        profile.medical_clearance_required = self.risk_level != RiskLevel::Low;
        profile.refresh_derived(now);
    }

    /// Copy the verdict onto the user's risk state
    pub fn apply_to_user(&self, user: &mut User, flag_description: &str, now: DateTime<Utc>) {
        user.risk_level = self.risk_level;
        user.requires_professional_consultation =
            !self.verdict.is_safe || self.risk_level != RiskLevel::Low;
        user.health_status = if self.verdict.is_safe {
            HealthStatus::ClearedForActivity
        } else {
            HealthStatus::RequiresSupervision
        };
        user.last_risk_assessment = Some(now);
        user.updated_at = now;

        if !self.verdict.is_safe {
            for concern in &self.verdict.concerns {
                user.add_safety_flag(concern.as_str(), FlagSeverity::Moderate, flag_description, now);
            }
        }
    }
}

/// Build a profile from a validated request
pub fn build_profile(
    user_id: Uuid,
    req: CreateHealthProfileRequest,
    now: DateTime<Utc>,
) -> HealthProfile {
    let time_availability = req
        .time_availability
        .map(|ta| TimeAvailability {
            daily_minutes: safety::limits::plan_daily_minutes(Some(ta.daily_minutes)),
            ..ta
        })
        .unwrap_or(TimeAvailability {
            daily_minutes: safety::limits::DEFAULT_DAILY_MINUTES,
            ..Default::default()
        });
    let available_equipment = if req.available_equipment.is_empty() {
        vec!["bodyweight".to_string()]
    } else {
        req.available_equipment
    };

    let mut weight = req.weight;
    weight.history.clear();

    HealthProfile {
        id: Uuid::new_v4(),
        user_id,
        age: req.age,
        date_of_birth: req.date_of_birth,
        gender: req.gender,
        height: req.height,
        weight,
        current_activity_level: req.current_activity_level,
        primary_goal: req.primary_goal,
        secondary_goals: req.secondary_goals,
        time_availability,
        preferred_workout_types: req.preferred_workout_types,
        available_equipment,
        fitness_experience: req.fitness_experience,
        dietary_restrictions: req.dietary_restrictions,
        nutrition_preferences: req.nutrition_preferences.unwrap_or_default(),
        health_conditions: req.health_conditions,
        medications: req.medications,
        injuries: req.injuries,
        risk_factors: Vec::new(),
        emergency_contacts: req.emergency_contacts,
        data_sharing: req.data_sharing.unwrap_or_default(),
        medical_clearance_required: false,
        next_recommended_assessment: None,
        created_at: now,
        updated_at: now,
    }
}

/// Merge the fields present on an update into the stored profile
///
/// A changed weight moves the previous value into the history.
pub fn merge_update(profile: &mut HealthProfile, req: UpdateHealthProfileRequest, now: DateTime<Utc>) {
    if let Some(age) = req.age {
        profile.age = age;
    }
    if let Some(dob) = req.date_of_birth {
        profile.date_of_birth = dob;
    }
    if let Some(gender) = req.gender {
        profile.gender = gender;
    }
    if let Some(height) = req.height {
        profile.height = height;
    }
    if let Some(weight) = req.weight {
        profile.weight.unit = weight.unit;
        profile.record_weight(weight.current, now);
    }
    if let Some(level) = req.current_activity_level {
        profile.current_activity_level = level;
    }
    if let Some(goal) = req.primary_goal {
        profile.primary_goal = goal;
    }
    if let Some(goals) = req.secondary_goals {
        profile.secondary_goals = goals;
    }
    if let Some(ta) = req.time_availability {
        profile.time_availability = ta;
    }
    if let Some(types) = req.preferred_workout_types {
        profile.preferred_workout_types = types;
    }
    if let Some(equipment) = req.available_equipment {
        profile.available_equipment = equipment;
    }
    if let Some(experience) = req.fitness_experience {
        profile.fitness_experience = Some(experience);
    }
    if let Some(restrictions) = req.dietary_restrictions {
        profile.dietary_restrictions = restrictions;
    }
    if let Some(prefs) = req.nutrition_preferences {
        profile.nutrition_preferences = prefs;
    }
    if let Some(conditions) = req.health_conditions {
        profile.health_conditions = conditions;
    }
    if let Some(medications) = req.medications {
        profile.medications = medications;
    }
    if let Some(injuries) = req.injuries {
        profile.injuries = injuries;
    }
    if let Some(contacts) = req.emergency_contacts {
        profile.emergency_contacts = contacts;
    }
    if let Some(sharing) = req.data_sharing {
        profile.data_sharing = sharing;
    }
}

fn profile_disclaimers() -> Vec<String> {
    vec![
        safety::safety_disclaimer().to_string(),
        "AI recommendations cannot replace professional medical advice".to_string(),
        "Individual health needs vary significantly".to_string(),
    ]
}

pub fn creation_response(profile: &HealthProfile, verdict: &ProfileVerdict) -> CreateProfileResponse {
    let is_safe = verdict.verdict.is_safe;
    let next_steps: Vec<String> = if is_safe {
        vec![
            "Consider professional consultation for optimal results",
            "Review safety guidelines before starting",
            "Monitor your progress and symptoms",
            "Start gradually with any new activities",
        ]
    } else {
        vec![
            "Schedule consultation with primary care physician",
            "Discuss fitness and nutrition goals with healthcare provider",
            "Obtain medical clearance before starting any exercise program",
            "Consider working with certified professionals",
        ]
    }
    .into_iter()
    .map(String::from)
    .collect();

    CreateProfileResponse {
        profile_id: profile.id,
        completion_percentage: profile.completion_percentage(),
        safety_assessment: SafetyAssessment {
            risk_level: verdict.risk_level,
            is_safe,
            professional_consultation_required: !is_safe,
        },
        safety_concerns: (!is_safe).then(|| verdict.verdict.concerns.clone()),
        recommendations: (!is_safe).then(|| verdict.verdict.recommendations.clone()),
        next_steps,
        professional_resources: (!is_safe).then(ProfessionalResources::default),
        disclaimers: profile_disclaimers(),
    }
}

/// Health profile service
pub struct ProfileService;

impl ProfileService {
    pub async fn create_profile(
        pool: &PgPool,
        mut user: User,
        req: CreateHealthProfileRequest,
    ) -> Result<CreateProfileResponse, ApiError> {
        req.validate()?;
        let now = Utc::now();
        validate_new_profile(&req, now.date_naive())?;

        if ProfileRepository::exists_for_user(pool, user.id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(Self::already_exists());
        }

        let mut profile = build_profile(user.id, req, now);
        let verdict = ProfileVerdict::evaluate(&profile);
        verdict.apply_to_profile(&mut profile, now);
        let flags_before = user.safety_flags.len();
        verdict.apply_to_user(&mut user, "Health profile indicates potential risk factors", now);

        let mut tx = pool.begin().await?;
        if let Err(e) = ProfileRepository::insert(&mut *tx, &profile).await {
            return Err(if is_unique_violation(&e) {
                Self::already_exists()
            } else {
                ApiError::Internal(e)
            });
        }
        UserRepository::save_risk_state(&mut *tx, &user, user.flags_since(flags_before))
            .await
            .map_err(ApiError::Internal)?;
        tx.commit().await?;

        audit::record_verdict(user.id, AuditEvent::ProfileCreated, &verdict.verdict, verdict.risk_level);
        info!(user_id = %user.id, profile_id = %profile.id, "Health profile created");

        Ok(creation_response(&profile, &verdict))
    }

    fn already_exists() -> ApiError {
        ApiError::Conflict("Health profile already exists. Use update endpoint to modify.".to_string())
    }

    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<ProfileResponse, ApiError> {
        let profile = ProfileRepository::find_by_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(PROFILE_NOT_FOUND.to_string()))?;

        Ok(ProfileResponse {
            completion_percentage: profile.completion_percentage(),
            bmi: profile.bmi(),
            next_assessment_date: profile.next_recommended_assessment,
            health_reminders: vec![
                "Keep your profile updated for accurate recommendations".to_string(),
                "Schedule regular check-ups with healthcare providers".to_string(),
                "Report any new health conditions or medications".to_string(),
            ],
            data: profile,
        })
    }

    /// Partial update; the safety gate only runs when a critical field changed
    pub async fn update_profile(
        pool: &PgPool,
        mut user: User,
        req: UpdateHealthProfileRequest,
    ) -> Result<UpdateProfileResponse, ApiError> {
        req.validate()?;
        let mut profile = ProfileRepository::find_by_user(pool, user.id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(PROFILE_NOT_FOUND.to_string()))?;

        let now = Utc::now();
        validate_profile_update(&req, profile.age, profile.date_of_birth, now.date_naive())?;

        let critical = req.changes_critical_fields(&profile);
        merge_update(&mut profile, req, now);

        let flags_before = user.safety_flags.len();
        let reassessment = if critical {
            let verdict = ProfileVerdict::evaluate(&profile);
            verdict.apply_to_profile(&mut profile, now);
            verdict.apply_to_user(
                &mut user,
                "Updated health profile indicates potential risk factors",
                now,
            );
            if !verdict.verdict.is_safe {
                warn!(user_id = %user.id, "Profile update raised safety concerns");
            }
            Some(verdict)
        } else {
            profile.refresh_derived(now);
            None
        };

        let mut tx = pool.begin().await?;
        ProfileRepository::save(&mut *tx, &profile)
            .await
            .map_err(ApiError::Internal)?;
        if reassessment.is_some() {
            UserRepository::save_risk_state(&mut *tx, &user, user.flags_since(flags_before))
                .await
                .map_err(ApiError::Internal)?;
        }
        tx.commit().await?;

        if let Some(verdict) = &reassessment {
            audit::record_verdict(user.id, AuditEvent::ProfileUpdated, &verdict.verdict, verdict.risk_level);
        }

        Ok(UpdateProfileResponse {
            completion_percentage: profile.completion_percentage(),
            last_updated: profile.updated_at,
            safety_reassessment: reassessment
                .map(|v| SafetyReassessment::from_verdict(&v.verdict, v.risk_level)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use wellness_coach_shared::models::{HealthCondition, Height, Weight};
    use wellness_coach_shared::{ActivityLevel, Gender, HealthGoal, HeightUnit, WeightUnit};

    fn request(age: i32) -> CreateHealthProfileRequest {
        CreateHealthProfileRequest {
            age,
            date_of_birth: NaiveDate::from_ymd_opt(Utc::now().year() - age, 1, 1).unwrap(),
            gender: Gender::Female,
            height: Height {
                value: 165.0,
                unit: HeightUnit::Cm,
            },
            weight: Weight {
                current: 60.0,
                unit: WeightUnit::Kg,
                history: Vec::new(),
            },
            current_activity_level: ActivityLevel::LightlyActive,
            primary_goal: HealthGoal::GeneralFitness,
            secondary_goals: Vec::new(),
            time_availability: Some(TimeAvailability {
                daily_minutes: 240,
                ..Default::default()
            }),
            preferred_workout_types: Vec::new(),
            available_equipment: Vec::new(),
            fitness_experience: None,
            dietary_restrictions: Vec::new(),
            nutrition_preferences: None,
            health_conditions: Vec::new(),
            medications: Vec::new(),
            injuries: Vec::new(),
            emergency_contacts: Vec::new(),
            data_sharing: None,
        }
    }

    #[test]
    fn test_build_profile_applies_defaults() {
        let profile = build_profile(Uuid::new_v4(), request(34), Utc::now());
        assert_eq!(profile.time_availability.daily_minutes, 180);
        assert_eq!(profile.available_equipment, vec!["bodyweight".to_string()]);
        assert!(profile.data_sharing.allow_emergency_access);
    }

    #[test]
    fn test_safe_profile_clears_user_for_activity() {
        let now = Utc::now();
        let mut profile = build_profile(Uuid::new_v4(), request(34), now);
        let verdict = ProfileVerdict::evaluate(&profile);
        assert!(verdict.verdict.is_safe);
        assert_eq!(verdict.risk_level, RiskLevel::Low);

        verdict.apply_to_profile(&mut profile, now);
        assert!(!profile.medical_clearance_required);
        assert!(profile.risk_factors.is_empty());
        assert!(profile.next_recommended_assessment.is_some());

        let mut user = User::new(profile.user_id, None, now);
        verdict.apply_to_user(&mut user, "Health profile indicates potential risk factors", now);
        assert_eq!(user.health_status, HealthStatus::ClearedForActivity);
        assert!(!user.requires_professional_consultation);
        assert!(user.safety_flags.is_empty());
    }

    #[test]
    fn test_unsafe_profile_flags_user() {
        let now = Utc::now();
        let mut req = request(70);
        req.health_conditions = vec![HealthCondition::named("Type 2 diabetes")];
        let mut profile = build_profile(Uuid::new_v4(), req, now);

        let verdict = ProfileVerdict::evaluate(&profile);
        assert!(!verdict.verdict.is_safe);
        assert!(verdict.risk_level >= RiskLevel::High);

        verdict.apply_to_profile(&mut profile, now);
        assert!(profile.medical_clearance_required);
        assert_eq!(profile.risk_factors.len(), verdict.verdict.concerns.len());

        let mut user = User::new(profile.user_id, None, now);
        verdict.apply_to_user(&mut user, "Health profile indicates potential risk factors", now);
        assert_eq!(user.health_status, HealthStatus::RequiresSupervision);
        assert!(user.requires_immediate_consultation());
        assert!(user
            .safety_flags
            .iter()
            .all(|f| f.severity == FlagSeverity::Moderate));

        let response = creation_response(&profile, &verdict);
        assert!(response.professional_resources.is_some());
        assert_eq!(
            response.next_steps[0],
            "Schedule consultation with primary care physician"
        );
    }

    #[test]
    fn test_merge_update_records_weight_history() {
        let now = Utc::now();
        let mut profile = build_profile(Uuid::new_v4(), request(34), now);
        let update = UpdateHealthProfileRequest {
            weight: Some(Weight {
                current: 58.5,
                unit: WeightUnit::Kg,
                history: Vec::new(),
            }),
            available_equipment: Some(vec!["dumbbells".to_string()]),
            ..Default::default()
        };
        assert!(!update.changes_critical_fields(&profile));

        merge_update(&mut profile, update, now);
        assert_eq!(profile.weight.current, 58.5);
        assert_eq!(profile.weight.history.len(), 1);
        assert_eq!(profile.weight.history[0].weight, 60.0);
        assert_eq!(profile.available_equipment, vec!["dumbbells".to_string()]);
    }
}
