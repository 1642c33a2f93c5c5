//! Wellness plan service
//!
//! Plan creation is gated in order: a stored profile, an accepted health
//! disclaimer, no other open plan, then the profile safety verdict and the
//! user's consultation gate. Only after all of those pass is the agent
//! service asked to generate a plan.
//!
//! Progress updates scan concerning symptoms for emergencies first. An
//! emergency creates an alert and holds the plan for review instead of
//! recording the entry.

use crate::error::ApiError;
use crate::repositories::{
    is_unique_violation, AlertRepository, PlanRepository, ProfileRepository, ProgressRepository,
    UserRepository,
};
use crate::services::agent::{AgentClient, AgentConsultation, AgentOutcome, AgentPlan, AgentPlanRequest};
use crate::services::audit::{self, AuditEvent};
use crate::services::profile::ProfileVerdict;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;
use wellness_coach_shared::models::{ProfileSnapshot, WeeklyProgress};
use wellness_coach_shared::safety::{self, classify_alert_type, detect_emergency_symptoms, limits};
use wellness_coach_shared::validation::validate_health_metrics;
use wellness_coach_shared::{
    ConsultationGuidance, ConsultationRecommendedResponse, CreatePlanRequest, CreatePlanResponse,
    DomainError, EmergencyAlert, EmergencyResources, FlagSeverity, HealthProfile, PauseRequest,
    PauseResponse, PlanCreation, PlanDetailResponse, PlanListItem, PlanListResponse, PlanStatus,
    PlanSummary, ProfessionalResources, ProgressEmergencyResponse, ProgressEntry,
    ProgressRecordedResponse, ProgressUpdateRequest, ProgressUpdateResponse, ResumeRequest,
    ResumeResponse, RiskLevel, SafetyInformation, TriggerSource, User, WellnessPlan,
};

const PLAN_NOT_FOUND: &str = "Wellness plan not found";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Plan Creation
// ============================================================================

/// Guidance returned with a 403 when a professional must clear the user
pub fn consultation_guidance(verdict: &ProfileVerdict, user: &User) -> ConsultationGuidance {
    let mut concerns = verdict.verdict.concerns.clone();
    concerns.extend(
        user.unresolved_flags()
            .filter(|f| f.severity.is_urgent())
            .map(|f| f.description.clone()),
    );
    let recommendations = if verdict.verdict.recommendations.is_empty() {
        strings(&["Professional medical supervision strongly recommended"])
    } else {
        verdict.verdict.recommendations.clone()
    };

    ConsultationGuidance {
        concerns,
        recommendations,
        next_steps: strings(&[
            "Schedule consultation with primary care physician",
            "Discuss fitness and nutrition goals with healthcare provider",
            "Obtain medical clearance for exercise and diet programs",
            "Return with professional approval for AI-assisted planning",
        ]),
        professional_resources: ProfessionalResources::default(),
    }
}

/// Translate a profile into the agent service's request vocabulary
pub fn agent_request(user: &User, profile: &HealthProfile, req: &CreatePlanRequest) -> AgentPlanRequest {
    let plan_name = req
        .plan_name
        .clone()
        .unwrap_or_else(|| format!("{} Plan", profile.primary_goal));
    let available_equipment = if profile.available_equipment.is_empty() {
        vec!["bodyweight".to_string()]
    } else {
        profile.available_equipment.clone()
    };

    AgentPlanRequest {
        user_id: user.id.to_string(),
        plan_name,
        age: profile.age,
        current_activity_level: profile.current_activity_level.as_str().to_string(),
        primary_goal: profile.primary_goal.agent_goal().to_string(),
        time_availability_minutes: limits::plan_daily_minutes(Some(
            profile.time_availability.daily_minutes,
        )),
        preferred_workout_types: profile.preferred_workout_types.clone(),
        available_equipment,
        dietary_restrictions: profile.dietary_restrictions.clone(),
        health_conditions: profile.health_conditions.clone(),
        medical_clearance: !profile.medical_clearance_required,
        health_disclaimer_acknowledged: user.health_disclaimer_accepted,
        plan_duration_weeks: limits::plan_duration_weeks(req.plan_duration_weeks),
    }
}

/// Build the stored plan from a generated one
pub fn plan_from_agent(
    profile: &HealthProfile,
    risk_level: RiskLevel,
    request: &AgentPlanRequest,
    generated: AgentPlan,
    now: DateTime<Utc>,
) -> WellnessPlan {
    let plan_name = generated
        .plan_name()
        .map(str::to_string)
        .unwrap_or_else(|| request.plan_name.clone());
    let plan_duration_weeks = generated
        .plan_duration_weeks()
        .filter(|w| *w > 0)
        .unwrap_or(request.plan_duration_weeks);
    let info = generated.safety_information;
    let disclaimers = if info.disclaimers.is_empty() {
        vec![safety::safety_disclaimer().to_string()]
    } else {
        info.disclaimers
    };

    WellnessPlan {
        id: Uuid::new_v4(),
        user_id: profile.user_id,
        plan_name,
        plan_description: format!(
            "AI-generated {} plan with safety considerations",
            request.primary_goal
        ),
        status: PlanStatus::Active,
        plan_duration_weeks,
        current_week: 1,
        user_profile_snapshot: ProfileSnapshot::capture(profile, risk_level),
        health_analysis: info.health_analysis.unwrap_or_default(),
        plan_data: generated.plan_data,
        safety_notes: info.safety_notes,
        disclaimers,
        emergency_flags: Vec::new(),
        weekly_progress: Vec::new(),
        total_workouts_completed: 0,
        modification_history: Vec::new(),
        plan_start_date: now,
        paused_at: None,
        resumed_at: None,
        completed_at: None,
        last_accessed_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn consultation_response(
    consultation: &AgentConsultation,
    resources: EmergencyResources,
) -> ConsultationRecommendedResponse {
    ConsultationRecommendedResponse {
        consultation_required: true,
        message: consultation
            .message
            .clone()
            .unwrap_or_else(|| "Professional consultation recommended for your safety".to_string()),
        recommendations: consultation.recommendations(),
        professional_resources: ProfessionalResources::default(),
        emergency_resources: resources,
    }
}

fn open_plan_conflict() -> ApiError {
    ApiError::Conflict(
        "Active wellness plan already exists. Complete or cancel current plan before creating a new one."
            .to_string(),
    )
}

// ============================================================================
// Progress
// ============================================================================

/// Alert raised when concerning progress symptoms contain an emergency phrase
pub fn progress_alert(
    plan: &WellnessPlan,
    req: &ProgressUpdateRequest,
    now: DateTime<Utc>,
) -> Option<EmergencyAlert> {
    let concerning: Vec<&str> = req
        .reported_symptoms
        .iter()
        .filter(|s| s.is_concerning())
        .map(|s| s.symptom.as_str())
        .collect();
    if concerning.is_empty() {
        return None;
    }

    let check = detect_emergency_symptoms(&concerning);
    let first = check.emergency_flags.first()?;

    Some(EmergencyAlert::new(
        plan.user_id,
        Some(plan.id),
        classify_alert_type(&first.symptom),
        FlagSeverity::High,
        format!(
            "Concerning symptoms reported during progress update: {}",
            concerning.join(", ")
        ),
        concerning.iter().map(|s| s.to_string()).collect(),
        TriggerSource::ProgressTracking,
        now,
    ))
}

/// Progress entry and weekly summary for a non-emergency update
pub fn progress_records(
    plan: &WellnessPlan,
    req: ProgressUpdateRequest,
    now: DateTime<Utc>,
) -> (ProgressEntry, WeeklyProgress) {
    let week = req.current_week.unwrap_or(plan.current_week);
    let workouts_completed = req
        .workouts_completed
        .unwrap_or(i32::from(req.workout_completed == Some(true)));
    let concerns_reported = req
        .reported_symptoms
        .iter()
        .map(|s| s.symptom.clone())
        .collect();
    let notes = req.notes.unwrap_or_default();

    let weekly = WeeklyProgress {
        week,
        workouts_completed,
        energy_level: req.health_metrics.energy_level,
        notes: notes.clone(),
        concerns_reported,
        week_completed_at: now,
    };

    let mut entry = ProgressEntry {
        id: Uuid::new_v4(),
        user_id: plan.user_id,
        wellness_plan_id: plan.id,
        week,
        day: req.current_day.unwrap_or(1),
        workout_completed: req.workout_completed,
        health_metrics: req.health_metrics,
        reported_symptoms: req.reported_symptoms,
        notes,
        concerns: req.concerns.unwrap_or_default(),
        safety_flags: Vec::new(),
        entry_date: now,
    };
    entry.apply_safety_concerns();

    (entry, weekly)
}

fn completion_steps() -> Vec<String> {
    strings(&[
        "Schedule a consultation with your healthcare provider to review your progress",
        "Consider creating a new plan to continue your wellness journey",
        "Maintain healthy habits developed during this program",
        "Continue monitoring your health and fitness regularly",
    ])
}

// ============================================================================
// Pause / Resume
// ============================================================================

pub fn pause_recommendations(health_related: bool) -> Vec<String> {
    if health_related {
        strings(&[
            "Consult with your healthcare provider about the health concern",
            "Obtain medical clearance before resuming the plan",
            "Focus on recovery and follow professional medical advice",
            "Consider modifying the plan based on professional recommendations",
        ])
    } else {
        strings(&[
            "Take the time you need away from the plan",
            "Resume when you feel ready and motivated",
            "Consider adjusting the plan if needed when resuming",
            "Maintain healthy habits even while the plan is paused",
        ])
    }
}

pub fn resume_recommendations(long_pause: bool) -> Vec<String> {
    if long_pause {
        strings(&[
            "Consider starting gradually after the extended pause",
            "Monitor your energy levels and adjust intensity as needed",
            "May want to review and update your plan based on any changes",
            "Consult healthcare provider if you have new health considerations",
        ])
    } else {
        strings(&[
            "Resume gradually and listen to your body",
            "Continue monitoring your progress and any symptoms",
            "Maintain the safety practices outlined in your plan",
            "Report any new concerns immediately",
        ])
    }
}

// ============================================================================
// Service
// ============================================================================

pub struct PlanService;

impl PlanService {
    pub async fn create_plan(
        pool: &PgPool,
        agent: &dyn AgentClient,
        resources: EmergencyResources,
        user: User,
        req: CreatePlanRequest,
    ) -> Result<PlanCreation, ApiError> {
        req.validate()?;

        let profile = ProfileRepository::find_by_user(pool, user.id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                ApiError::BadRequest("Health profile required before creating wellness plan".to_string())
            })?;

        if !user.health_disclaimer_accepted {
            return Err(ApiError::Forbidden(
                "Health disclaimer must be accepted before creating wellness plans".to_string(),
            ));
        }

        if PlanRepository::find_open_for_user(pool, user.id)
            .await
            .map_err(ApiError::Internal)?
            .is_some()
        {
            return Err(open_plan_conflict());
        }

        let verdict = ProfileVerdict::evaluate(&profile);
        if !verdict.verdict.is_safe || user.requires_immediate_consultation() {
            if verdict.verdict.is_safe {
                audit::record_event(user.id, AuditEvent::PlanBlocked, "unresolved urgent safety flags");
            } else {
                audit::record_verdict(user.id, AuditEvent::PlanBlocked, &verdict.verdict, verdict.risk_level);
            }
            return Err(ApiError::ConsultationRequired(Box::new(consultation_guidance(
                &verdict, &user,
            ))));
        }

        let request = agent_request(&user, &profile, &req);
        let generated = match agent.create_health_plan(&request).await {
            AgentOutcome::Created(plan) => *plan,
            AgentOutcome::ConsultationRecommended(consultation) => {
                audit::record_event(
                    user.id,
                    AuditEvent::ConsultationRecommended,
                    consultation.message.as_deref().unwrap_or("agent service declined"),
                );
                return Ok(PlanCreation::ConsultationRecommended(consultation_response(
                    &consultation,
                    resources,
                )));
            }
            AgentOutcome::Failed(message) => {
                warn!(user_id = %user.id, message = %message, "Plan generation failed");
                return Err(ApiError::Upstream(message));
            }
        };

        let next_steps = generated.next_steps.clone().unwrap_or_else(|| {
            strings(&[
                "Review all safety information and disclaimers",
                "Start with the monitoring and tracking approach",
                "Follow the gradual progression outlined in your plan",
                "Report any concerning symptoms immediately",
                "Schedule regular check-ins with healthcare professionals",
            ])
        });
        let plan = plan_from_agent(&profile, verdict.risk_level, &request, generated, Utc::now());

        if let Err(e) = PlanRepository::insert(pool, &plan).await {
            return Err(if is_unique_violation(&e) {
                open_plan_conflict()
            } else {
                ApiError::Internal(e)
            });
        }

        audit::record_verdict(user.id, AuditEvent::PlanCreated, &verdict.verdict, verdict.risk_level);
        info!(user_id = %user.id, plan_id = %plan.id, weeks = plan.plan_duration_weeks, "Wellness plan created");

        Ok(PlanCreation::Created(CreatePlanResponse {
            plan_id: plan.id,
            plan_summary: PlanSummary::from(&plan),
            safety_information: SafetyInformation {
                risk_level: plan.health_analysis.risk_level,
                safety_notes: plan.safety_notes.clone(),
                disclaimers: plan.disclaimers.clone(),
            },
            next_steps,
            emergency_resources: resources,
        }))
    }

    pub async fn list_plans(pool: &PgPool, user_id: Uuid) -> Result<PlanListResponse, ApiError> {
        let plans = PlanRepository::list_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let items: Vec<PlanListItem> = plans
            .iter()
            .map(|plan| PlanListItem {
                summary: PlanSummary::from(plan),
                completion_percentage: plan.completion_percentage(),
                is_active: plan.status == PlanStatus::Active,
                requires_attention: plan.requires_immediate_attention(),
            })
            .collect();
        let active_plans = items.iter().filter(|p| p.is_active).count();

        Ok(PlanListResponse {
            total_plans: items.len(),
            active_plans,
            plans: items,
            health_reminders: strings(&[
                "Follow your wellness plan consistently for best results",
                "Monitor your progress and report any concerning symptoms",
                "Consult healthcare professionals for any health concerns",
                "Stay hydrated and get adequate rest",
            ]),
        })
    }

    async fn load(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<WellnessPlan, ApiError> {
        PlanRepository::find_for_user(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(PLAN_NOT_FOUND.to_string()))
    }

    pub async fn get_plan(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<PlanDetailResponse, ApiError> {
        let mut plan = Self::load(pool, id, user_id).await?;
        let now = Utc::now();
        PlanRepository::touch_last_accessed(pool, plan.id, now)
            .await
            .map_err(ApiError::Internal)?;
        plan.last_accessed_at = Some(now);

        let requires_attention = plan.requires_immediate_attention();
        let emergency_flags = requires_attention.then(|| plan.unresolved_flags().cloned().collect());

        Ok(PlanDetailResponse {
            completion_percentage: plan.completion_percentage(),
            requires_attention,
            days_remaining: plan.days_remaining(),
            safety_status: plan.health_analysis.risk_level.as_str().to_string(),
            safety_reminders: strings(&[
                "Follow the plan as designed and monitor how you feel",
                "Stop any activity that causes pain or discomfort",
                "Report concerning symptoms to healthcare providers immediately",
                "Stay within the recommended intensity and duration limits",
            ]),
            urgent_attention_required: requires_attention.then_some(true),
            emergency_flags,
            plan,
        })
    }

    pub async fn list_progress(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Vec<ProgressEntry>, ApiError> {
        let plan = Self::load(pool, id, user_id).await?;
        ProgressRepository::list_for_plan(pool, plan.id)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn update_progress(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        req: ProgressUpdateRequest,
        resources: EmergencyResources,
    ) -> Result<ProgressUpdateResponse, ApiError> {
        req.validate()?;
        let mut plan = Self::load(pool, id, user_id).await?;
        if plan.status != PlanStatus::Active {
            return Err(DomainError::InvalidPlanState {
                action: "update progress for",
                status: plan.status,
            }
            .into());
        }
        validate_health_metrics(&req.health_metrics)?;
        let now = Utc::now();

        if let Some(alert) = progress_alert(&plan, &req, now) {
            plan.hold_for_review(now);

            let mut tx = pool.begin().await?;
            AlertRepository::insert(&mut *tx, &alert)
                .await
                .map_err(ApiError::Internal)?;
            PlanRepository::save(&mut *tx, &plan)
                .await
                .map_err(ApiError::Internal)?;
            tx.commit().await?;

            audit::record_alert(user_id, alert.id, alert.trigger_source);
            return Ok(ProgressUpdateResponse::Emergency(ProgressEmergencyResponse {
                plan_paused: true,
                emergency_alert_created: true,
                alert_id: alert.id,
                message: "Concerning symptoms detected. Your wellness plan has been paused for safety."
                    .to_string(),
                immediate_actions: strings(&[
                    "Consult with your healthcare provider immediately",
                    "Do not continue with the current workout or meal plan",
                    "Seek medical attention if symptoms are severe or worsening",
                    "Contact emergency services if experiencing emergency symptoms",
                ]),
                emergency_resources: resources,
            }));
        }

        let (entry, weekly) = progress_records(&plan, req, now);
        let completed = plan.record_progress(weekly, now)?;

        let mut tx = pool.begin().await?;
        ProgressRepository::insert(&mut *tx, &entry)
            .await
            .map_err(ApiError::Internal)?;
        PlanRepository::save(&mut *tx, &plan)
            .await
            .map_err(ApiError::Internal)?;
        tx.commit().await?;

        if !entry.safety_flags.is_empty() {
            warn!(
                user_id = %user_id,
                plan_id = %plan.id,
                flags = entry.safety_flags.len(),
                "Progress entry raised safety flags"
            );
        }
        if completed {
            info!(user_id = %user_id, plan_id = %plan.id, "Wellness plan completed");
        }

        Ok(ProgressUpdateResponse::Recorded(ProgressRecordedResponse {
            current_week: plan.current_week,
            total_weeks: plan.plan_duration_weeks,
            completion_percentage: plan.completion_percentage(),
            plan_status: plan.status,
            safety_flags: entry.safety_flags.iter().map(|f| f.flag.clone()).collect(),
            congratulations: completed
                .then(|| "Congratulations on completing your wellness plan!".to_string()),
            next_steps: if completed { completion_steps() } else { Vec::new() },
        }))
    }

    pub async fn pause(
        pool: &PgPool,
        mut user: User,
        id: Uuid,
        req: PauseRequest,
    ) -> Result<PauseResponse, ApiError> {
        req.validate()?;
        let mut plan = Self::load(pool, id, user.id).await?;
        let now = Utc::now();
        let reason = req.reason.as_deref();
        let health_related = plan.pause(reason, now)?;

        let mut tx = pool.begin().await?;
        PlanRepository::save(&mut *tx, &plan)
            .await
            .map_err(ApiError::Internal)?;
        if health_related {
            let before = user.safety_flags.len();
            user.add_safety_flag(
                "wellness_plan_health_pause",
                FlagSeverity::Moderate,
                format!("Wellness plan paused due to: {}", reason.unwrap_or_default()),
                now,
            );
            UserRepository::save_risk_state(&mut *tx, &user, user.flags_since(before))
                .await
                .map_err(ApiError::Internal)?;
        }
        tx.commit().await?;

        info!(
            user_id = %user.id,
            plan_id = %plan.id,
            health_related,
            expected_duration = req.expected_duration.as_deref().unwrap_or("unspecified"),
            "Wellness plan paused"
        );

        Ok(PauseResponse {
            plan_status: plan.status,
            paused_at: plan.paused_at,
            health_related,
            recommendations: pause_recommendations(health_related),
        })
    }

    pub async fn resume(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        req: ResumeRequest,
    ) -> Result<ResumeResponse, ApiError> {
        req.validate()?;
        let mut plan = Self::load(pool, id, user_id).await?;
        let outcome = plan.resume(req.health_concern_resolved, req.resume_notes.as_deref(), Utc::now())?;

        PlanRepository::save(pool, &plan)
            .await
            .map_err(ApiError::Internal)?;
        info!(user_id = %user_id, plan_id = %plan.id, pause_days = outcome.pause_days, "Wellness plan resumed");

        Ok(ResumeResponse {
            plan_status: plan.status,
            current_week: plan.current_week,
            weeks_remaining: plan.weeks_remaining(),
            pause_days: outcome.pause_days,
            recommendations: resume_recommendations(outcome.long_pause),
            safety_reminders: strings(&[
                "Start at a comfortable intensity and build back up",
                "Stop any activity that causes pain or discomfort",
                "Monitor your response to resuming the program",
                "Contact healthcare providers for any concerns",
            ]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::profile::build_profile;
    use chrono::NaiveDate;
    use rstest::rstest;
    use wellness_coach_shared::models::{Height, ReportedSymptom, TimeAvailability, Weight};
    use wellness_coach_shared::{
        ActivityLevel, AlertType, CreateHealthProfileRequest, Gender, HealthGoal, HeightUnit,
        Severity, WeightUnit,
    };

    fn profile() -> HealthProfile {
        let req = CreateHealthProfileRequest {
            age: 34,
            date_of_birth: NaiveDate::from_ymd_opt(1992, 3, 1).unwrap(),
            gender: Gender::Male,
            height: Height {
                value: 70.0,
                unit: HeightUnit::Inches,
            },
            weight: Weight {
                current: 180.0,
                unit: WeightUnit::Lbs,
                history: Vec::new(),
            },
            current_activity_level: ActivityLevel::Sedentary,
            primary_goal: HealthGoal::WeightLoss,
            secondary_goals: Vec::new(),
            time_availability: Some(TimeAvailability {
                daily_minutes: 45,
                ..Default::default()
            }),
            preferred_workout_types: vec!["walking".to_string()],
            available_equipment: Vec::new(),
            fitness_experience: None,
            dietary_restrictions: Vec::new(),
            nutrition_preferences: None,
            health_conditions: Vec::new(),
            medications: Vec::new(),
            injuries: Vec::new(),
            emergency_contacts: Vec::new(),
            data_sharing: None,
        };
        build_profile(Uuid::new_v4(), req, Utc::now())
    }

    fn accepted_user(profile: &HealthProfile) -> User {
        let mut user = User::new(profile.user_id, None, Utc::now());
        user.health_disclaimer_accepted = true;
        user
    }

    fn active_plan(weeks: i32) -> WellnessPlan {
        let profile = profile();
        let user = accepted_user(&profile);
        let request = agent_request(
            &user,
            &profile,
            &CreatePlanRequest {
                plan_name: None,
                plan_duration_weeks: Some(weeks),
            },
        );
        plan_from_agent(&profile, RiskLevel::Low, &request, AgentPlan::default(), Utc::now())
    }

    fn symptom(text: &str, severity: Severity) -> ReportedSymptom {
        ReportedSymptom {
            symptom: text.to_string(),
            severity,
            duration: None,
            related_to_exercise: Some(true),
        }
    }

    #[test]
    fn test_agent_request_maps_profile() {
        let profile = profile();
        let user = accepted_user(&profile);
        let request = agent_request(
            &user,
            &profile,
            &CreatePlanRequest {
                plan_name: None,
                plan_duration_weeks: Some(26),
            },
        );

        assert_eq!(request.plan_name, "weight_loss Plan");
        assert_eq!(request.primary_goal, "gentle_weight_loss");
        assert_eq!(request.current_activity_level, "sedentary");
        assert_eq!(request.time_availability_minutes, 45);
        assert_eq!(request.plan_duration_weeks, 12);
        assert_eq!(request.available_equipment, vec!["bodyweight".to_string()]);
        assert!(request.medical_clearance);
        assert!(request.health_disclaimer_acknowledged);
    }

    #[test]
    fn test_plan_from_agent_prefers_generated_values() {
        let profile = profile();
        let user = accepted_user(&profile);
        let request = agent_request(&user, &profile, &CreatePlanRequest::default());
        let generated: AgentPlan = serde_json::from_value(serde_json::json!({
            "plan_data": {"plan_name": "Walk It Off", "plan_duration_weeks": 6},
            "safety_information": {"safety_notes": ["Hydrate"]}
        }))
        .unwrap();

        let plan = plan_from_agent(&profile, RiskLevel::Moderate, &request, generated, Utc::now());
        assert_eq!(plan.plan_name, "Walk It Off");
        assert_eq!(plan.plan_duration_weeks, 6);
        assert_eq!(plan.status, PlanStatus::Active);
        assert_eq!(plan.current_week, 1);
        assert_eq!(plan.user_profile_snapshot.risk_level, RiskLevel::Moderate);
        assert_eq!(plan.disclaimers, vec![safety::safety_disclaimer().to_string()]);
        assert_eq!(plan.plan_description, "AI-generated gentle_weight_loss plan with safety considerations");
    }

    #[test]
    fn test_guidance_lists_urgent_user_flags() {
        let profile = profile();
        let mut user = accepted_user(&profile);
        user.add_safety_flag("user_reported_health_concern", FlagSeverity::High, "Knee swelling", Utc::now());

        let verdict = ProfileVerdict::evaluate(&profile);
        assert!(verdict.verdict.is_safe);
        assert!(user.requires_immediate_consultation());

        let guidance = consultation_guidance(&verdict, &user);
        assert_eq!(guidance.concerns, vec!["Knee swelling".to_string()]);
        assert_eq!(guidance.next_steps.len(), 4);
    }

    #[test]
    fn test_emergency_symptom_creates_progress_alert() {
        let plan = active_plan(4);
        let req = ProgressUpdateRequest {
            reported_symptoms: vec![
                symptom("mild soreness", Severity::Mild),
                symptom("chest pain during intervals", Severity::Severe),
            ],
            ..Default::default()
        };

        let alert = progress_alert(&plan, &req, Utc::now()).expect("alert");
        assert_eq!(alert.wellness_plan_id, Some(plan.id));
        assert_eq!(alert.alert_type, AlertType::ChestPain);
        assert_eq!(alert.severity, FlagSeverity::High);
        assert_eq!(alert.trigger_source, TriggerSource::ProgressTracking);
        assert_eq!(alert.symptoms, vec!["chest pain during intervals".to_string()]);
    }

    #[rstest]
    #[case(symptom("back pain", Severity::Moderate))]
    #[case(symptom("tired legs", Severity::Severe))]
    #[case(symptom("fainting spell", Severity::Mild))]
    fn test_non_emergency_progress_has_no_alert(#[case] reported: ReportedSymptom) {
        let plan = active_plan(4);
        let req = ProgressUpdateRequest {
            reported_symptoms: vec![reported],
            ..Default::default()
        };
        assert!(progress_alert(&plan, &req, Utc::now()).is_none());
    }

    #[test]
    fn test_progress_records_completes_plan() {
        let mut plan = active_plan(2);
        let req = ProgressUpdateRequest {
            current_week: Some(2),
            workout_completed: Some(true),
            health_metrics: wellness_coach_shared::models::HealthMetrics {
                energy_level: Some(2),
                ..Default::default()
            },
            ..Default::default()
        };

        let (entry, weekly) = progress_records(&plan, req, Utc::now());
        assert_eq!(entry.week, 2);
        assert_eq!(entry.day, 1);
        assert_eq!(weekly.workouts_completed, 1);
        assert!(entry.safety_flags.iter().any(|f| f.flag == "very_low_energy"));

        let completed = plan.record_progress(weekly, Utc::now()).unwrap();
        assert!(completed);
        assert_eq!(plan.status, PlanStatus::Completed);
        assert_eq!(plan.completion_percentage(), 100.0);
    }

    #[rstest]
    #[case(true, "Consult with your healthcare provider about the health concern")]
    #[case(false, "Take the time you need away from the plan")]
    fn test_pause_recommendations(#[case] health_related: bool, #[case] first: &str) {
        assert_eq!(pause_recommendations(health_related)[0], first);
    }

    #[test]
    fn test_resume_recommendations_for_long_pause() {
        assert_eq!(
            resume_recommendations(true)[0],
            "Consider starting gradually after the extended pause"
        );
        assert_eq!(resume_recommendations(false).len(), 4);
    }
}
