//! API request and response types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::enums::{
    lenient, ActivityLevel, AlertStatus, AlertType, DietaryRestriction, FlagSeverity, Gender,
    HealthGoal, HealthStatus, PlanStatus, RiskLevel, Severity, TriggerSource,
};
use crate::models::{
    DataSharing, EmergencyAlert, EmergencyContact, HealthCondition, HealthMetrics, HealthProfile,
    Height, Injury, Medication, NutritionPreferences, PlanFlag, ReportedSymptom, SafetyFlag,
    TimeAvailability, Weight, WellnessPlan,
};
use crate::safety::{lenient_restriction_tags, ProfileSafetyResult, RestrictionTag};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Shared Response Blocks
// ============================================================================

pub const FIND_DOCTOR_URL: &str = "https://www.ama-assn.org/go/freida";
pub const FIND_DIETITIAN_URL: &str = "https://www.eatright.org/find-a-nutrition-expert";
pub const FIND_FITNESS_PROFESSIONAL_URL: &str =
    "https://www.acsm.org/get-stay-certified/find-a-certified-professional";

/// Directories for finding a licensed professional
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfessionalResources {
    pub find_doctor: String,
    pub find_dietitian: String,
    pub find_fitness_professional: String,
}

impl Default for ProfessionalResources {
    fn default() -> Self {
        Self {
            find_doctor: FIND_DOCTOR_URL.to_string(),
            find_dietitian: FIND_DIETITIAN_URL.to_string(),
            find_fitness_professional: FIND_FITNESS_PROFESSIONAL_URL.to_string(),
        }
    }
}

/// Hotline numbers returned with every emergency response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyResources {
    pub emergency_services: String,
    pub poison_control: String,
    pub crisis_text_line: String,
    pub suicide_prevention: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyAssessment {
    pub risk_level: RiskLevel,
    pub is_safe: bool,
    pub professional_consultation_required: bool,
}

/// Body of a 403 when a professional has to clear the user first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationGuidance {
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
    pub professional_resources: ProfessionalResources,
}

// ============================================================================
// User and Disclaimer
// ============================================================================

/// Risk state and disclaimer status of the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub risk_level: RiskLevel,
    pub health_status: HealthStatus,
    pub requires_professional_consultation: bool,
    pub requires_immediate_consultation: bool,
    pub health_disclaimer_accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_disclaimer_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_risk_assessment: Option<DateTime<Utc>>,
    pub safety_flags: Vec<SafetyFlag>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AcceptDisclaimerRequest {
    pub accept_terms: bool,
    #[validate(length(min = 1, max = 20, message = "Disclaimer version is required"))]
    pub disclaimer_version: String,
    #[serde(default)]
    pub understand_limitations: Option<bool>,
    #[serde(default)]
    pub emergency_awareness: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisclaimerResponse {
    pub disclaimer_version: String,
    pub accepted_at: DateTime<Utc>,
    pub next_steps: Vec<String>,
    pub important_reminders: Vec<String>,
}

// ============================================================================
// Health Profile
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateHealthProfileRequest {
    pub age: i32,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub height: Height,
    pub weight: Weight,
    pub current_activity_level: ActivityLevel,
    pub primary_goal: HealthGoal,
    #[serde(default)]
    pub secondary_goals: Vec<HealthGoal>,
    #[serde(default)]
    pub time_availability: Option<TimeAvailability>,
    #[serde(default)]
    pub preferred_workout_types: Vec<String>,
    #[serde(default)]
    pub available_equipment: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "Fitness experience must not exceed 100 characters"))]
    pub fitness_experience: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<DietaryRestriction>,
    #[serde(default)]
    pub nutrition_preferences: Option<NutritionPreferences>,
    #[serde(default)]
    #[validate(length(max = 20, message = "Maximum 20 health conditions allowed"))]
    pub health_conditions: Vec<HealthCondition>,
    #[serde(default)]
    #[validate(length(max = 30, message = "Maximum 30 medications allowed"))]
    pub medications: Vec<Medication>,
    #[serde(default)]
    #[validate(length(max = 20, message = "Maximum 20 injuries allowed"))]
    pub injuries: Vec<Injury>,
    #[serde(default)]
    #[validate(length(max = 5, message = "Maximum 5 emergency contacts allowed"))]
    pub emergency_contacts: Vec<EmergencyContact>,
    #[serde(default)]
    pub data_sharing: Option<DataSharing>,
}

/// Partial profile update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateHealthProfileRequest {
    pub age: Option<i32>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub height: Option<Height>,
    pub weight: Option<Weight>,
    pub current_activity_level: Option<ActivityLevel>,
    pub primary_goal: Option<HealthGoal>,
    pub secondary_goals: Option<Vec<HealthGoal>>,
    pub time_availability: Option<TimeAvailability>,
    pub preferred_workout_types: Option<Vec<String>>,
    pub available_equipment: Option<Vec<String>>,
    #[validate(length(max = 100, message = "Fitness experience must not exceed 100 characters"))]
    pub fitness_experience: Option<String>,
    pub dietary_restrictions: Option<Vec<DietaryRestriction>>,
    pub nutrition_preferences: Option<NutritionPreferences>,
    #[validate(length(max = 20, message = "Maximum 20 health conditions allowed"))]
    pub health_conditions: Option<Vec<HealthCondition>>,
    #[validate(length(max = 30, message = "Maximum 30 medications allowed"))]
    pub medications: Option<Vec<Medication>>,
    #[validate(length(max = 20, message = "Maximum 20 injuries allowed"))]
    pub injuries: Option<Vec<Injury>>,
    #[validate(length(max = 5, message = "Maximum 5 emergency contacts allowed"))]
    pub emergency_contacts: Option<Vec<EmergencyContact>>,
    pub data_sharing: Option<DataSharing>,
}

impl UpdateHealthProfileRequest {
    /// Whether the update touches a field the safety verdict depends on
    pub fn changes_critical_fields(&self, profile: &HealthProfile) -> bool {
        self.age.is_some_and(|a| a != profile.age)
            || self.primary_goal.is_some_and(|g| g != profile.primary_goal)
            || self
                .health_conditions
                .as_ref()
                .is_some_and(|c| *c != profile.health_conditions)
            || self
                .medications
                .as_ref()
                .is_some_and(|m| *m != profile.medications)
            || self.injuries.as_ref().is_some_and(|i| *i != profile.injuries)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileResponse {
    pub profile_id: Uuid,
    pub completion_percentage: i32,
    pub safety_assessment: SafetyAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_concerns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    pub next_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_resources: Option<ProfessionalResources>,
    pub disclaimers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub data: HealthProfile,
    pub completion_percentage: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_assessment_date: Option<DateTime<Utc>>,
    pub health_reminders: Vec<String>,
}

/// Verdict re-run after a critical profile field changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyReassessment {
    pub risk_level: RiskLevel,
    pub is_safe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concerns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_required: Option<String>,
}

impl SafetyReassessment {
    pub fn from_verdict(verdict: &ProfileSafetyResult, risk_level: RiskLevel) -> Self {
        if verdict.is_safe {
            return Self {
                risk_level,
                is_safe: true,
                concerns: None,
                recommendations: None,
                action_required: None,
            };
        }
        Self {
            risk_level,
            is_safe: false,
            concerns: Some(verdict.concerns.clone()),
            recommendations: Some(verdict.recommendations.clone()),
            action_required: Some("professional_consultation".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileResponse {
    pub completion_percentage: i32,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_reassessment: Option<SafetyReassessment>,
}

// ============================================================================
// Health Concerns and Alerts
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HealthConcernRequest {
    #[validate(length(min = 1, max = 500, message = "Please describe your health concern"))]
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    #[validate(length(max = 10, message = "Maximum 10 symptoms allowed"))]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub related_to_exercise: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConcernResponse {
    pub emergency_detected: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub immediate_actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_resources: Option<EmergencyResources>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertResponse {
    pub id: Uuid,
    pub wellness_plan_id: Option<Uuid>,
    pub alert_type: AlertType,
    pub severity: FlagSeverity,
    pub description: String,
    pub symptoms: Vec<String>,
    pub trigger_source: TriggerSource,
    pub status: AlertStatus,
    pub follow_up_required: bool,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<EmergencyAlert> for AlertResponse {
    fn from(alert: EmergencyAlert) -> Self {
        Self {
            id: alert.id,
            wellness_plan_id: alert.wellness_plan_id,
            alert_type: alert.alert_type,
            severity: alert.severity,
            description: alert.description,
            symptoms: alert.symptoms,
            trigger_source: alert.trigger_source,
            status: alert.status,
            follow_up_required: alert.follow_up_required,
            resolution: alert.resolution,
            resolved_at: alert.resolved_at,
            created_at: alert.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResolveAlertRequest {
    #[validate(length(min = 1, max = 1000, message = "Resolution must be 1-1000 characters"))]
    pub resolution: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EscalateAlertRequest {
    #[validate(length(min = 1, max = 500, message = "Escalation reason must be 1-500 characters"))]
    pub reason: String,
}

// ============================================================================
// Wellness Plans
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 100, message = "Plan name must be 1-100 characters"))]
    pub plan_name: Option<String>,
    #[validate(range(min = 1, message = "Plan duration must be at least 1 week"))]
    pub plan_duration_weeks: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub plan_id: Uuid,
    pub plan_name: String,
    pub status: PlanStatus,
    pub duration_weeks: i32,
    pub current_week: i32,
    pub start_date: DateTime<Utc>,
}

impl From<&WellnessPlan> for PlanSummary {
    fn from(plan: &WellnessPlan) -> Self {
        Self {
            plan_id: plan.id,
            plan_name: plan.plan_name.clone(),
            status: plan.status,
            duration_weeks: plan.plan_duration_weeks,
            current_week: plan.current_week,
            start_date: plan.plan_start_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyInformation {
    pub risk_level: RiskLevel,
    pub safety_notes: Vec<String>,
    pub disclaimers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlanResponse {
    pub plan_id: Uuid,
    pub plan_summary: PlanSummary,
    pub safety_information: SafetyInformation,
    pub next_steps: Vec<String>,
    pub emergency_resources: EmergencyResources,
}

/// The agent service asked for a professional consultation instead of a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationRecommendedResponse {
    pub consultation_required: bool,
    pub message: String,
    pub recommendations: Vec<String>,
    pub professional_resources: ProfessionalResources,
    pub emergency_resources: EmergencyResources,
}

/// Result of a plan creation request that did not fail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanCreation {
    Created(CreatePlanResponse),
    ConsultationRecommended(ConsultationRecommendedResponse),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanListItem {
    #[serde(flatten)]
    pub summary: PlanSummary,
    pub completion_percentage: f64,
    pub is_active: bool,
    pub requires_attention: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanListResponse {
    pub plans: Vec<PlanListItem>,
    pub total_plans: usize,
    pub active_plans: usize,
    pub health_reminders: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDetailResponse {
    pub plan: WellnessPlan,
    pub completion_percentage: f64,
    pub requires_attention: bool,
    pub days_remaining: i32,
    pub safety_status: String,
    pub safety_reminders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgent_attention_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_flags: Option<Vec<PlanFlag>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProgressUpdateRequest {
    #[validate(range(min = 1, max = 52, message = "Week must be between 1 and 52"))]
    pub current_week: Option<i32>,
    #[validate(range(min = 1, max = 7, message = "Day must be between 1 and 7"))]
    pub current_day: Option<i32>,
    pub workout_completed: Option<bool>,
    #[validate(range(min = 0, max = 21, message = "Workouts completed must be between 0 and 21"))]
    pub workouts_completed: Option<i32>,
    #[serde(default)]
    pub health_metrics: HealthMetrics,
    #[serde(default)]
    #[validate(length(max = 10, message = "Maximum 10 symptoms allowed"))]
    pub reported_symptoms: Vec<ReportedSymptom>,
    #[validate(length(max = 1000, message = "Notes must not exceed 1000 characters"))]
    pub notes: Option<String>,
    #[validate(length(max = 500, message = "Concerns must not exceed 500 characters"))]
    pub concerns: Option<String>,
}

/// Progress submission that contained emergency symptoms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEmergencyResponse {
    pub plan_paused: bool,
    pub emergency_alert_created: bool,
    pub alert_id: Uuid,
    pub message: String,
    pub immediate_actions: Vec<String>,
    pub emergency_resources: EmergencyResources,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecordedResponse {
    pub current_week: i32,
    pub total_weeks: i32,
    pub completion_percentage: f64,
    pub plan_status: PlanStatus,
    pub safety_flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub congratulations: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgressUpdateResponse {
    Emergency(ProgressEmergencyResponse),
    Recorded(ProgressRecordedResponse),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PauseRequest {
    #[validate(length(max = 200, message = "Reason must not exceed 200 characters"))]
    pub reason: Option<String>,
    #[validate(length(max = 50, message = "Duration description too long"))]
    pub expected_duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseResponse {
    pub plan_status: PlanStatus,
    pub paused_at: Option<DateTime<Utc>>,
    pub health_related: bool,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ResumeRequest {
    #[serde(default)]
    pub health_concern_resolved: bool,
    #[validate(length(max = 200, message = "Notes must not exceed 200 characters"))]
    pub resume_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeResponse {
    pub plan_status: PlanStatus,
    pub current_week: i32,
    pub weeks_remaining: i32,
    pub pause_days: i64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub recommendations: Vec<String>,
    pub safety_reminders: Vec<String>,
}

// ============================================================================
// Stateless Safety Checks
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SymptomsCheckRequest {
    #[validate(length(max = 20, message = "Maximum 20 symptoms per check"))]
    pub symptoms: Vec<String>,
}

/// Optional fields that fail to parse are treated as absent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieCheckRequest {
    pub calories: i32,
    #[serde(default, deserialize_with = "lenient")]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub goal: Option<HealthGoal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutCheckRequest {
    pub minutes: i32,
    #[serde(default, deserialize_with = "lenient")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default, deserialize_with = "lenient")]
    pub age: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietaryCheckRequest {
    #[serde(default, deserialize_with = "lenient_restriction_tags")]
    pub restrictions: Vec<RestrictionTag>,
    #[serde(default, deserialize_with = "lenient")]
    pub goal: Option<HealthGoal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisclaimersResponse {
    pub general: String,
    pub exercise: String,
    pub nutrition: String,
}
