//! Data models for the Wellness Coach application

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{
    ActivityLevel, AlertStatus, AlertType, DietaryRestriction, FlagSeverity, Gender, HealthGoal,
    HealthStatus, InjuryStatus, PlanStatus, RiskLevel, Severity, TriggerSource,
};
use crate::errors::DomainError;
use crate::safety;
use crate::units::{self, HeightUnit, WeightUnit};

/// Days until the next recommended assessment when consultation is needed
pub const ASSESSMENT_INTERVAL_CONSULTATION_DAYS: i64 = 30;
/// Days until the next recommended assessment otherwise
pub const ASSESSMENT_INTERVAL_ROUTINE_DAYS: i64 = 180;
/// Pauses longer than this trigger a plan review recommendation
pub const LONG_PAUSE_DAYS: i64 = 30;

// ============================================================================
// Health Profile
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Height {
    pub value: f64,
    #[serde(default)]
    pub unit: HeightUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightHistoryEntry {
    pub weight: f64,
    pub recorded_at: DateTime<Utc>,
    #[serde(default = "default_weight_source")]
    pub source: String,
}

fn default_weight_source() -> String {
    "user_input".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Weight {
    pub current: f64,
    #[serde(default)]
    pub unit: WeightUnit,
    #[serde(default)]
    pub history: Vec<WeightHistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TimeAvailability {
    pub daily_minutes: i32,
    #[serde(default)]
    pub preferred_times: Vec<String>,
    #[serde(default)]
    pub available_days: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NutritionPreferences {
    #[serde(default)]
    pub meals_per_day: Option<i32>,
    #[serde(default)]
    pub snacks_per_day: Option<i32>,
    #[serde(default)]
    pub cooking_experience: Option<String>,
}

/// A diagnosed health condition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthCondition {
    pub condition: String,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub diagnosed_date: Option<NaiveDate>,
    #[serde(default)]
    pub current_treatment: Option<String>,
    #[serde(default)]
    pub affects_exercise: bool,
    #[serde(default)]
    pub affects_nutrition: bool,
    #[serde(default)]
    pub requires_monitoring: bool,
}

fn default_severity() -> Severity {
    Severity::Moderate
}

impl HealthCondition {
    pub fn named(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            severity: Severity::Moderate,
            diagnosed_date: None,
            current_treatment: None,
            affects_exercise: false,
            affects_nutrition: false,
            requires_monitoring: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub affects_exercise: bool,
    #[serde(default)]
    pub affects_nutrition: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Injury {
    pub injury: String,
    #[serde(default = "default_injury_status")]
    pub status: InjuryStatus,
    #[serde(default)]
    pub affected_areas: Vec<String>,
}

fn default_injury_status() -> InjuryStatus {
    InjuryStatus::Healing
}

/// Risk factor derived from an unsafe profile verdict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskFactor {
    pub factor: String,
    pub severity: FlagSeverity,
    #[serde(default)]
    pub requires_professional_consultation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataSharing {
    #[serde(default = "default_true")]
    pub allow_emergency_access: bool,
    #[serde(default)]
    pub allow_research_participation: bool,
    #[serde(default)]
    pub share_with_healthcare_providers: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DataSharing {
    fn default() -> Self {
        Self {
            allow_emergency_access: true,
            allow_research_participation: false,
            share_with_healthcare_providers: false,
        }
    }
}

/// One health profile per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: i32,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub height: Height,
    pub weight: Weight,
    pub current_activity_level: ActivityLevel,
    pub primary_goal: HealthGoal,
    pub secondary_goals: Vec<HealthGoal>,
    pub time_availability: TimeAvailability,
    pub preferred_workout_types: Vec<String>,
    pub available_equipment: Vec<String>,
    pub fitness_experience: Option<String>,
    pub dietary_restrictions: Vec<DietaryRestriction>,
    pub nutrition_preferences: NutritionPreferences,
    pub health_conditions: Vec<HealthCondition>,
    pub medications: Vec<Medication>,
    pub injuries: Vec<Injury>,
    pub risk_factors: Vec<RiskFactor>,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub data_sharing: DataSharing,
    pub medical_clearance_required: bool,
    pub next_recommended_assessment: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HealthProfile {
    const COMPLETION_FIELDS: u32 = 15;

    /// Share of the 15 tracked profile fields that are filled in
    ///
    /// List-valued medical fields count as answered even when empty, since
    /// "none" is a valid answer.
    pub fn completion_percentage(&self) -> i32 {
        let checks = [
            self.age > 0,
            self.height.value > 0.0,
            self.weight.current > 0.0,
            true, // activity level
            true, // primary goal
            self.time_availability.daily_minutes > 0,
            !self.preferred_workout_types.is_empty(),
            self.fitness_experience.is_some(),
            true, // dietary restrictions
            self.nutrition_preferences.meals_per_day.is_some(),
            true, // health conditions
            true, // medications
            true, // injuries
            true, // data sharing
            !self.emergency_contacts.is_empty(),
        ];
        let completed = checks.iter().filter(|c| **c).count() as f64;
        ((completed / Self::COMPLETION_FIELDS as f64) * 100.0).round() as i32
    }

    /// Whether this profile should be reviewed by a professional
    pub fn requires_professional_consultation(&self) -> bool {
        if self.age < 16 || self.age > 65 {
            return true;
        }
        if self.health_conditions.iter().any(|c| c.requires_monitoring) {
            return true;
        }
        if self.risk_factors.iter().any(|f| f.severity.is_urgent()) {
            return true;
        }
        if self
            .medications
            .iter()
            .any(|m| m.affects_exercise || m.affects_nutrition)
        {
            return true;
        }
        self.injuries.iter().any(|i| {
            matches!(i.status, InjuryStatus::Healing | InjuryStatus::RequiresTherapy)
        })
    }

    /// Next assessment date: 30 days out when consultation is needed, else 180
    pub fn next_assessment_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = if self.requires_professional_consultation() {
            ASSESSMENT_INTERVAL_CONSULTATION_DAYS
        } else {
            ASSESSMENT_INTERVAL_ROUTINE_DAYS
        };
        now + Duration::days(days)
    }

    pub fn bmi(&self) -> Option<f64> {
        if self.weight.current <= 0.0 {
            return None;
        }
        units::bmi(
            self.height.value,
            self.height.unit,
            self.weight.current,
            self.weight.unit,
        )
    }

    /// Record a new current weight, moving the previous one into history
    ///
    /// Returns false when the weight did not change.
    pub fn record_weight(&mut self, weight: f64, now: DateTime<Utc>) -> bool {
        if (weight - self.weight.current).abs() < f64::EPSILON {
            return false;
        }
        self.weight.history.push(WeightHistoryEntry {
            weight: self.weight.current,
            recorded_at: now,
            source: default_weight_source(),
        });
        self.weight.current = weight;
        true
    }

    /// Recompute the derived fields after any change
    pub fn refresh_derived(&mut self, now: DateTime<Utc>) {
        self.next_recommended_assessment = Some(self.next_assessment_from(now));
        self.updated_at = now;
    }
}

// ============================================================================
// User Risk State
// ============================================================================

/// A safety flag recorded against a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyFlag {
    pub flag: String,
    pub severity: FlagSeverity,
    pub description: String,
    pub flagged_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved: bool,
}

/// Account record as seen by the wellness service
///
/// Identity comes from the bearer token; the row itself only carries the
/// risk state and disclaimer acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub risk_level: RiskLevel,
    pub health_status: HealthStatus,
    pub requires_professional_consultation: bool,
    pub safety_flags: Vec<SafetyFlag>,
    pub health_disclaimer_accepted: bool,
    pub health_disclaimer_version: Option<String>,
    pub health_disclaimer_accepted_at: Option<DateTime<Utc>>,
    pub last_risk_assessment: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Uuid, email: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            risk_level: RiskLevel::Low,
            health_status: HealthStatus::ProfileIncomplete,
            requires_professional_consultation: false,
            safety_flags: Vec::new(),
            health_disclaimer_accepted: false,
            health_disclaimer_version: None,
            health_disclaimer_accepted_at: None,
            last_risk_assessment: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Consultation gate applied before any AI plan is generated
    pub fn requires_immediate_consultation(&self) -> bool {
        self.risk_level.is_elevated()
            || self
                .safety_flags
                .iter()
                .any(|f| !f.resolved && f.severity.is_urgent())
    }

    /// Append a flag, escalating the risk level for urgent severities
    pub fn add_safety_flag(
        &mut self,
        flag: impl Into<String>,
        severity: FlagSeverity,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.safety_flags.push(SafetyFlag {
            flag: flag.into(),
            severity,
            description: description.into(),
            flagged_at: now,
            resolved: false,
        });

        match severity {
            FlagSeverity::Critical => self.risk_level = RiskLevel::VeryHigh,
            FlagSeverity::High if self.risk_level == RiskLevel::Low => {
                self.risk_level = RiskLevel::High
            }
            _ => {}
        }
        self.updated_at = now;
    }

    pub fn unresolved_flags(&self) -> impl Iterator<Item = &SafetyFlag> {
        self.safety_flags.iter().filter(|f| !f.resolved)
    }

    /// Flags appended after the list held `before` entries
    pub fn flags_since(&self, before: usize) -> &[SafetyFlag] {
        self.safety_flags.get(before..).unwrap_or(&[])
    }
}

// ============================================================================
// Wellness Plan
// ============================================================================

/// Denormalized copy of profile fields at plan creation time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileSnapshot {
    pub age: i32,
    pub primary_goal: HealthGoal,
    pub current_activity_level: ActivityLevel,
    pub time_availability_minutes: i32,
    pub risk_level: RiskLevel,
}

impl ProfileSnapshot {
    pub fn capture(profile: &HealthProfile, risk_level: RiskLevel) -> Self {
        Self {
            age: profile.age,
            primary_goal: profile.primary_goal,
            current_activity_level: profile.current_activity_level,
            time_availability_minutes: profile.time_availability.daily_minutes,
            risk_level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthAnalysis {
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub primary_safety_concerns: Vec<String>,
    #[serde(default = "default_true")]
    pub proceed_with_ai_plan: bool,
}

impl Default for HealthAnalysis {
    fn default() -> Self {
        Self {
            risk_level: RiskLevel::Low,
            primary_safety_concerns: Vec::new(),
            proceed_with_ai_plan: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanFlag {
    pub flag: String,
    pub severity: FlagSeverity,
    pub description: String,
    pub flagged_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub action_taken: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanModification {
    pub modified_at: DateTime<Utc>,
    pub modified_by: String,
    pub modification_type: String,
    pub description: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyProgress {
    pub week: i32,
    pub workouts_completed: i32,
    pub energy_level: Option<i32>,
    pub notes: String,
    pub concerns_reported: Vec<String>,
    pub week_completed_at: DateTime<Utc>,
}

/// Result of resuming a paused plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeOutcome {
    pub pause_days: i64,
    pub long_pause: bool,
}

pub const HEALTH_PAUSE_FLAG: &str = "health_related_pause";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellnessPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_name: String,
    pub plan_description: String,
    pub status: PlanStatus,
    pub plan_duration_weeks: i32,
    pub current_week: i32,
    pub user_profile_snapshot: ProfileSnapshot,
    pub health_analysis: HealthAnalysis,
    /// Workout and meal plan exactly as generated by the agent service
    pub plan_data: serde_json::Value,
    pub safety_notes: Vec<String>,
    pub disclaimers: Vec<String>,
    pub emergency_flags: Vec<PlanFlag>,
    pub weekly_progress: Vec<WeeklyProgress>,
    pub total_workouts_completed: i32,
    pub modification_history: Vec<PlanModification>,
    pub plan_start_date: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    pub resumed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WellnessPlan {
    pub fn completion_percentage(&self) -> f64 {
        if self.plan_duration_weeks <= 0 {
            return 0.0;
        }
        (self.current_week as f64 / self.plan_duration_weeks as f64 * 100.0).min(100.0)
    }

    pub fn days_remaining(&self) -> i32 {
        (self.plan_duration_weeks * 7 - (self.current_week - 1) * 7).max(0)
    }

    pub fn weeks_remaining(&self) -> i32 {
        self.plan_duration_weeks - self.current_week + 1
    }

    /// Unresolved high or critical flag, or a very high risk analysis
    pub fn requires_immediate_attention(&self) -> bool {
        self.unresolved_flags().any(|f| f.severity.is_urgent())
            || self.health_analysis.risk_level == RiskLevel::VeryHigh
    }

    pub fn unresolved_flags(&self) -> impl Iterator<Item = &PlanFlag> {
        self.emergency_flags.iter().filter(|f| !f.resolved)
    }

    /// Record an emergency flag; critical flags send the plan to review
    pub fn add_emergency_flag(
        &mut self,
        flag: impl Into<String>,
        severity: FlagSeverity,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.emergency_flags.push(PlanFlag {
            flag: flag.into(),
            severity,
            description: description.into(),
            flagged_at: now,
            resolved: false,
            resolved_at: None,
            action_taken: None,
        });
        if severity == FlagSeverity::Critical {
            self.status = PlanStatus::RequiresReview;
            self.paused_at = Some(now);
        }
        self.updated_at = now;
    }

    /// Move the plan to review after emergency symptoms were reported
    pub fn hold_for_review(&mut self, now: DateTime<Utc>) {
        self.status = PlanStatus::RequiresReview;
        self.paused_at = Some(now);
        self.add_emergency_flag(
            "severe_symptoms_reported",
            FlagSeverity::High,
            "User reported concerning symptoms during progress update",
            now,
        );
    }

    fn ensure_status(&self, expected: PlanStatus, action: &'static str) -> Result<(), DomainError> {
        if self.status != expected {
            return Err(DomainError::InvalidPlanState {
                action,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Pause an active plan; returns whether the reason is health related
    pub fn pause(&mut self, reason: Option<&str>, now: DateTime<Utc>) -> Result<bool, DomainError> {
        self.ensure_status(PlanStatus::Active, "pause")?;

        let health_related = reason.is_some_and(safety::is_health_related_pause);
        self.status = PlanStatus::Paused;
        self.paused_at = Some(now);
        self.modification_history.push(PlanModification {
            modified_at: now,
            modified_by: "user_request".to_string(),
            modification_type: "safety_modification".to_string(),
            description: format!(
                "Plan paused by user: {}",
                reason.unwrap_or("No reason provided")
            ),
            reason: reason.unwrap_or("User requested pause").to_string(),
        });

        if health_related {
            self.emergency_flags.push(PlanFlag {
                flag: HEALTH_PAUSE_FLAG.to_string(),
                severity: FlagSeverity::Moderate,
                description: format!(
                    "Plan paused due to health concern: {}",
                    reason.unwrap_or_default()
                ),
                flagged_at: now,
                resolved: false,
                resolved_at: None,
                action_taken: None,
            });
        }
        self.updated_at = now;
        Ok(health_related)
    }

    pub fn has_unresolved_health_pause(&self) -> bool {
        self.unresolved_flags().any(|f| f.flag == HEALTH_PAUSE_FLAG)
    }

    /// Resume a paused plan
    ///
    /// A plan paused for a health reason only resumes once the user
    /// confirms the concern was addressed; the confirmation resolves the
    /// pause flags.
    pub fn resume(
        &mut self,
        health_concern_resolved: bool,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ResumeOutcome, DomainError> {
        self.ensure_status(PlanStatus::Paused, "resume")?;

        let had_health_flags = self.has_unresolved_health_pause();
        if had_health_flags && !health_concern_resolved {
            return Err(DomainError::HealthConcernUnresolved);
        }

        let pause_days = self
            .paused_at
            .map(|p| (now - p).num_days())
            .unwrap_or_default();
        let long_pause = self
            .paused_at
            .is_some_and(|p| now - p > Duration::days(LONG_PAUSE_DAYS));

        self.status = PlanStatus::Active;
        self.resumed_at = Some(now);
        self.last_accessed_at = Some(now);

        if had_health_flags {
            for flag in self
                .emergency_flags
                .iter_mut()
                .filter(|f| f.flag == HEALTH_PAUSE_FLAG && !f.resolved)
            {
                flag.resolved = true;
                flag.resolved_at = Some(now);
                flag.action_taken = Some("User confirmed health concern resolved".to_string());
            }
        }

        self.modification_history.push(PlanModification {
            modified_at: now,
            modified_by: "user_request".to_string(),
            modification_type: "safety_modification".to_string(),
            description: "Plan resumed by user".to_string(),
            reason: notes.unwrap_or("User requested resume").to_string(),
        });
        self.updated_at = now;

        Ok(ResumeOutcome {
            pause_days,
            long_pause,
        })
    }

    /// Fold a weekly summary into the plan and complete it at the last week
    ///
    /// Returns true when this update completed the plan.
    pub fn record_progress(
        &mut self,
        progress: WeeklyProgress,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.ensure_status(PlanStatus::Active, "update progress for")?;

        let week = progress.week.clamp(1, self.plan_duration_weeks.max(1));
        self.current_week = week;
        self.last_accessed_at = Some(now);
        self.total_workouts_completed += progress.workouts_completed;

        let progress = WeeklyProgress { week, ..progress };
        match self.weekly_progress.iter_mut().find(|wp| wp.week == week) {
            Some(existing) => *existing = progress,
            None => self.weekly_progress.push(progress),
        }

        let completed = self.current_week >= self.plan_duration_weeks;
        if completed {
            self.status = PlanStatus::Completed;
            self.completed_at = Some(now);
        }
        self.updated_at = now;
        Ok(completed)
    }
}

// ============================================================================
// Progress Tracking
// ============================================================================

/// Self-reported wellbeing scores for one progress entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HealthMetrics {
    /// 1-5
    #[serde(default)]
    pub energy_level: Option<i32>,
    /// 0-24
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    /// 1-5
    #[serde(default)]
    pub sleep_quality: Option<i32>,
    /// 1-5
    #[serde(default)]
    pub stress_level: Option<i32>,
    /// 1-5
    #[serde(default)]
    pub mood: Option<i32>,
    /// 0-10
    #[serde(default)]
    pub pain_level: Option<i32>,
    #[serde(default)]
    pub pain_locations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportedSymptom {
    pub symptom: String,
    pub severity: Severity,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub related_to_exercise: Option<bool>,
}

impl ReportedSymptom {
    /// Severe symptoms and anything mentioning pain get an emergency scan
    pub fn is_concerning(&self) -> bool {
        self.severity == Severity::Severe || self.symptom.to_lowercase().contains("pain")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressFlag {
    pub flag: String,
    pub severity: FlagSeverity,
    pub auto_detected: bool,
    pub requires_attention: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wellness_plan_id: Uuid,
    pub week: i32,
    pub day: i32,
    pub workout_completed: Option<bool>,
    pub health_metrics: HealthMetrics,
    pub reported_symptoms: Vec<ReportedSymptom>,
    pub notes: String,
    pub concerns: String,
    pub safety_flags: Vec<ProgressFlag>,
    pub entry_date: DateTime<Utc>,
}

impl ProgressEntry {
    /// Attach the automatically detected concerns as moderate flags
    pub fn apply_safety_concerns(&mut self) {
        self.safety_flags = safety::check_progress_concerns(
            &self.health_metrics,
            &self.reported_symptoms,
        )
        .into_iter()
        .map(|concern| ProgressFlag {
            flag: concern.as_str().to_string(),
            severity: FlagSeverity::Moderate,
            auto_detected: true,
            requires_attention: true,
        })
        .collect();
    }
}

// ============================================================================
// Emergency Alerts
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseAction {
    pub action: String,
    pub performed_by: String,
    pub performed_at: DateTime<Utc>,
    pub result: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyAlert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wellness_plan_id: Option<Uuid>,
    pub alert_type: AlertType,
    pub severity: FlagSeverity,
    pub description: String,
    pub symptoms: Vec<String>,
    pub trigger_source: TriggerSource,
    pub status: AlertStatus,
    pub response_actions: Vec<ResponseAction>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution: Option<String>,
    pub follow_up_required: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmergencyAlert {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        wellness_plan_id: Option<Uuid>,
        alert_type: AlertType,
        severity: FlagSeverity,
        description: impl Into<String>,
        symptoms: Vec<String>,
        trigger_source: TriggerSource,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            wellness_plan_id,
            alert_type,
            severity,
            description: description.into(),
            symptoms,
            trigger_source,
            status: AlertStatus::New,
            response_actions: Vec::new(),
            resolved_at: None,
            resolution: None,
            follow_up_required: severity.is_urgent(),
            created_at: now,
            updated_at: now,
        }
    }

    fn transition(&mut self, next: AlertStatus, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidAlertTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    pub fn acknowledge(&mut self, performed_by: &str, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(AlertStatus::Acknowledged, now)?;
        self.response_actions.push(ResponseAction {
            action: "alert_acknowledged".to_string(),
            performed_by: performed_by.to_string(),
            performed_at: now,
            result: None,
            notes: None,
        });
        Ok(())
    }

    pub fn resolve(
        &mut self,
        resolution: impl Into<String>,
        performed_by: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.transition(AlertStatus::Resolved, now)?;
        let resolution = resolution.into();
        self.resolved_at = Some(now);
        self.response_actions.push(ResponseAction {
            action: "alert_resolved".to_string(),
            performed_by: performed_by.to_string(),
            performed_at: now,
            result: Some("resolved".to_string()),
            notes: Some(resolution.clone()),
        });
        self.resolution = Some(resolution);
        Ok(())
    }

    pub fn escalate(&mut self, reason: impl Into<String>, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(AlertStatus::Escalated, now)?;
        self.follow_up_required = true;
        self.response_actions.push(ResponseAction {
            action: "alert_escalated".to_string(),
            performed_by: "system".to_string(),
            performed_at: now,
            result: Some("escalated_to_emergency_services".to_string()),
            notes: Some(reason.into()),
        });
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_completion_percentage_minimal_profile() {
        // 11 of 15 fields are always answered by a valid profile
        assert_eq!(profile(30).completion_percentage(), 73);
    }

    #[test]
    fn test_completion_percentage_full_profile() {
        let mut p = profile(30);
        p.preferred_workout_types = vec!["walking".to_string()];
        p.fitness_experience = Some("beginner".to_string());
        p.nutrition_preferences.meals_per_day = Some(3);
        p.emergency_contacts.push(EmergencyContact {
            name: "Sam".to_string(),
            relationship: "sibling".to_string(),
            phone: "555-0100".to_string(),
        });
        assert_eq!(p.completion_percentage(), 100);
    }

    #[test]
    fn test_professional_consultation_rules() {
        assert!(!profile(30).requires_professional_consultation());
        assert!(profile(15).requires_professional_consultation());
        assert!(profile(66).requires_professional_consultation());

        let mut p = profile(30);
        p.injuries.push(Injury {
            injury: "sprained ankle".to_string(),
            status: InjuryStatus::Healing,
            affected_areas: Vec::new(),
        });
        assert!(p.requires_professional_consultation());

        let mut p = profile(30);
        p.injuries.push(Injury {
            injury: "old fracture".to_string(),
            status: InjuryStatus::Recovered,
            affected_areas: Vec::new(),
        });
        assert!(!p.requires_professional_consultation());

        let mut p = profile(30);
        p.medications.push(Medication {
            name: "beta blocker".to_string(),
            dosage: None,
            frequency: None,
            affects_exercise: true,
            affects_nutrition: false,
        });
        assert!(p.requires_professional_consultation());
    }

    #[test]
    fn test_next_assessment_interval() {
        let now = Utc::now();
        assert_eq!(profile(30).next_assessment_from(now), now + Duration::days(180));
        assert_eq!(profile(70).next_assessment_from(now), now + Duration::days(30));
    }

    #[test]
    fn test_record_weight_appends_history() {
        let mut p = profile(30);
        let now = Utc::now();
        assert!(!p.record_weight(170.0, now));
        assert!(p.record_weight(165.0, now));
        assert_eq!(p.weight.current, 165.0);
        assert_eq!(p.weight.history.len(), 1);
        assert_eq!(p.weight.history[0].weight, 170.0);
    }

    #[test]
    fn test_profile_bmi() {
        let bmi = profile(30).bmi().unwrap();
        assert!((bmi - 24.4).abs() < 1e-9);
    }

    #[test]
    fn test_user_flag_escalation() {
        let now = Utc::now();
        let mut user = User::new(Uuid::new_v4(), None, now);
        assert!(!user.requires_immediate_consultation());

        user.add_safety_flag("concern", FlagSeverity::Moderate, "minor", now);
        assert_eq!(user.risk_level, RiskLevel::Low);
        assert!(!user.requires_immediate_consultation());

        user.add_safety_flag("concern", FlagSeverity::High, "worse", now);
        assert_eq!(user.risk_level, RiskLevel::High);
        assert!(user.requires_immediate_consultation());

        user.add_safety_flag("concern", FlagSeverity::Critical, "urgent", now);
        assert_eq!(user.risk_level, RiskLevel::VeryHigh);
    }

    #[test]
    fn test_high_flag_does_not_lower_risk() {
        let now = Utc::now();
        let mut user = User::new(Uuid::new_v4(), None, now);
        user.risk_level = RiskLevel::Moderate;
        user.add_safety_flag("concern", FlagSeverity::High, "worse", now);
        assert_eq!(user.risk_level, RiskLevel::Moderate);
        // The unresolved high flag still gates plan creation
        assert!(user.requires_immediate_consultation());
    }

    #[test]
    fn test_flags_since_returns_only_new_flags() {
        let now = Utc::now();
        let mut user = User::new(Uuid::new_v4(), None, now);
        user.add_safety_flag("earlier", FlagSeverity::Moderate, "stored", now);

        let before = user.safety_flags.len();
        assert!(user.flags_since(before).is_empty());

        user.add_safety_flag("wellness_plan_health_pause", FlagSeverity::Moderate, "ankle", now);
        let added = user.flags_since(before);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].flag, "wellness_plan_health_pause");
        assert!(user.flags_since(10).is_empty());
    }

    #[test]
    fn test_plan_completion_and_attention() {
        let mut plan = active_plan(4);
        assert_eq!(plan.completion_percentage(), 25.0);
        assert_eq!(plan.days_remaining(), 28);
        assert!(!plan.requires_immediate_attention());

        plan.add_emergency_flag("fall", FlagSeverity::High, "fell", Utc::now());
        assert!(plan.requires_immediate_attention());
        assert_eq!(plan.status, PlanStatus::Active);

        plan.add_emergency_flag("collapse", FlagSeverity::Critical, "collapsed", Utc::now());
        assert_eq!(plan.status, PlanStatus::RequiresReview);
        assert!(plan.paused_at.is_some());
    }

    #[test]
    fn test_pause_and_resume_health_related() {
        let mut plan = active_plan(4);
        let now = Utc::now();
        let health = plan.pause(Some("Knee injury flared up"), now).unwrap();
        assert!(health);
        assert_eq!(plan.status, PlanStatus::Paused);
        assert!(plan.has_unresolved_health_pause());

        let err = plan.resume(false, None, now).unwrap_err();
        assert_eq!(err, DomainError::HealthConcernUnresolved);
        assert_eq!(plan.status, PlanStatus::Paused);

        let outcome = plan.resume(true, Some("cleared by doctor"), now).unwrap();
        assert!(!outcome.long_pause);
        assert_eq!(plan.status, PlanStatus::Active);
        assert!(!plan.has_unresolved_health_pause());
        assert_eq!(plan.modification_history.len(), 2);
    }

    #[test]
    fn test_pause_requires_active_plan() {
        let mut plan = active_plan(4);
        plan.status = PlanStatus::Completed;
        let err = plan.pause(Some("vacation"), Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "Cannot pause completed plan");
    }

    #[test]
    fn test_resume_after_long_pause() {
        let mut plan = active_plan(4);
        let paused = Utc::now() - Duration::days(45);
        assert!(!plan.pause(Some("vacation"), paused).unwrap());
        let outcome = plan.resume(false, None, Utc::now()).unwrap();
        assert!(outcome.long_pause);
        assert_eq!(outcome.pause_days, 45);
    }

    #[test]
    fn test_record_progress_completes_plan() {
        let mut plan = active_plan(2);
        assert!(!plan.record_progress(weekly(1), Utc::now()).unwrap());
        assert_eq!(plan.status, PlanStatus::Active);
        // Replacing an existing week does not duplicate it
        assert!(!plan.record_progress(weekly(1), Utc::now()).unwrap());
        assert_eq!(plan.weekly_progress.len(), 1);

        assert!(plan.record_progress(weekly(5), Utc::now()).unwrap());
        assert_eq!(plan.current_week, 2);
        assert_eq!(plan.status, PlanStatus::Completed);
        assert!(plan.completed_at.is_some());
        assert_eq!(plan.total_workouts_completed, 3);
    }

    #[test]
    fn test_alert_lifecycle() {
        let now = Utc::now();
        let mut alert = EmergencyAlert::new(
            Uuid::new_v4(),
            None,
            AlertType::ChestPain,
            FlagSeverity::Critical,
            "chest pain while running",
            vec!["chest pain while running".to_string()],
            TriggerSource::UserReport,
            now,
        );
        assert_eq!(alert.status, AlertStatus::New);
        assert!(alert.follow_up_required);

        alert.acknowledge("user", now).unwrap();
        alert.resolve("Seen by physician", "user", now).unwrap();
        assert_eq!(alert.status, AlertStatus::Resolved);
        assert_eq!(alert.resolution.as_deref(), Some("Seen by physician"));

        let err = alert.escalate("late", now).unwrap_err();
        assert!(matches!(err, DomainError::InvalidAlertTransition { .. }));
        assert_eq!(alert.response_actions.len(), 2);
    }

    #[test]
    fn test_progress_entry_flags() {
        let mut entry = ProgressEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            wellness_plan_id: Uuid::new_v4(),
            week: 1,
            day: 1,
            workout_completed: Some(true),
            health_metrics: HealthMetrics {
                energy_level: Some(1),
                pain_level: Some(8),
                ..Default::default()
            },
            reported_symptoms: Vec::new(),
            notes: String::new(),
            concerns: String::new(),
            safety_flags: Vec::new(),
            entry_date: Utc::now(),
        };
        entry.apply_safety_concerns();
        let flags: Vec<_> = entry.safety_flags.iter().map(|f| f.flag.as_str()).collect();
        assert_eq!(flags, vec!["very_low_energy", "high_pain_level"]);
        assert!(entry.safety_flags.iter().all(|f| f.auto_detected));
    }

    #[test]
    fn test_concerning_symptom() {
        let pain = ReportedSymptom {
            symptom: "Lower back pain".to_string(),
            severity: Severity::Mild,
            duration: None,
            related_to_exercise: None,
        };
        assert!(pain.is_concerning());
        let tired = ReportedSymptom {
            symptom: "tired".to_string(),
            severity: Severity::Moderate,
            duration: None,
            related_to_exercise: None,
        };
        assert!(!tired.is_concerning());
    }
}
