//! Domain vocabularies
//!
//! Every enum serializes to the same snake_case token that is stored in
//! the database and exchanged over the API.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::fmt;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Parse a snake_case token into one of the domain enums
///
/// Case and surrounding whitespace are ignored, and inner runs of
/// whitespace become underscores, so "Lightly Active" parses the same as
/// "lightly_active".
pub fn parse_token<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(normalize_token(raw)))
        .map_err(|_| format!("Unknown value: {}", raw))
}

/// Lower-case a token and collapse whitespace runs into `_`
pub fn normalize_token(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw.trim(), "_").to_lowercase()
}

/// Deserialize an optional field, treating malformed values as absent
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => parse_token(&s).ok(),
        other => serde_json::from_value(other).ok(),
    }))
}

macro_rules! token_conversions {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_token(s)
            }
        }
    };
}

// ============================================================================
// Risk
// ============================================================================

/// Ordinal risk level; `Low < Moderate < High < VeryHigh`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }

    /// Raise to `other` if it is higher; never lowers
    #[must_use]
    pub fn raise(self, other: RiskLevel) -> RiskLevel {
        self.max(other)
    }

    /// High or very high
    pub fn is_elevated(&self) -> bool {
        *self >= RiskLevel::High
    }
}

token_conversions!(RiskLevel);

/// Overall health status of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    #[default]
    ProfileIncomplete,
    MedicalClearancePending,
    ClearedForActivity,
    RequiresSupervision,
    HighRisk,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::ProfileIncomplete => "profile_incomplete",
            HealthStatus::MedicalClearancePending => "medical_clearance_pending",
            HealthStatus::ClearedForActivity => "cleared_for_activity",
            HealthStatus::RequiresSupervision => "requires_supervision",
            HealthStatus::HighRisk => "high_risk",
        }
    }
}

token_conversions!(HealthStatus);

/// Severity attached to safety flags and emergency alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagSeverity {
    Low,
    Moderate,
    High,
    Critical,
}

impl FlagSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagSeverity::Low => "low",
            FlagSeverity::Moderate => "moderate",
            FlagSeverity::High => "high",
            FlagSeverity::Critical => "critical",
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, FlagSeverity::High | FlagSeverity::Critical)
    }
}

token_conversions!(FlagSeverity);

// ============================================================================
// Profile vocabularies
// ============================================================================

/// Primary and secondary wellness goals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthGoal {
    GeneralWellness,
    GeneralFitness,
    WeightLoss,
    MuscleGain,
    Endurance,
    Strength,
    Flexibility,
    StressReduction,
    InjuryRecovery,
    ChronicConditionManagement,
}

impl HealthGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthGoal::GeneralWellness => "general_wellness",
            HealthGoal::GeneralFitness => "general_fitness",
            HealthGoal::WeightLoss => "weight_loss",
            HealthGoal::MuscleGain => "muscle_gain",
            HealthGoal::Endurance => "endurance",
            HealthGoal::Strength => "strength",
            HealthGoal::Flexibility => "flexibility",
            HealthGoal::StressReduction => "stress_reduction",
            HealthGoal::InjuryRecovery => "injury_recovery",
            HealthGoal::ChronicConditionManagement => "chronic_condition_management",
        }
    }

    /// Goal token understood by the plan-generating agent service
    pub fn agent_goal(&self) -> &'static str {
        match self {
            HealthGoal::WeightLoss => "gentle_weight_loss",
            HealthGoal::MuscleGain | HealthGoal::Strength => "muscle_gain",
            HealthGoal::GeneralFitness | HealthGoal::Endurance => "improved_fitness",
            HealthGoal::StressReduction => "stress_reduction",
            HealthGoal::GeneralWellness
            | HealthGoal::Flexibility
            | HealthGoal::InjuryRecovery
            | HealthGoal::ChronicConditionManagement => "general_wellness",
        }
    }
}

token_conversions!(HealthGoal);

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    #[serde(alias = "light")]
    LightlyActive,
    #[serde(alias = "moderate")]
    ModeratelyActive,
    #[serde(alias = "active")]
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }
}

token_conversions!(ActivityLevel);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer_not_to_say",
        }
    }
}

token_conversions!(Gender);

/// Dietary restriction tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    None,
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    NutFree,
    LowSodium,
    DiabeticFriendly,
    HeartHealthy,
    Keto,
    LowCarb,
    Mediterranean,
}

impl DietaryRestriction {
    /// Restrictions that follow from a medical condition
    pub fn is_medical(&self) -> bool {
        matches!(
            self,
            DietaryRestriction::DiabeticFriendly
                | DietaryRestriction::HeartHealthy
                | DietaryRestriction::LowSodium
        )
    }
}

/// Severity of a health condition or a reported symptom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

token_conversions!(Severity);

impl From<Severity> for FlagSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Mild => FlagSeverity::Low,
            Severity::Moderate => FlagSeverity::Moderate,
            Severity::Severe => FlagSeverity::High,
        }
    }
}

impl From<RiskLevel> for FlagSeverity {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => FlagSeverity::Low,
            RiskLevel::Moderate => FlagSeverity::Moderate,
            RiskLevel::High => FlagSeverity::High,
            RiskLevel::VeryHigh => FlagSeverity::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryStatus {
    Healing,
    Recovered,
    Chronic,
    RequiresTherapy,
}

// ============================================================================
// Plans and alerts
// ============================================================================

/// Wellness plan lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    Active,
    Paused,
    Completed,
    Cancelled,
    RequiresReview,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Active => "active",
            PlanStatus::Paused => "paused",
            PlanStatus::Completed => "completed",
            PlanStatus::Cancelled => "cancelled",
            PlanStatus::RequiresReview => "requires_review",
        }
    }

    /// Draft and active plans count against the one-plan-per-user limit
    pub fn is_open(&self) -> bool {
        matches!(self, PlanStatus::Draft | PlanStatus::Active)
    }
}

token_conversions!(PlanStatus);

/// Emergency alert lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    New,
    Acknowledged,
    InProgress,
    Resolved,
    Escalated,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::New => "new",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::InProgress => "in_progress",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Escalated => "escalated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertStatus::Resolved | AlertStatus::Escalated)
    }

    /// Whether an alert in this state may move to `next`
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        use AlertStatus::*;
        match (self, next) {
            (New, Acknowledged) => true,
            (New | Acknowledged, InProgress) => true,
            (New | Acknowledged | InProgress, Resolved | Escalated) => true,
            _ => false,
        }
    }
}

token_conversions!(AlertStatus);

/// Category of an emergency alert, derived from the matched keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    ChestPain,
    BreathingDifficulty,
    SevereDizziness,
    Fainting,
    SevereNausea,
    Injury,
    MentalHealthCrisis,
    MedicationReaction,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::ChestPain => "chest_pain",
            AlertType::BreathingDifficulty => "breathing_difficulty",
            AlertType::SevereDizziness => "severe_dizziness",
            AlertType::Fainting => "fainting",
            AlertType::SevereNausea => "severe_nausea",
            AlertType::Injury => "injury",
            AlertType::MentalHealthCrisis => "mental_health_crisis",
            AlertType::MedicationReaction => "medication_reaction",
        }
    }
}

token_conversions!(AlertType);

/// Where an emergency alert originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    UserReport,
    ProgressTracking,
    ChatAnalysis,
    AutomatedDetection,
}

impl TriggerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSource::UserReport => "user_report",
            TriggerSource::ProgressTracking => "progress_tracking",
            TriggerSource::ChatAnalysis => "chat_analysis",
            TriggerSource::AutomatedDetection => "automated_detection",
        }
    }
}

token_conversions!(TriggerSource);
