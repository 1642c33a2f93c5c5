//! Profile risk scoring
//!
//! `validate_user_profile_safety` is the rule-based gate consulted before
//! a profile is stored or a plan is generated. `assess_risk_level` is a
//! coarser additive score over the full profile; the stored risk level is
//! the higher of the two.

use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{lenient, ActivityLevel, HealthGoal, InjuryStatus, RiskLevel, Severity};
use crate::models::{HealthCondition, HealthProfile};

/// Condition phrases that require medical clearance, matched as substrings
pub const HIGH_RISK_CONDITIONS: &[&str] = &[
    "heart disease",
    "cardiovascular",
    "cardiac",
    "diabetes",
    "diabetic",
    "high blood pressure",
    "hypertension",
    "eating disorder",
    "anorexia",
    "bulimia",
    "pregnancy",
    "pregnant",
    "recent surgery",
    "surgery",
    "joint problems",
    "arthritis",
    "back injury",
    "spine",
    "chest pain",
    "shortness of breath",
    "dizziness",
    "fainting",
    "seizure",
    "medication",
    "chronic pain",
];

pub const AGE_CONCERN: &str = "Age requires special consideration for health planning";
pub const AGE_RECOMMENDATION: &str = "Professional medical supervision strongly recommended";
pub const CONDITION_RECOMMENDATION: &str =
    "Medical clearance required before starting any fitness program";
pub const INJURY_RECOVERY_CONCERN: &str =
    "Injury recovery requires professional physical therapy guidance";

/// A health condition as submitted: a bare name or a detailed record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConditionEntry {
    Name(String),
    Detailed(HealthCondition),
}

impl ConditionEntry {
    pub fn name(&self) -> &str {
        match self {
            ConditionEntry::Name(name) => name,
            ConditionEntry::Detailed(c) => &c.condition,
        }
    }
}

fn lenient_conditions<'de, D>(deserializer: D) -> Result<Vec<ConditionEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };
    Ok(entries
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

/// Input to the profile safety gate
///
/// Every field is optional; malformed values deserialize as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileSafetyInput {
    #[serde(default, deserialize_with = "lenient")]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub primary_goal: Option<HealthGoal>,
    #[serde(default, deserialize_with = "lenient_conditions")]
    pub health_conditions: Vec<ConditionEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_activity_level: Option<ActivityLevel>,
}

impl From<&HealthProfile> for ProfileSafetyInput {
    fn from(profile: &HealthProfile) -> Self {
        Self {
            age: Some(profile.age),
            primary_goal: Some(profile.primary_goal),
            health_conditions: profile
                .health_conditions
                .iter()
                .cloned()
                .map(ConditionEntry::Detailed)
                .collect(),
            current_activity_level: Some(profile.current_activity_level),
        }
    }
}

/// Verdict of the profile safety gate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileSafetyResult {
    pub is_safe: bool,
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
}

impl Default for ProfileSafetyResult {
    fn default() -> Self {
        Self {
            is_safe: true,
            concerns: Vec::new(),
            recommendations: Vec::new(),
            risk_level: RiskLevel::Low,
        }
    }
}

/// Age 0 is treated the same as a missing age
pub(crate) fn known_age(age: Option<i32>) -> Option<i32> {
    age.filter(|a| *a != 0)
}

pub fn is_high_risk_condition(condition: &str) -> bool {
    let lower = condition.to_lowercase();
    HIGH_RISK_CONDITIONS.iter().any(|risk| lower.contains(risk))
}

/// Score a profile into a safety verdict
///
/// Rules run in a fixed order (age, conditions, goal, activity level,
/// mental-health goal) and can only raise the risk level. Any matching
/// high-risk condition, a high risk level, or more than two concerns makes
/// the profile unsafe.
pub fn validate_user_profile_safety(input: &ProfileSafetyInput) -> ProfileSafetyResult {
    let mut result = ProfileSafetyResult::default();

    if let Some(age) = known_age(input.age) {
        if !(16..=75).contains(&age) {
            result.concerns.push(AGE_CONCERN.to_string());
            result.recommendations.push(AGE_RECOMMENDATION.to_string());
            result.risk_level = result.risk_level.raise(RiskLevel::Moderate);
        }
    }

    for entry in &input.health_conditions {
        let condition = entry.name();
        if is_high_risk_condition(condition) {
            result.concerns.push(format!(
                "Health condition \"{}\" requires professional medical evaluation",
                condition
            ));
            result.recommendations.push(CONDITION_RECOMMENDATION.to_string());
            result.risk_level = result.risk_level.raise(RiskLevel::High);
            result.is_safe = false;
        }
    }

    match input.primary_goal {
        Some(HealthGoal::WeightLoss) => {
            result.recommendations.extend([
                "Weight loss goals should be supervised by healthcare professionals".to_string(),
                "Sustainable weight loss is typically 0.5-2 pounds per week".to_string(),
            ]);
        }
        Some(HealthGoal::InjuryRecovery) => {
            result.concerns.push(INJURY_RECOVERY_CONCERN.to_string());
            result
                .recommendations
                .push("Consult with physical therapist or sports medicine physician".to_string());
            result.risk_level = result.risk_level.raise(RiskLevel::High);
        }
        _ => {}
    }

    if input.current_activity_level == Some(ActivityLevel::Sedentary) {
        result.recommendations.extend([
            "Gradual increase in activity recommended for sedentary individuals".to_string(),
            "Start with low-intensity activities and build slowly".to_string(),
        ]);
    }

    if input.primary_goal == Some(HealthGoal::StressReduction) {
        result
            .recommendations
            .push("Mental health goals benefit from professional counseling support".to_string());
    }

    if result.risk_level >= RiskLevel::High || result.concerns.len() > 2 {
        result.is_safe = false;
    }

    result
}

/// Additive risk score over the full profile
///
/// Age outside 18-65 adds 2 and over 75 adds 3 more; each severe
/// condition adds 3; each monitored condition, condition affecting
/// exercise, medication affecting exercise and healing injury adds 2.
pub fn risk_score(profile: &HealthProfile) -> u32 {
    let mut score = 0;

    if profile.age != 0 {
        if profile.age < 18 || profile.age > 65 {
            score += 2;
        }
        if profile.age > 75 {
            score += 3;
        }
    }

    for condition in &profile.health_conditions {
        if condition.severity == Severity::Severe {
            score += 3;
        }
        if condition.requires_monitoring {
            score += 2;
        }
        if condition.affects_exercise {
            score += 2;
        }
    }

    score += 2 * profile.medications.iter().filter(|m| m.affects_exercise).count() as u32;
    score += 2 * profile
        .injuries
        .iter()
        .filter(|i| i.status == InjuryStatus::Healing)
        .count() as u32;

    score
}

/// Map the additive score onto a risk level (10+, 6+, 3+)
pub fn assess_risk_level(profile: &HealthProfile) -> RiskLevel {
    match risk_score(profile) {
        s if s >= 10 => RiskLevel::VeryHigh,
        s if s >= 6 => RiskLevel::High,
        s if s >= 3 => RiskLevel::Moderate,
        _ => RiskLevel::Low,
    }
}
