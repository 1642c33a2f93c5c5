//! Dietary restriction checks and disclaimer text

use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{parse_token, DietaryRestriction, HealthGoal};

/// Advisory result; `is_valid` is always true
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DietaryCheck {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

/// A restriction tag as submitted: a known restriction or anything else
///
/// Unrecognised tags still count toward the restriction total but never
/// match a specific rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RestrictionTag {
    Known(DietaryRestriction),
    Other(String),
}

impl RestrictionTag {
    pub fn known(&self) -> Option<DietaryRestriction> {
        match self {
            RestrictionTag::Known(r) => Some(*r),
            RestrictionTag::Other(_) => None,
        }
    }
}

/// Deserialize a restriction list, keeping every element
///
/// Anything that is not an array becomes an empty list.
pub fn lenient_restriction_tags<'de, D>(deserializer: D) -> Result<Vec<RestrictionTag>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };
    Ok(entries
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => match parse_token(&s) {
                Ok(known) => RestrictionTag::Known(known),
                Err(_) => RestrictionTag::Other(s),
            },
            other => RestrictionTag::Other(other.to_string()),
        })
        .collect())
}

pub fn validate_dietary_restrictions(
    restrictions: &[DietaryRestriction],
    goal: Option<HealthGoal>,
) -> DietaryCheck {
    dietary_check(restrictions.len(), restrictions, goal)
}

/// Dietary check over submitted tags, unknown ones included
pub fn validate_dietary_tags(tags: &[RestrictionTag], goal: Option<HealthGoal>) -> DietaryCheck {
    let known: Vec<DietaryRestriction> = tags.iter().filter_map(RestrictionTag::known).collect();
    dietary_check(tags.len(), &known, goal)
}

fn dietary_check(total: usize, known: &[DietaryRestriction], goal: Option<HealthGoal>) -> DietaryCheck {
    let mut check = DietaryCheck {
        is_valid: true,
        warnings: Vec::new(),
        recommendations: Vec::new(),
    };

    if total > 3 {
        check
            .warnings
            .push("Multiple dietary restrictions may require professional nutrition guidance".to_string());
        check
            .recommendations
            .push("Registered dietitian consultation recommended for complex restrictions".to_string());
    }

    if known.contains(&DietaryRestriction::Vegan) && goal == Some(HealthGoal::MuscleGain) {
        check.recommendations.extend([
            "Vegan muscle building requires careful protein planning".to_string(),
            "Consider plant-based protein supplements and variety".to_string(),
        ]);
    }

    if known.iter().any(DietaryRestriction::is_medical) {
        check
            .recommendations
            .push("Medical dietary restrictions should be reviewed with healthcare provider".to_string());
        check
            .warnings
            .push("Monitor health parameters when following medical diet plans".to_string());
    }

    check
}

pub const HEALTH_DISCLAIMER: &str = "This service provides general wellness information only and \
cannot replace professional medical advice. Always consult with qualified healthcare professionals \
for medical concerns, diagnosis, or treatment. Individual health needs vary significantly, and AI \
recommendations have important limitations.";

pub const EXERCISE_DISCLAIMER: &str = "Exercise recommendations are general guidance only. Consult \
healthcare providers before starting any exercise program, especially if you have health \
conditions, injuries, or take medications. Stop immediately if you experience pain, dizziness, or \
concerning symptoms.";

pub const NUTRITION_DISCLAIMER: &str = "Nutrition information is for educational purposes only and \
not personalized medical nutrition therapy. Consult registered dietitians or healthcare providers \
for specific dietary needs, medical conditions, allergies, or if you take medications that affect \
nutrition.";

pub fn safety_disclaimer() -> &'static str {
    HEALTH_DISCLAIMER
}

pub fn exercise_disclaimer() -> &'static str {
    EXERCISE_DISCLAIMER
}

pub fn nutrition_disclaimer() -> &'static str {
    NUTRITION_DISCLAIMER
}
