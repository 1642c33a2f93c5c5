//! Progress-entry concerns and pause-reason screening

use serde::{Deserialize, Serialize};

use crate::enums::Severity;
use crate::models::{HealthMetrics, ReportedSymptom};

/// Words in a pause reason that mark it as health related
pub const HEALTH_PAUSE_KEYWORDS: &[&str] = &[
    "injury", "illness", "pain", "doctor", "medical", "hospital", "surgery",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressConcern {
    SevereSymptomsReported,
    VeryLowEnergy,
    HighPainLevel,
    HighStressLowMood,
}

impl ProgressConcern {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressConcern::SevereSymptomsReported => "severe_symptoms_reported",
            ProgressConcern::VeryLowEnergy => "very_low_energy",
            ProgressConcern::HighPainLevel => "high_pain_level",
            ProgressConcern::HighStressLowMood => "high_stress_low_mood",
        }
    }
}

/// Concerns raised by a single progress entry
pub fn check_progress_concerns(
    metrics: &HealthMetrics,
    symptoms: &[ReportedSymptom],
) -> Vec<ProgressConcern> {
    let mut concerns = Vec::new();

    if symptoms.iter().any(|s| s.severity == Severity::Severe) {
        concerns.push(ProgressConcern::SevereSymptomsReported);
    }
    if metrics.energy_level.is_some_and(|e| e <= 2) {
        concerns.push(ProgressConcern::VeryLowEnergy);
    }
    if metrics.pain_level.is_some_and(|p| p >= 7) {
        concerns.push(ProgressConcern::HighPainLevel);
    }
    if metrics.stress_level.is_some_and(|s| s >= 4) && metrics.mood.is_some_and(|m| m <= 2) {
        concerns.push(ProgressConcern::HighStressLowMood);
    }

    concerns
}

pub fn is_health_related_pause(reason: &str) -> bool {
    let lower = reason.to_lowercase();
    HEALTH_PAUSE_KEYWORDS.iter().any(|k| lower.contains(k))
}
