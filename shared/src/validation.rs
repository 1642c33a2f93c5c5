//! Input validation functions
//!
//! Field checks for health-profile input. Request structs also derive
//! `validator::Validate` for the simple range and length rules; the checks
//! here cover what depends on units or on other fields.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::safety::limits::{
    MAX_AGE, MAX_SECONDARY_GOALS, MAX_WORKOUT_MINUTES, MIN_AGE, MIN_WORKOUT_MINUTES,
};
use crate::models::HealthMetrics;
use crate::types::{CreateHealthProfileRequest, UpdateHealthProfileRequest};
use crate::units::{HeightUnit, WeightUnit};

fn ensure_finite(value: f64, label: &str) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", label));
    }
    Ok(())
}

/// Validate age against the profile safety limits
pub fn validate_age(age: i32) -> Result<(), String> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(format!(
            "Age must be between {} and {} years",
            MIN_AGE, MAX_AGE
        ));
    }
    Ok(())
}

/// Validate date of birth: not in the future
pub fn validate_date_of_birth(dob: NaiveDate, today: NaiveDate) -> Result<(), String> {
    if dob > today {
        return Err("Date of birth cannot be in the future".to_string());
    }
    Ok(())
}

/// Stated age must be within one year of the age implied by date of birth
pub fn validate_age_matches_dob(age: i32, dob: NaiveDate, today: NaiveDate) -> Result<(), String> {
    let implied = match today.years_since(dob) {
        Some(years) => years as i32,
        None => return Err("Invalid date of birth".to_string()),
    };
    if (age - implied).abs() > 1 {
        return Err(format!(
            "Age {} does not match date of birth (expected about {})",
            age, implied
        ));
    }
    Ok(())
}

/// Validate height for its unit: 30-120 inches or 76-305 cm
pub fn validate_height(value: f64, unit: HeightUnit) -> Result<(), String> {
    ensure_finite(value, "Height")?;
    let (min, max) = match unit {
        HeightUnit::Inches => (30.0, 120.0),
        HeightUnit::Cm => (76.0, 305.0),
    };
    if value < min || value > max {
        return Err(format!(
            "Height must be between {} and {} {}",
            min,
            max,
            unit.abbreviation()
        ));
    }
    Ok(())
}

/// Validate weight for its unit: 50-1000 lbs or 23-454 kg
pub fn validate_weight(value: f64, unit: WeightUnit) -> Result<(), String> {
    ensure_finite(value, "Weight")?;
    let (min, max) = match unit {
        WeightUnit::Lbs => (50.0, 1000.0),
        WeightUnit::Kg => (23.0, 454.0),
    };
    if value < min || value > max {
        return Err(format!(
            "Weight must be between {} and {} {}",
            min,
            max,
            unit.abbreviation()
        ));
    }
    Ok(())
}

/// Validate daily workout availability in minutes
pub fn validate_daily_minutes(minutes: i32) -> Result<(), String> {
    if !(MIN_WORKOUT_MINUTES..=MAX_WORKOUT_MINUTES).contains(&minutes) {
        return Err(format!(
            "Daily minutes must be between {} and {}",
            MIN_WORKOUT_MINUTES, MAX_WORKOUT_MINUTES
        ));
    }
    Ok(())
}

pub fn validate_secondary_goals(count: usize) -> Result<(), String> {
    if count > MAX_SECONDARY_GOALS {
        return Err(format!(
            "At most {} secondary goals are allowed",
            MAX_SECONDARY_GOALS
        ));
    }
    Ok(())
}

static DISCLAIMER_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+$").expect("valid regex"));

/// Disclaimer versions look like "1.0"
pub fn validate_disclaimer_version(version: &str) -> Result<(), String> {
    if !DISCLAIMER_VERSION.is_match(version) {
        return Err("Invalid disclaimer version format".to_string());
    }
    Ok(())
}

fn check_scale(value: Option<i32>, min: i32, max: i32, label: &str) -> Result<(), String> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(format!(
            "{} must be between {} and {}",
            label, min, max
        )),
        _ => Ok(()),
    }
}

/// Validate the self-reported scores on a progress entry
pub fn validate_health_metrics(metrics: &HealthMetrics) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    collect(&mut errors, "energy_level", check_scale(metrics.energy_level, 1, 5, "Energy level"));
    collect(&mut errors, "sleep_quality", check_scale(metrics.sleep_quality, 1, 5, "Sleep quality"));
    collect(&mut errors, "stress_level", check_scale(metrics.stress_level, 1, 5, "Stress level"));
    collect(&mut errors, "mood", check_scale(metrics.mood, 1, 5, "Mood"));
    collect(&mut errors, "pain_level", check_scale(metrics.pain_level, 0, 10, "Pain level"));
    if let Some(hours) = metrics.sleep_hours {
        let result = ensure_finite(hours, "Sleep hours").and_then(|_| {
            if (0.0..=24.0).contains(&hours) {
                Ok(())
            } else {
                Err("Sleep hours must be between 0 and 24".to_string())
            }
        });
        collect(&mut errors, "sleep_hours", result);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ============================================================================
// Profile Validation
// ============================================================================

fn collect(errors: &mut Vec<ValidationError>, field: &str, result: Result<(), String>) {
    if let Err(message) = result {
        errors.push(ValidationError::new(field, &message));
    }
}

/// Validate a new health profile, returning every field error found
pub fn validate_new_profile(
    request: &CreateHealthProfileRequest,
    today: NaiveDate,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    collect(&mut errors, "age", validate_age(request.age));
    collect(
        &mut errors,
        "date_of_birth",
        validate_date_of_birth(request.date_of_birth, today),
    );
    if errors.is_empty() {
        collect(
            &mut errors,
            "date_of_birth",
            validate_age_matches_dob(request.age, request.date_of_birth, today),
        );
    }
    collect(
        &mut errors,
        "height",
        validate_height(request.height.value, request.height.unit),
    );
    collect(
        &mut errors,
        "weight",
        validate_weight(request.weight.current, request.weight.unit),
    );
    collect(
        &mut errors,
        "secondary_goals",
        validate_secondary_goals(request.secondary_goals.len()),
    );
    if let Some(ta) = &request.time_availability {
        collect(
            &mut errors,
            "daily_minutes",
            validate_daily_minutes(ta.daily_minutes),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the fields present on a partial profile update
///
/// `current_age` and `current_dob` are the stored values, used when only
/// one side of the age/date-of-birth pair changes.
pub fn validate_profile_update(
    request: &UpdateHealthProfileRequest,
    current_age: i32,
    current_dob: NaiveDate,
    today: NaiveDate,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(age) = request.age {
        collect(&mut errors, "age", validate_age(age));
    }
    if let Some(dob) = request.date_of_birth {
        collect(&mut errors, "date_of_birth", validate_date_of_birth(dob, today));
    }
    if errors.is_empty() && (request.age.is_some() || request.date_of_birth.is_some()) {
        collect(
            &mut errors,
            "date_of_birth",
            validate_age_matches_dob(
                request.age.unwrap_or(current_age),
                request.date_of_birth.unwrap_or(current_dob),
                today,
            ),
        );
    }
    if let Some(height) = &request.height {
        collect(&mut errors, "height", validate_height(height.value, height.unit));
    }
    if let Some(weight) = &request.weight {
        collect(&mut errors, "weight", validate_weight(weight.current, weight.unit));
    }
    if let Some(goals) = &request.secondary_goals {
        collect(&mut errors, "secondary_goals", validate_secondary_goals(goals.len()));
    }
    if let Some(ta) = &request.time_availability {
        collect(&mut errors, "daily_minutes", validate_daily_minutes(ta.daily_minutes));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "age" => "Age",
        "date_of_birth" => "Date of Birth",
        "gender" => "Gender",
        "height" => "Height",
        "weight" => "Current Weight",
        "current_activity_level" => "Activity Level",
        "primary_goal" => "Primary Goal",
        "secondary_goals" => "Secondary Goals",
        "daily_minutes" => "Daily Workout Minutes",
        "dietary_restrictions" => "Dietary Restrictions",
        "health_conditions" => "Health Conditions",
        "medications" => "Medications",
        "injuries" => "Injuries",
        "description" => "Concern Description",
        "disclaimer_version" => "Disclaimer Version",
        "energy_level" => "Energy Level",
        "sleep_hours" => "Sleep Hours",
        "sleep_quality" => "Sleep Quality",
        "stress_level" => "Stress Level",
        "mood" => "Mood",
        "pain_level" => "Pain Level",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}
