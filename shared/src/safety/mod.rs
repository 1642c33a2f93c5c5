//! Health-safety validator
//!
//! Pure, synchronous rule evaluation over plain data. Nothing in this
//! module performs I/O or holds state; the keyword tables and limits are
//! constants. Callers decide what to do with a negative verdict.

pub mod dietary;
pub mod emergency;
pub mod limits;
pub mod progress;
pub mod ranges;
pub mod risk;

pub use dietary::{
    exercise_disclaimer, lenient_restriction_tags, nutrition_disclaimer, safety_disclaimer,
    validate_dietary_restrictions, validate_dietary_tags, DietaryCheck, RestrictionTag,
};
pub use emergency::{
    classify_alert_type, contains_emergency_keyword, detect_emergency_symptoms,
    is_emergency_text, EmergencyCheck, EmergencyFlag,
};
pub use progress::{check_progress_concerns, is_health_related_pause, ProgressConcern};
pub use ranges::{validate_calorie_target, validate_workout_plan, CalorieCheck, WorkoutCheck};
pub use risk::{
    assess_risk_level, risk_score, validate_user_profile_safety, ConditionEntry,
    ProfileSafetyInput, ProfileSafetyResult,
};
