//! Wellness Coach WASM Module
//!
//! Client-side safety hints for the browser. These mirror the server's
//! validator so the UI can warn early; the server remains the gate.

use wasm_bindgen::prelude::*;
use wellness_coach_shared::safety::{self, limits, EmergencyCheck, ProfileSafetyInput};

/// Quick pre-check of a chat message for emergency wording
#[wasm_bindgen]
pub fn has_emergency_keywords(message: &str) -> bool {
    safety::contains_emergency_keyword(message)
}

/// Run the emergency detector over a JSON array of symptom strings
///
/// Input that is not a string array is treated as no symptoms.
#[wasm_bindgen]
pub fn detect_emergency_json(symptoms_json: &str) -> String {
    let symptoms: Vec<String> = serde_json::from_str(symptoms_json).unwrap_or_default();
    let check = safety::detect_emergency_symptoms(&symptoms);
    to_json(&check)
}

#[wasm_bindgen]
pub fn clamp_calories(value: i32) -> i32 {
    limits::clamp_calories(value)
}

#[wasm_bindgen]
pub fn clamp_workout_minutes(value: i32) -> i32 {
    limits::clamp_workout_minutes(value)
}

/// Profile safety verdict for a JSON profile fragment
///
/// Unparseable input is evaluated as an empty profile.
#[wasm_bindgen]
pub fn profile_safety_json(input_json: &str) -> String {
    let input: ProfileSafetyInput = serde_json::from_str(input_json).unwrap_or_default();
    to_json(&safety::validate_user_profile_safety(&input))
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_keywords() {
        assert!(has_emergency_keywords("I feel DIZZY and need help"));
        assert!(!has_emergency_keywords("What should I eat after a run?"));
    }

    #[test]
    fn test_detect_emergency_json() {
        let json = detect_emergency_json(r#"["tired", "chest pain when climbing stairs"]"#);
        let check: EmergencyCheck = serde_json::from_str(&json).unwrap();
        assert!(check.has_emergency_symptoms);
        assert_eq!(check.emergency_flags.len(), 1);

        let json = detect_emergency_json("not json");
        let check: EmergencyCheck = serde_json::from_str(&json).unwrap();
        assert!(!check.has_emergency_symptoms);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_calories(800), 1200);
        assert_eq!(clamp_calories(5000), 4000);
        assert_eq!(clamp_workout_minutes(-5), 0);
        assert_eq!(clamp_workout_minutes(200), 180);
    }

    #[test]
    fn test_profile_safety_json() {
        let json = profile_safety_json(r#"{"age": 80, "health_conditions": ["arthritis"]}"#);
        let verdict: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(verdict["is_safe"], false);
        assert_eq!(verdict["risk_level"], "high");

        let json = profile_safety_json("{");
        let verdict: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(verdict["is_safe"], true);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_keywords_in_browser() {
        assert!(has_emergency_keywords("sudden chest pain"));
        assert_eq!(clamp_calories(1500), 1500);
    }
}
