//! Emergency keyword detection

use serde::{Deserialize, Serialize};

use crate::enums::{AlertType, FlagSeverity};

/// Emergency phrases and the alert category each one implies
pub const EMERGENCY_KEYWORDS: &[(&str, AlertType)] = &[
    ("chest pain", AlertType::ChestPain),
    ("severe chest pain", AlertType::ChestPain),
    ("heart attack", AlertType::ChestPain),
    ("can't breathe", AlertType::BreathingDifficulty),
    ("difficulty breathing", AlertType::BreathingDifficulty),
    ("shortness of breath", AlertType::BreathingDifficulty),
    ("severe dizziness", AlertType::SevereDizziness),
    ("fainting", AlertType::Fainting),
    ("passed out", AlertType::Fainting),
    ("unconscious", AlertType::Fainting),
    ("severe nausea", AlertType::SevereNausea),
    ("vomiting blood", AlertType::SevereNausea),
    ("blood vomit", AlertType::SevereNausea),
    ("broken bone", AlertType::Injury),
    ("fracture", AlertType::Injury),
    ("severe injury", AlertType::Injury),
    ("allergic reaction", AlertType::MedicationReaction),
    ("anaphylaxis", AlertType::MedicationReaction),
    ("swelling throat", AlertType::MedicationReaction),
    ("suicidal", AlertType::MentalHealthCrisis),
    ("self harm", AlertType::MentalHealthCrisis),
    ("want to die", AlertType::MentalHealthCrisis),
];

/// Shorter list used to pre-screen chat messages on the client
pub const CHAT_EMERGENCY_KEYWORDS: &[&str] = &[
    "chest pain",
    "heart attack",
    "can't breathe",
    "dizzy",
    "faint",
    "severe pain",
    "emergency",
    "help",
    "hospital",
    "ambulance",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyFlag {
    pub symptom: String,
    pub severity: FlagSeverity,
    pub requires_immediate_attention: bool,
    pub emergency_services_recommended: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EmergencyCheck {
    pub has_emergency_symptoms: bool,
    pub emergency_flags: Vec<EmergencyFlag>,
    pub immediate_action_required: bool,
}

/// Lower-case and fold typographic apostrophes so "Can’t" matches "can't"
fn normalize(text: &str) -> String {
    text.to_lowercase().replace('\u{2019}', "'")
}

fn matching_keyword(text: &str) -> Option<&'static (&'static str, AlertType)> {
    let lower = normalize(text);
    EMERGENCY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
}

pub fn is_emergency_text(text: &str) -> bool {
    matching_keyword(text).is_some()
}

/// Flag every input string that contains an emergency phrase
///
/// Detection is binary: each matching string yields one critical flag.
pub fn detect_emergency_symptoms<S: AsRef<str>>(symptoms: &[S]) -> EmergencyCheck {
    let emergency_flags: Vec<EmergencyFlag> = symptoms
        .iter()
        .map(|s| s.as_ref())
        .filter(|s: &&str| is_emergency_text(s))
        .map(|s| EmergencyFlag {
            symptom: s.to_string(),
            severity: FlagSeverity::Critical,
            requires_immediate_attention: true,
            emergency_services_recommended: true,
        })
        .collect();

    let found = !emergency_flags.is_empty();
    EmergencyCheck {
        has_emergency_symptoms: found,
        emergency_flags,
        immediate_action_required: found,
    }
}

/// Alert category for a piece of emergency text, chest pain when nothing matches
pub fn classify_alert_type(text: &str) -> AlertType {
    matching_keyword(text)
        .map(|(_, alert_type)| *alert_type)
        .unwrap_or(AlertType::ChestPain)
}

/// Client-side chat pre-check; never used to gate anything on the server
pub fn contains_emergency_keyword(message: &str) -> bool {
    let lower = normalize(message);
    CHAT_EMERGENCY_KEYWORDS.iter().any(|k| lower.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_chest_pain_detected() {
        let check = detect_emergency_symptoms(&["I have chest pain"]);
        assert!(check.has_emergency_symptoms);
        assert!(check.immediate_action_required);
        assert_eq!(check.emergency_flags.len(), 1);
        assert_eq!(check.emergency_flags[0].severity, FlagSeverity::Critical);
        assert_eq!(check.emergency_flags[0].symptom, "I have chest pain");
    }

    #[test]
    fn test_mild_headache_not_emergency() {
        let check = detect_emergency_symptoms(&["mild headache"]);
        assert!(!check.has_emergency_symptoms);
        assert!(check.emergency_flags.is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            detect_emergency_symptoms(&["CHEST PAIN"]).has_emergency_symptoms,
            detect_emergency_symptoms(&["chest pain"]).has_emergency_symptoms
        );
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(detect_emergency_symptoms(&empty), EmergencyCheck::default());
    }

    #[test]
    fn test_one_flag_per_matching_string() {
        let check = detect_emergency_symptoms(&[
            "chest pain and shortness of breath",
            "sore legs",
            "I passed out",
        ]);
        assert_eq!(check.emergency_flags.len(), 2);
    }

    #[test]
    fn test_typographic_apostrophe() {
        assert!(is_emergency_text("I can’t breathe"));
    }

    #[rstest]
    #[case("sudden chest pain", AlertType::ChestPain)]
    #[case("difficulty breathing after run", AlertType::BreathingDifficulty)]
    #[case("I feel suicidal", AlertType::MentalHealthCrisis)]
    #[case("possible fracture in wrist", AlertType::Injury)]
    #[case("allergic reaction to new pills", AlertType::MedicationReaction)]
    #[case("vomiting blood", AlertType::SevereNausea)]
    #[case("unknown", AlertType::ChestPain)]
    fn test_classify_alert_type(#[case] text: &str, #[case] expected: AlertType) {
        assert_eq!(classify_alert_type(text), expected);
    }

    #[test]
    fn test_chat_keywords() {
        assert!(contains_emergency_keyword("Please HELP me"));
        assert!(contains_emergency_keyword("I feel dizzy"));
        assert!(!contains_emergency_keyword("What should I eat for lunch?"));
    }

    proptest! {
        #[test]
        fn prop_keyword_anywhere_is_detected(
            idx in 0..EMERGENCY_KEYWORDS.len(),
            prefix in "[a-z ]{0,12}",
            suffix in "[a-z ]{0,12}",
            upper in any::<bool>(),
        ) {
            let mut text = format!("{}{}{}", prefix, EMERGENCY_KEYWORDS[idx].0, suffix);
            if upper {
                text = text.to_uppercase();
            }
            let check = detect_emergency_symptoms(&[text]);
            prop_assert!(check.has_emergency_symptoms);
            prop_assert_eq!(check.emergency_flags.len(), 1);
        }

        #[test]
        fn prop_digits_never_trigger(texts in prop::collection::vec("[0-9 ]{0,20}", 0..5)) {
            prop_assert!(!detect_emergency_symptoms(&texts).has_emergency_symptoms);
        }
    }
}
