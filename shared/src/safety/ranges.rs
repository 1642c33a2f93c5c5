//! Calorie and workout-duration validators
//!
//! Both validators saturate the value into the safety range and always
//! return a usable adjusted value, even when `is_valid` is false.

use serde::{Deserialize, Serialize};

use super::limits::{MAX_CALORIES, MAX_WORKOUT_MINUTES, MIN_CALORIES, MIN_WORKOUT_MINUTES};
use super::risk::known_age;
use crate::enums::{ActivityLevel, HealthGoal};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalorieCheck {
    pub is_valid: bool,
    pub adjusted_calories: i32,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutCheck {
    pub is_valid: bool,
    pub adjusted_minutes: i32,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn validate_calorie_target(calories: i32, age: Option<i32>, goal: Option<HealthGoal>) -> CalorieCheck {
    let mut check = CalorieCheck {
        is_valid: true,
        adjusted_calories: calories,
        warnings: Vec::new(),
        recommendations: Vec::new(),
    };

    if calories < MIN_CALORIES {
        check.is_valid = false;
        check.adjusted_calories = MIN_CALORIES;
        check.warnings.push(format!(
            "Calorie target too low. Adjusted to safe minimum: {}",
            MIN_CALORIES
        ));
        check
            .recommendations
            .push("Very low calorie diets require medical supervision".to_string());
    }

    if calories > MAX_CALORIES {
        check.is_valid = false;
        check.adjusted_calories = MAX_CALORIES;
        check.warnings.push(format!(
            "Calorie target too high. Adjusted to safe maximum: {}",
            MAX_CALORIES
        ));
    }

    let age = known_age(age);
    if age.is_some_and(|a| a > 65) && calories < 1500 {
        check.warnings.push(
            "Older adults require adequate nutrition - very low calories not recommended".to_string(),
        );
    }

    if age.is_some_and(|a| a < 18) {
        check
            .warnings
            .push("Growing individuals require adequate calories for healthy development".to_string());
        check
            .recommendations
            .push("Pediatric nutrition specialist consultation recommended".to_string());
    }

    if goal == Some(HealthGoal::WeightLoss) && calories < 1500 {
        check
            .warnings
            .push("Extreme calorie restriction can be dangerous and unsustainable".to_string());
        check
            .recommendations
            .push("Consult registered dietitian for safe weight loss approach".to_string());
    }

    check
}

pub fn validate_workout_plan(
    minutes: i32,
    activity_level: Option<ActivityLevel>,
    age: Option<i32>,
) -> WorkoutCheck {
    let mut check = WorkoutCheck {
        is_valid: true,
        adjusted_minutes: minutes,
        warnings: Vec::new(),
        recommendations: Vec::new(),
    };

    // Below the floor is adjusted but not rejected
    if minutes < MIN_WORKOUT_MINUTES {
        check.adjusted_minutes = MIN_WORKOUT_MINUTES;
        check
            .recommendations
            .push("Even short workouts provide health benefits".to_string());
    }

    if minutes > MAX_WORKOUT_MINUTES {
        check.is_valid = false;
        check.adjusted_minutes = MAX_WORKOUT_MINUTES;
        check
            .warnings
            .push("Workout duration exceeds recommended limits for general population".to_string());
        check
            .recommendations
            .push("Extended exercise requires professional supervision".to_string());
    }

    if activity_level == Some(ActivityLevel::Sedentary) && minutes > 45 {
        check
            .warnings
            .push("Gradual increase in activity recommended for sedentary individuals".to_string());
        check
            .recommendations
            .push("Start with 15-20 minutes and increase gradually each week".to_string());
    }

    let age = known_age(age);
    if age.is_some_and(|a| a > 65) && minutes > 60 {
        check
            .warnings
            .push("Adults over 65 should consult healthcare providers for exercise guidance".to_string());
        check
            .recommendations
            .push("Focus on balance, strength, and cardiovascular health".to_string());
    }

    if age.is_some_and(|a| a < 18) {
        check.recommendations.extend([
            "Youth fitness should be age-appropriate and fun".to_string(),
            "Avoid excessive training that could affect growth".to_string(),
        ]);
    }

    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(500, 1200, false)]
    #[case(10_000, 4000, false)]
    #[case(2000, 2000, true)]
    #[case(1200, 1200, true)]
    #[case(4000, 4000, true)]
    fn test_calorie_clamping(#[case] input: i32, #[case] adjusted: i32, #[case] valid: bool) {
        let check = validate_calorie_target(input, Some(30), Some(HealthGoal::GeneralWellness));
        assert_eq!(check.adjusted_calories, adjusted);
        assert_eq!(check.is_valid, valid);
    }

    #[test]
    fn test_low_calorie_messages() {
        let check = validate_calorie_target(500, Some(30), None);
        assert_eq!(
            check.warnings,
            vec!["Calorie target too low. Adjusted to safe minimum: 1200"]
        );
        assert_eq!(
            check.recommendations,
            vec!["Very low calorie diets require medical supervision"]
        );
    }

    #[test]
    fn test_weight_loss_restriction_warning() {
        let check = validate_calorie_target(1400, Some(40), Some(HealthGoal::WeightLoss));
        assert!(check.is_valid);
        assert_eq!(
            check.warnings,
            vec!["Extreme calorie restriction can be dangerous and unsustainable"]
        );
    }

    #[test]
    fn test_calorie_age_warnings() {
        let older = validate_calorie_target(1400, Some(70), None);
        assert_eq!(older.warnings.len(), 1);
        assert!(older.warnings[0].starts_with("Older adults"));

        let teen = validate_calorie_target(2200, Some(15), None);
        assert!(teen.is_valid);
        assert_eq!(
            teen.recommendations,
            vec!["Pediatric nutrition specialist consultation recommended"]
        );
    }

    #[test]
    fn test_workout_over_maximum() {
        let check = validate_workout_plan(240, Some(ActivityLevel::VeryActive), Some(30));
        assert!(!check.is_valid);
        assert_eq!(check.adjusted_minutes, 180);
        assert_eq!(
            check.warnings,
            vec!["Workout duration exceeds recommended limits for general population"]
        );
    }

    #[test]
    fn test_negative_workout_adjusted_but_valid() {
        let check = validate_workout_plan(-10, None, None);
        assert!(check.is_valid);
        assert_eq!(check.adjusted_minutes, 0);
        assert_eq!(check.recommendations, vec!["Even short workouts provide health benefits"]);
    }

    #[test]
    fn test_sedentary_long_workout() {
        let check = validate_workout_plan(60, Some(ActivityLevel::Sedentary), Some(40));
        assert!(check.is_valid);
        assert_eq!(
            check.recommendations,
            vec!["Start with 15-20 minutes and increase gradually each week"]
        );
    }

    #[test]
    fn test_workout_age_rules() {
        let older = validate_workout_plan(90, Some(ActivityLevel::ModeratelyActive), Some(70));
        assert_eq!(
            older.warnings,
            vec!["Adults over 65 should consult healthcare providers for exercise guidance"]
        );

        let youth = validate_workout_plan(30, None, Some(14));
        assert_eq!(youth.recommendations.len(), 2);
        assert!(youth.warnings.is_empty());
    }

    proptest! {
        #[test]
        fn prop_adjusted_calories_always_safe(
            calories in -5000i32..20_000,
            age in prop::option::of(0i32..110),
        ) {
            let check = validate_calorie_target(calories, age, None);
            prop_assert!((MIN_CALORIES..=MAX_CALORIES).contains(&check.adjusted_calories));
            prop_assert_eq!(check.is_valid, (MIN_CALORIES..=MAX_CALORIES).contains(&calories));
        }

        #[test]
        fn prop_adjusted_minutes_always_safe(minutes in -500i32..1000) {
            let check = validate_workout_plan(minutes, None, None);
            prop_assert!((MIN_WORKOUT_MINUTES..=MAX_WORKOUT_MINUTES).contains(&check.adjusted_minutes));
            prop_assert_eq!(check.is_valid, minutes <= MAX_WORKOUT_MINUTES);
        }
    }
}
