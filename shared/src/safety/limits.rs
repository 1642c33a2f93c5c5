//! Hard numeric safety bounds

/// Youngest age accepted on a health profile
pub const MIN_AGE: i32 = 13;
/// Oldest age accepted on a health profile
pub const MAX_AGE: i32 = 100;
/// Lowest daily calorie target a plan may use
pub const MIN_CALORIES: i32 = 1200;
/// Highest daily calorie target a plan may use
pub const MAX_CALORIES: i32 = 4000;
pub const MIN_WORKOUT_MINUTES: i32 = 0;
pub const MAX_WORKOUT_MINUTES: i32 = 180;

/// Longest plan the agent service is asked to generate
pub const MAX_PLAN_WEEKS: i32 = 12;
pub const DEFAULT_PLAN_WEEKS: i32 = 4;
pub const DEFAULT_DAILY_MINUTES: i32 = 30;
pub const MAX_SECONDARY_GOALS: usize = 3;

/// Saturate a calorie target into the safe range
pub fn clamp_calories(calories: i32) -> i32 {
    calories.clamp(MIN_CALORIES, MAX_CALORIES)
}

/// Saturate a daily workout duration into the safe range
pub fn clamp_workout_minutes(minutes: i32) -> i32 {
    minutes.clamp(MIN_WORKOUT_MINUTES, MAX_WORKOUT_MINUTES)
}

/// Minutes requested from the agent service: 30 when unset, capped at the maximum
pub fn plan_daily_minutes(daily_minutes: Option<i32>) -> i32 {
    daily_minutes
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_DAILY_MINUTES)
        .min(MAX_WORKOUT_MINUTES)
}

/// Plan length requested from the agent service: 4 weeks when unset, at most 12
pub fn plan_duration_weeks(weeks: Option<i32>) -> i32 {
    weeks
        .filter(|w| *w > 0)
        .unwrap_or(DEFAULT_PLAN_WEEKS)
        .min(MAX_PLAN_WEEKS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plan_defaults() {
        assert_eq!(plan_daily_minutes(None), 30);
        assert_eq!(plan_daily_minutes(Some(0)), 30);
        assert_eq!(plan_daily_minutes(Some(240)), 180);
        assert_eq!(plan_duration_weeks(None), 4);
        assert_eq!(plan_duration_weeks(Some(52)), 12);
        assert_eq!(plan_duration_weeks(Some(6)), 6);
    }

    proptest! {
        #[test]
        fn prop_clamped_calories_in_range(calories in any::<i32>()) {
            let c = clamp_calories(calories);
            prop_assert!((MIN_CALORIES..=MAX_CALORIES).contains(&c));
        }

        #[test]
        fn prop_clamped_minutes_in_range(minutes in any::<i32>()) {
            let m = clamp_workout_minutes(minutes);
            prop_assert!((MIN_WORKOUT_MINUTES..=MAX_WORKOUT_MINUTES).contains(&m));
        }

        #[test]
        fn prop_in_range_values_untouched(calories in MIN_CALORIES..=MAX_CALORIES) {
            prop_assert_eq!(clamp_calories(calories), calories);
        }
    }
}
