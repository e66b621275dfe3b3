use crate::models::{ActivityLevel, Goal, Profile, Sex};

pub const KG_PER_LB: f64 = 0.453_592;
pub const CM_PER_INCH: f64 = 2.54;

const TIPS: &[&str] = &[
    "Start your day with a glass of water before breakfast.",
    "Chew slowly: it takes about 20 minutes for your brain to register fullness.",
    "Prep tomorrow's meals tonight to avoid impulsive choices.",
    "A handful of nuts is a great high-protein snack between meals.",
    "Swap white rice for brown rice or millets for extra fibre.",
    "Dal and sabzi together make a complete protein.",
    "Eat away from screens; mindful eating helps portion control.",
    "Curd (dahi) is a probiotic powerhouse, so include it daily.",
    "Staying hydrated reduces false hunger signals throughout the day.",
    "Idli and sambar is one of the most balanced South Indian breakfasts.",
    "Make lunch your largest meal, when digestion is strongest.",
    "A short 10-minute walk after dinner aids digestion.",
    "Sprouts are cheap, easy to make, and packed with micronutrients.",
    "Consistency beats perfection: one off-day won't undo your progress.",
];

#[must_use]
pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary | ActivityLevel::Unknown => 1.2,
        ActivityLevel::LightlyActive => 1.375,
        ActivityLevel::ModeratelyActive => 1.55,
        ActivityLevel::VeryActive => 1.725,
    }
}

#[must_use]
pub fn goal_adjustment(goal: Goal) -> f64 {
    match goal {
        Goal::LoseWeight => -500.0,
        Goal::Maintain | Goal::Unknown => 0.0,
        Goal::GainMuscle => 300.0,
    }
}

/// Basal metabolic rate (Mifflin-St Jeor), kcal/day.
#[must_use]
pub fn bmr(profile: &Profile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Daily calorie goal: BMR x activity factor + goal adjustment, rounded half-up.
/// Inputs are not range-checked here.
#[must_use]
pub fn compute_goal(profile: &Profile) -> i64 {
    let maintenance = bmr(profile) * activity_multiplier(profile.activity_level);
    round_half_up(maintenance + goal_adjustment(profile.goal))
}

#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[must_use]
pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

#[must_use]
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    (feet * 12.0 + inches) * CM_PER_INCH
}

/// `consumed / goal`, or 0 when the goal is not positive. Not clamped.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_ratio(consumed: i64, goal: i64) -> f64 {
    if goal <= 0 {
        return 0.0;
    }
    consumed as f64 / goal as f64
}

#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn tip_for_day(day_index: i64) -> &'static str {
    let idx = day_index.rem_euclid(TIPS.len() as i64) as usize;
    TIPS[idx]
}
