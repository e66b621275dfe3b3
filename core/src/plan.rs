use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::calc::{compute_goal, round_half_up};
use crate::models::{
    DAYS_PER_PLAN, Day, DietaryPreference, Meal, MealType, Plan, Profile, day_name,
    validate_day_index,
};

/// Meal slots in display order with their share of the daily goal.
pub const MEAL_SLOTS: [(&str, f64); 4] = [
    ("Breakfast", 0.25),
    ("Lunch", 0.35),
    ("Snack", 0.10),
    ("Dinner", 0.30),
];

// One row per day, columns in MEAL_SLOTS order.
type WeekTemplate = [[&'static str; 4]; DAYS_PER_PLAN];

const TEMPLATE_NONE: WeekTemplate = [
    ["Poha with peanuts", "Chicken curry with rice", "Boiled egg", "Roti with dal makhani"],
    ["Idli with sambar", "Egg fried rice", "Banana", "Grilled chicken with salad"],
    ["Paratha with curd", "Fish curry with rice", "Mixed nuts", "Dal tadka with roti"],
    ["Upma with chutney", "Mutton keema with roti", "Apple", "Paneer bhurji with roti"],
    ["Oats with milk", "Chicken biryani", "Sprouts chaat", "Vegetable soup with bread"],
    ["Dosa with sambar", "Prawn masala with rice", "Roasted chana", "Egg curry with roti"],
    ["Bread omelette", "Rajma chawal", "Curd with fruit", "Grilled fish with salad"],
];

const TEMPLATE_VEGETARIAN: WeekTemplate = [
    ["Poha with peanuts", "Paneer curry with rice", "Banana", "Dal tadka with roti"],
    ["Idli with sambar", "Rajma chawal", "Mixed nuts", "Palak paneer with roti"],
    ["Paratha with curd", "Chole with bhature", "Apple", "Vegetable khichdi"],
    ["Upma with chutney", "Vegetable biryani", "Sprouts chaat", "Paneer bhurji with roti"],
    ["Oats with milk", "Dal makhani with rice", "Roasted chana", "Aloo gobi with roti"],
    ["Dosa with sambar", "Kadhi chawal", "Curd with fruit", "Methi thepla with curd"],
    ["Bread with peanut butter", "Matar paneer with roti", "Fruit salad", "Vegetable soup with bread"],
];

const TEMPLATE_VEGAN: WeekTemplate = [
    ["Poha with peanuts", "Chana masala with rice", "Banana", "Dal tadka with roti"],
    ["Idli with sambar", "Rajma chawal", "Mixed nuts", "Aloo palak with roti"],
    ["Upma with chutney", "Vegetable biryani", "Apple", "Vegetable khichdi"],
    ["Oats with plant milk", "Chole with rice", "Sprouts chaat", "Tofu stir fry with roti"],
    ["Fruit smoothie", "Dal makhani (vegan) + rice", "Roasted chana", "Aloo gobi with roti"],
    ["Dosa with sambar", "Kadhi (vegan) with rice", "Fruit salad", "Methi thepla with hummus"],
    ["Bread with peanut butter", "Matar mushroom with roti", "Coconut water", "Vegetable soup with bread"],
];

fn template_for(preference: DietaryPreference) -> &'static WeekTemplate {
    match preference {
        DietaryPreference::Vegetarian => &TEMPLATE_VEGETARIAN,
        DietaryPreference::Vegan => &TEMPLATE_VEGAN,
        DietaryPreference::NoPreference | DietaryPreference::Unknown => &TEMPLATE_NONE,
    }
}

/// Default meals for all 7 days, scaled to the profile's computed goal.
///
/// Ids are `default-{day}-{slot}`, so regenerating yields the same ids and
/// never collides with the UUIDs given to user-added meals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn default_meals(profile: &Profile) -> Vec<Vec<Meal>> {
    let goal = compute_goal(profile) as f64;
    template_for(profile.dietary_preference)
        .iter()
        .enumerate()
        .map(|(day_index, names)| {
            MEAL_SLOTS
                .iter()
                .zip(names)
                .map(|((slot, fraction), name)| Meal {
                    id: format!("default-{day_index}-{}", slot.to_lowercase()),
                    name: (*name).to_string(),
                    meal_type: MealType::from(*slot),
                    calories: round_half_up(goal * fraction),
                    completed: false,
                    note: String::new(),
                })
                .collect()
        })
        .collect()
}

impl Day {
    #[must_use]
    pub fn consumed_calories(&self) -> i64 {
        self.meals
            .iter()
            .filter(|m| m.completed)
            .map(|m| m.calories)
            .sum()
    }

    #[must_use]
    pub fn planned_calories(&self) -> i64 {
        self.meals.iter().map(|m| m.calories).sum()
    }

    /// A day with no meals is never complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.meals.is_empty() && self.meals.iter().all(|m| m.completed)
    }

    pub fn meal_mut(&mut self, meal_id: &str) -> Result<&mut Meal> {
        let day_index = self.day_index;
        self.meals
            .iter_mut()
            .find(|m| m.id == meal_id)
            .with_context(|| format!("Meal '{meal_id}' not found on {}", day_name(day_index)))
    }
}

impl Plan {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        let now = Utc::now().to_rfc3339();
        Plan {
            days: default_meals(profile)
                .into_iter()
                .enumerate()
                .map(|(day_index, meals)| Day { day_index, meals })
                .collect(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn day(&self, day: usize) -> Result<&Day> {
        validate_day_index(day)?;
        self.days
            .get(day)
            .with_context(|| format!("Plan has no entry for {}", day_name(day)))
    }

    pub fn day_mut(&mut self, day: usize) -> Result<&mut Day> {
        validate_day_index(day)?;
        self.days
            .get_mut(day)
            .with_context(|| format!("Plan has no entry for {}", day_name(day)))
    }

    /// Append a meal to the end of the day. Name and calories are expected
    /// to be validated already.
    pub fn add_meal(
        &mut self,
        day: usize,
        name: &str,
        meal_type: MealType,
        calories: i64,
    ) -> Result<Meal> {
        let meal = Meal {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            meal_type,
            calories,
            completed: false,
            note: String::new(),
        };
        self.day_mut(day)?.meals.push(meal.clone());
        Ok(meal)
    }

    pub fn edit_meal(
        &mut self,
        day: usize,
        meal_id: &str,
        name: &str,
        meal_type: MealType,
        calories: i64,
    ) -> Result<Meal> {
        let meal = self.day_mut(day)?.meal_mut(meal_id)?;
        meal.name = name.to_string();
        meal.meal_type = meal_type;
        meal.calories = calories;
        Ok(meal.clone())
    }

    /// Returns the removed meal, or `None` if no meal had that id.
    pub fn delete_meal(&mut self, day: usize, meal_id: &str) -> Result<Option<Meal>> {
        let meals = &mut self.day_mut(day)?.meals;
        let position = meals.iter().position(|m| m.id == meal_id);
        Ok(position.map(|idx| meals.remove(idx)))
    }

    /// Returns whether the day is fully completed after the change.
    pub fn set_completed(&mut self, day: usize, meal_id: &str, completed: bool) -> Result<bool> {
        let day = self.day_mut(day)?;
        day.meal_mut(meal_id)?.completed = completed;
        Ok(day.is_complete())
    }

    pub fn set_note(&mut self, day: usize, meal_id: &str, note: &str) -> Result<()> {
        self.day_mut(day)?.meal_mut(meal_id)?.note = note.to_string();
        Ok(())
    }
}

/// Plain-text rendering of the whole plan for clipboard or print.
#[must_use]
pub fn plan_to_text(plan: &Plan, goal: Option<i64>) -> String {
    let goal_label = goal.map_or_else(|| "—".to_string(), |g| g.to_string());
    let mut lines = vec![
        "Nutrify — 7-Day Diet Plan".to_string(),
        "═".repeat(40),
        String::new(),
    ];

    for (i, day) in plan.days.iter().enumerate() {
        let name = crate::models::DAY_NAMES
            .get(i)
            .map_or_else(|| format!("Day {}", i + 1), |n| (*n).to_string());
        lines.push(format!("{name}  (Goal: {goal_label} kcal)"));
        lines.push("─".repeat(36));

        if day.meals.is_empty() {
            lines.push("  (no meals)".to_string());
        } else {
            for meal in &day.meals {
                lines.push(format!(
                    "  • [{}] {} — {} kcal",
                    meal.meal_type, meal.name, meal.calories
                ));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, Goal, Sex};

    fn sample_profile(pref: DietaryPreference) -> Profile {
        Profile {
            goal: Goal::LoseWeight,
            activity_level: ActivityLevel::ModeratelyActive,
            sex: Sex::Male,
            age: 30,
            weight_kg: 70.0,
            height_cm: 175.0,
            dietary_preference: pref,
            created_at: None,
        }
    }

    #[test]
    fn test_default_meals_shape_and_calories() {
        let days = default_meals(&sample_profile(DietaryPreference::NoPreference));
        assert_eq!(days.len(), 7);
        for (day_index, meals) in days.iter().enumerate() {
            assert_eq!(meals.len(), 4);
            assert_eq!(meals[0].meal_type, MealType::Breakfast);
            assert_eq!(meals[3].meal_type, MealType::Dinner);
            assert_eq!(meals[1].id, format!("default-{day_index}-lunch"));
            assert!(meals.iter().all(|m| !m.completed && m.note.is_empty()));
        }
        // Goal 2056: 514 / 719.6 / 205.6 / 616.8
        let calories: Vec<i64> = days[0].iter().map(|m| m.calories).collect();
        assert_eq!(calories, vec![514, 720, 206, 617]);
        assert_eq!(days[0][0].name, "Poha with peanuts");
    }

    #[test]
    fn test_default_meals_follow_preference() {
        let vegan = default_meals(&sample_profile(DietaryPreference::Vegan));
        assert_eq!(vegan[3][0].name, "Oats with plant milk");

        let vegetarian = default_meals(&sample_profile(DietaryPreference::Vegetarian));
        assert_eq!(vegetarian[0][1].name, "Paneer curry with rice");

        let unknown = default_meals(&sample_profile(DietaryPreference::Unknown));
        let none = default_meals(&sample_profile(DietaryPreference::NoPreference));
        assert_eq!(unknown, none);
    }

    #[test]
    fn test_default_meals_are_idempotent() {
        let p = sample_profile(DietaryPreference::Vegetarian);
        assert_eq!(default_meals(&p), default_meals(&p));
    }

    #[test]
    fn test_plan_from_profile() {
        let plan = Plan::from_profile(&sample_profile(DietaryPreference::NoPreference));
        assert_eq!(plan.days.len(), 7);
        for (i, day) in plan.days.iter().enumerate() {
            assert_eq!(day.day_index, i);
        }
        assert_eq!(plan.created_at, plan.updated_at);
    }

    #[test]
    fn test_add_edit_delete_meal() {
        let mut plan = Plan::from_profile(&sample_profile(DietaryPreference::NoPreference));
        let added = plan.add_meal(2, "Buttermilk", MealType::from("Drink"), 60).unwrap();
        assert!(!added.id.starts_with("default-"));
        assert_eq!(plan.days[2].meals.len(), 5);
        assert_eq!(plan.days[2].meals.last().unwrap().id, added.id);

        let edited = plan
            .edit_meal(2, &added.id, "Chaas", MealType::Snack, 45)
            .unwrap();
        assert_eq!(edited.name, "Chaas");
        assert_eq!(plan.days[2].meals[4].calories, 45);

        let removed = plan.delete_meal(2, &added.id).unwrap();
        assert_eq!(removed.map(|m| m.name), Some("Chaas".to_string()));
        assert_eq!(plan.days[2].meals.len(), 4);
        assert!(plan.delete_meal(2, &added.id).unwrap().is_none());
    }

    #[test]
    fn test_user_meal_ids_are_unique() {
        let mut plan = Plan::from_profile(&sample_profile(DietaryPreference::NoPreference));
        let a = plan.add_meal(0, "A", MealType::Snack, 10).unwrap();
        let b = plan.add_meal(0, "B", MealType::Snack, 10).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_edit_unknown_meal_fails() {
        let mut plan = Plan::from_profile(&sample_profile(DietaryPreference::NoPreference));
        assert!(plan.edit_meal(0, "missing", "X", MealType::Lunch, 100).is_err());
        assert!(plan.set_note(0, "missing", "note").is_err());
        assert!(plan.day(7).is_err());
    }

    #[test]
    fn test_set_completed_reports_day_completion() {
        let mut plan = Plan::from_profile(&sample_profile(DietaryPreference::NoPreference));
        let ids: Vec<String> = plan.days[1].meals.iter().map(|m| m.id.clone()).collect();
        for id in &ids[..3] {
            assert!(!plan.set_completed(1, id, true).unwrap());
        }
        assert!(plan.set_completed(1, &ids[3], true).unwrap());
        assert!(plan.days[1].is_complete());
        assert!(!plan.set_completed(1, &ids[0], false).unwrap());
    }

    #[test]
    fn test_day_totals() {
        let mut plan = Plan::from_profile(&sample_profile(DietaryPreference::NoPreference));
        plan.set_completed(0, "default-0-breakfast", true).unwrap();
        plan.set_completed(0, "default-0-snack", true).unwrap();
        let day = plan.day(0).unwrap();
        assert_eq!(day.consumed_calories(), 514 + 206);
        assert_eq!(day.planned_calories(), 514 + 720 + 206 + 617);
    }

    #[test]
    fn test_empty_day_is_not_complete() {
        let day = Day {
            day_index: 0,
            meals: Vec::new(),
        };
        assert!(!day.is_complete());
    }

    #[test]
    fn test_set_note() {
        let mut plan = Plan::from_profile(&sample_profile(DietaryPreference::NoPreference));
        plan.set_note(4, "default-4-dinner", "less salt").unwrap();
        assert_eq!(plan.days[4].meals[3].note, "less salt");
    }

    #[test]
    fn test_plan_to_text() {
        let mut plan = Plan::from_profile(&sample_profile(DietaryPreference::NoPreference));
        plan.days[6].meals.clear();
        let text = plan_to_text(&plan, Some(1800));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Nutrify — 7-Day Diet Plan");
        assert_eq!(lines[1].chars().count(), 40);
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Monday  (Goal: 1800 kcal)");
        assert_eq!(lines[4].chars().count(), 36);
        assert_eq!(lines[5], "  • [Breakfast] Poha with peanuts — 514 kcal");
        assert!(text.contains("Sunday  (Goal: 1800 kcal)"));
        assert!(text.contains("  (no meals)"));
    }

    #[test]
    fn test_plan_to_text_without_goal() {
        let plan = Plan::from_profile(&sample_profile(DietaryPreference::NoPreference));
        assert!(plan_to_text(&plan, None).contains("Monday  (Goal: — kcal)"));
    }
}
