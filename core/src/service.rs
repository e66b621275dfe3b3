use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use log::{debug, info};

use crate::calc::{compute_goal, round_one_decimal};
use crate::models::{
    Meal, MealType, NewProfile, Plan, Profile, Streak, Theme, WeightEntry, validate_body_weight,
    validate_goal_override, validate_meal_calories, validate_meal_name, validate_new_profile,
    validate_settings_profile, validate_water_count,
};
use crate::plan::plan_to_text;
use crate::progress::{
    DayProgress, WeeklySummary, WeightChart, daily_breakdown, next_streak, weekly_summary,
    weight_chart,
};
use crate::storage::{KeyValueStore, MemoryStorage, SqliteStorage};
use crate::store::Store;

/// Application context: owns the store and runs every user-facing operation
/// as a read, modify, write against it.
pub struct TrackerService<S> {
    store: Store<S>,
}

impl TrackerService<SqliteStorage> {
    pub fn open(db_path: &Path) -> Result<Self> {
        let backend = SqliteStorage::open(db_path)?;
        Ok(Self::new(backend))
    }
}

impl TrackerService<MemoryStorage> {
    #[must_use]
    pub fn new_in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }
}

impl<S: KeyValueStore> TrackerService<S> {
    pub fn new(backend: S) -> Self {
        Self {
            store: Store::new(backend),
        }
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    // --- Profile ---

    /// Store a fresh profile, drop any goal override and build the default plan.
    pub fn onboard(&self, new_profile: &NewProfile) -> Result<Plan> {
        validate_new_profile(new_profile)?;
        let profile = Profile {
            goal: new_profile.goal,
            activity_level: new_profile.activity_level,
            sex: new_profile.sex,
            age: new_profile.age,
            weight_kg: round_one_decimal(new_profile.weight_kg),
            height_cm: round_one_decimal(new_profile.height_cm),
            dietary_preference: new_profile.dietary_preference,
            created_at: Some(Utc::now().to_rfc3339()),
        };

        let mut plan = Plan::from_profile(&profile);
        self.store.set_profile(&profile);
        self.store.set_goal_override(None);
        self.store.set_plan(&mut plan);
        info!("Onboarded profile with daily goal {}", compute_goal(&profile));
        Ok(plan)
    }

    pub fn profile(&self) -> Option<Profile> {
        self.store.profile()
    }

    pub fn require_profile(&self) -> Result<Profile> {
        self.store
            .profile()
            .context("No profile found. Run `nutrify onboard` first")
    }

    /// Replace the profile from the settings form. The goal override is set
    /// when given and removed otherwise.
    pub fn save_settings(
        &self,
        new_profile: &NewProfile,
        goal_override: Option<f64>,
    ) -> Result<Profile> {
        validate_settings_profile(new_profile)?;
        let goal_override = goal_override.map(validate_goal_override).transpose()?;

        let created_at = self.store.profile().and_then(|p| p.created_at);
        let profile = Profile {
            goal: new_profile.goal,
            activity_level: new_profile.activity_level,
            sex: new_profile.sex,
            age: new_profile.age,
            weight_kg: new_profile.weight_kg,
            height_cm: new_profile.height_cm,
            dietary_preference: new_profile.dietary_preference,
            created_at,
        };

        self.store.set_profile(&profile);
        match goal_override {
            Some(kcal) => self.store.set_goal_override(Some(kcal)),
            None => self.store.clear_goal_override(),
        }
        Ok(profile)
    }

    // --- Goal ---

    pub fn suggested_goal(&self) -> Result<i64> {
        Ok(compute_goal(&self.require_profile()?))
    }

    /// The override when present, otherwise the computed goal.
    pub fn daily_goal(&self) -> Result<i64> {
        match self.store.goal_override() {
            Some(kcal) => Ok(kcal),
            None => self.suggested_goal(),
        }
    }

    pub fn goal_override(&self) -> Option<i64> {
        self.store.goal_override()
    }

    pub fn set_goal_override(&self, kcal: f64) -> Result<i64> {
        let kcal = validate_goal_override(kcal)?;
        self.store.set_goal_override(Some(kcal));
        Ok(kcal)
    }

    pub fn clear_goal_override(&self) {
        self.store.clear_goal_override();
    }

    // --- Plan ---

    /// Load the stored plan, creating and saving the default one if missing.
    pub fn plan_or_init(&self) -> Result<Plan> {
        if let Some(plan) = self.store.plan() {
            return Ok(plan);
        }
        let profile = self.require_profile()?;
        let mut plan = Plan::from_profile(&profile);
        self.store.set_plan(&mut plan);
        debug!("Initialized default plan");
        Ok(plan)
    }

    /// Discard the current plan and rebuild it from the stored profile.
    pub fn regenerate_plan(&self) -> Result<Plan> {
        let profile = self.require_profile()?;
        let mut plan = Plan::from_profile(&profile);
        self.store.set_plan(&mut plan);
        Ok(plan)
    }

    fn update_plan<T>(&self, f: impl FnOnce(&mut Plan) -> Result<T>) -> Result<T> {
        let mut plan = self.plan_or_init()?;
        let out = f(&mut plan)?;
        self.store.set_plan(&mut plan);
        Ok(out)
    }

    /// Mark a meal done or not done. The streak only advances when this call
    /// moves the day from incomplete to complete. Returns whether the day is
    /// complete afterwards.
    pub fn toggle_meal(
        &self,
        day: usize,
        meal_id: &str,
        completed: bool,
        today: NaiveDate,
    ) -> Result<bool> {
        let (was_complete, day_complete) = self.update_plan(|plan| {
            let was_complete = plan.day(day)?.is_complete();
            let now_complete = plan.set_completed(day, meal_id, completed)?;
            Ok((was_complete, now_complete))
        })?;
        if day_complete && !was_complete {
            let streak = next_streak(self.store.streak(), today);
            self.store.set_streak(&streak);
            debug!("Day {day} complete, streak now {}", streak.count);
        }
        Ok(day_complete)
    }

    pub fn add_meal(&self, day: usize, name: &str, meal_type: &str, calories: f64) -> Result<Meal> {
        let name = validate_meal_name(name)?;
        let calories = validate_meal_calories(calories)?;
        self.update_plan(|plan| plan.add_meal(day, &name, MealType::from(meal_type), calories))
    }

    pub fn edit_meal(
        &self,
        day: usize,
        meal_id: &str,
        name: &str,
        meal_type: &str,
        calories: f64,
    ) -> Result<Meal> {
        let name = validate_meal_name(name)?;
        let calories = validate_meal_calories(calories)?;
        self.update_plan(|plan| {
            plan.edit_meal(day, meal_id, &name, MealType::from(meal_type), calories)
        })
    }

    /// Returns `false` when no meal had that id.
    pub fn delete_meal(&self, day: usize, meal_id: &str) -> Result<bool> {
        let removed = self.update_plan(|plan| plan.delete_meal(day, meal_id))?;
        Ok(removed.is_some())
    }

    pub fn set_meal_note(&self, day: usize, meal_id: &str, note: &str) -> Result<()> {
        self.update_plan(|plan| plan.set_note(day, meal_id, note))
    }

    pub fn export_text(&self) -> Result<String> {
        let plan = self
            .store
            .plan()
            .context("No plan yet. Run `nutrify onboard` first")?;
        let goal = match self.store.goal_override() {
            Some(kcal) => Some(kcal),
            None => self.store.profile().map(|p| compute_goal(&p)),
        };
        Ok(plan_to_text(&plan, goal))
    }

    // --- Water ---

    pub fn water(&self, date: NaiveDate) -> u8 {
        self.store.water(date)
    }

    pub fn set_water(&self, date: NaiveDate, count: u8) -> Result<u8> {
        let count = validate_water_count(count)?;
        self.store.set_water(date, i64::from(count));
        Ok(count)
    }

    // --- Weight ---

    pub fn log_weight(&self, date: NaiveDate, weight_kg: f64) -> Result<WeightEntry> {
        let weight = validate_body_weight(weight_kg)?;
        let entry = WeightEntry { date, weight };
        self.store.append_weight(entry);
        Ok(entry)
    }

    pub fn weight_log(&self) -> Vec<WeightEntry> {
        self.store.weight_log()
    }

    pub fn weight_chart(&self, width: f64, height: f64) -> WeightChart {
        weight_chart(&self.store.weight_log(), width, height)
    }

    // --- Progress ---

    pub fn weekly_summary(&self) -> Result<WeeklySummary> {
        let goal = self.daily_goal()?;
        Ok(weekly_summary(&self.plan_or_init()?, goal))
    }

    pub fn daily_breakdown(&self) -> Result<Vec<DayProgress>> {
        let goal = self.daily_goal()?;
        Ok(daily_breakdown(&self.plan_or_init()?, goal))
    }

    pub fn streak(&self) -> Streak {
        self.store.streak()
    }

    // --- Theme ---

    pub fn theme(&self) -> Theme {
        self.store.theme()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.set_theme(theme);
    }

    pub fn toggle_theme(&self) -> Theme {
        let next = self.store.theme().toggled();
        self.store.set_theme(next);
        next
    }

    // --- Reset ---

    pub fn reset(&self) {
        self.store.clear_all();
        info!("All data cleared");
    }
}
