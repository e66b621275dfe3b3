use std::fmt;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DAY_NAMES: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const DAYS_PER_PLAN: usize = 7;

/// Glasses of water tracked per day.
pub const WATER_MAX: u8 = 8;

pub const MIN_AGE: u32 = 10;
pub const MAX_AGE: u32 = 100;
pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 250.0;
pub const MIN_BODY_WEIGHT_KG: f64 = 20.0;
pub const MAX_BODY_WEIGHT_KG: f64 = 300.0;
pub const MIN_MEAL_CALORIES: i64 = 1;
pub const MAX_MEAL_CALORIES: i64 = 9999;
pub const MIN_GOAL_OVERRIDE: i64 = 500;
pub const MAX_GOAL_OVERRIDE: i64 = 9999;

// --- Profile ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    Maintain,
    GainMuscle,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
    #[default]
    #[serde(rename = "none")]
    NoPreference,
    Vegetarian,
    Vegan,
    #[serde(other)]
    Unknown,
}

impl Goal {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "lose_weight" | "lose" => Ok(Self::LoseWeight),
            "maintain" => Ok(Self::Maintain),
            "gain_muscle" | "gain" => Ok(Self::GainMuscle),
            _ => bail!("Invalid goal '{s}'. Must be one of: lose_weight, maintain, gain_muscle"),
        }
    }
}

impl ActivityLevel {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "lightly_active" | "light" => Ok(Self::LightlyActive),
            "moderately_active" | "moderate" => Ok(Self::ModeratelyActive),
            "very_active" | "very" => Ok(Self::VeryActive),
            _ => bail!(
                "Invalid activity level '{s}'. Must be one of: sedentary, lightly_active, moderately_active, very_active"
            ),
        }
    }
}

impl Sex {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => bail!("Invalid sex '{s}'. Must be one of: male, female"),
        }
    }
}

impl DietaryPreference {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::NoPreference),
            "vegetarian" | "veg" => Ok(Self::Vegetarian),
            "vegan" => Ok(Self::Vegan),
            _ => bail!("Invalid dietary preference '{s}'. Must be one of: none, vegetarian, vegan"),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LoseWeight => "lose_weight",
            Self::Maintain => "maintain",
            Self::GainMuscle => "gain_muscle",
            Self::Unknown => "unknown",
        })
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sedentary => "sedentary",
            Self::LightlyActive => "lightly_active",
            Self::ModeratelyActive => "moderately_active",
            Self::VeryActive => "very_active",
            Self::Unknown => "unknown",
        })
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "male",
            Self::Female => "female",
        })
    }
}

impl fmt::Display for DietaryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoPreference => "none",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub sex: Sex,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(default)]
    pub dietary_preference: DietaryPreference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Profile fields as collected at onboarding or in settings, before validation.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub sex: Sex,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub dietary_preference: DietaryPreference,
}

// --- Plan ---

/// Meal category. Anything outside the four standard slots is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
    Other(String),
}

impl MealType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Snack => "Snack",
            Self::Dinner => "Dinner",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for MealType {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "breakfast" => Self::Breakfast,
            "lunch" => Self::Lunch,
            "snack" => Self::Snack,
            "dinner" => Self::Dinner,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for MealType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<MealType> for String {
    fn from(t: MealType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub calories: i64,
    pub completed: bool,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub day_index: usize,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub days: Vec<Day>,
    pub created_at: String,
    pub updated_at: String,
}

// --- Small records ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => bail!("Invalid theme '{s}'. Must be one of: light, dark"),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub count: u32,
    pub last_completed_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight: f64,
}

// --- Validation ---

pub fn validate_age(age: u32) -> Result<u32> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        bail!("Enter a valid age ({MIN_AGE}-{MAX_AGE})");
    }
    Ok(age)
}

pub fn validate_height_cm(height_cm: f64) -> Result<f64> {
    if !height_cm.is_finite() || !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&height_cm) {
        bail!("Enter a valid height ({MIN_HEIGHT_CM:.0}-{MAX_HEIGHT_CM:.0} cm)");
    }
    Ok(height_cm)
}

/// Feet 3-8 and inches 0-11, as accepted by the imperial height form.
pub fn validate_imperial_height(feet: f64, inches: f64) -> Result<()> {
    if !feet.is_finite() || !(3.0..=8.0).contains(&feet) {
        bail!("Enter valid feet (3-8)");
    }
    if !inches.is_finite() || !(0.0..=11.0).contains(&inches) {
        bail!("Inches must be 0-11");
    }
    Ok(())
}

/// Onboarding only requires a positive weight.
pub fn validate_weight_kg(weight_kg: f64) -> Result<f64> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        bail!("Enter a valid weight");
    }
    Ok(weight_kg)
}

/// Settings and the weight log use the stricter 20-300 kg window.
pub fn validate_body_weight(weight_kg: f64) -> Result<f64> {
    if !weight_kg.is_finite() || !(MIN_BODY_WEIGHT_KG..=MAX_BODY_WEIGHT_KG).contains(&weight_kg) {
        bail!(
            "Enter a valid weight between {MIN_BODY_WEIGHT_KG:.0} and {MAX_BODY_WEIGHT_KG:.0} kg"
        );
    }
    Ok(weight_kg)
}

pub fn validate_new_profile(profile: &NewProfile) -> Result<()> {
    validate_age(profile.age)?;
    validate_weight_kg(profile.weight_kg)?;
    validate_height_cm(profile.height_cm)?;
    Ok(())
}

pub fn validate_settings_profile(profile: &NewProfile) -> Result<()> {
    validate_age(profile.age)?;
    validate_body_weight(profile.weight_kg)?;
    validate_height_cm(profile.height_cm)?;
    Ok(())
}

pub fn validate_meal_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        bail!("Meal name is required");
    }
    Ok(trimmed.to_string())
}

/// Accepts fractional input and rounds to whole kcal.
#[allow(clippy::cast_precision_loss)]
pub fn validate_meal_calories(calories: f64) -> Result<i64> {
    if !calories.is_finite()
        || calories <= 0.0
        || calories > MAX_MEAL_CALORIES as f64
    {
        bail!("Enter calories between {MIN_MEAL_CALORIES} and {MAX_MEAL_CALORIES}");
    }
    Ok((calories.round() as i64).max(MIN_MEAL_CALORIES))
}

#[allow(clippy::cast_precision_loss)]
pub fn validate_goal_override(kcal: f64) -> Result<i64> {
    if !kcal.is_finite() || kcal < MIN_GOAL_OVERRIDE as f64 || kcal > MAX_GOAL_OVERRIDE as f64 {
        bail!("Override must be between {MIN_GOAL_OVERRIDE} and {MAX_GOAL_OVERRIDE} kcal");
    }
    Ok(kcal.round() as i64)
}

pub fn validate_water_count(count: u8) -> Result<u8> {
    if count > WATER_MAX {
        bail!("Water count must be between 0 and {WATER_MAX}");
    }
    Ok(count)
}

pub fn validate_day_index(day: usize) -> Result<usize> {
    if day >= DAYS_PER_PLAN {
        bail!("Day index must be between 0 (Monday) and 6 (Sunday)");
    }
    Ok(day)
}

pub fn parse_date_key(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{s}'. Must be YYYY-MM-DD"))
}

#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Resolve a day argument: 0-6, a full day name, or its three-letter prefix.
pub fn parse_day(s: &str) -> Result<usize> {
    if let Ok(n) = s.parse::<usize>() {
        return validate_day_index(n);
    }
    let lower = s.to_lowercase();
    DAY_NAMES
        .iter()
        .position(|name| {
            let name = name.to_lowercase();
            name == lower || (lower.len() >= 3 && name.starts_with(&lower))
        })
        .with_context(|| format!("Invalid day '{s}'. Use 0-6, monday-sunday, or mon-sun"))
}

#[must_use]
pub fn day_name(day: usize) -> &'static str {
    DAY_NAMES.get(day).copied().unwrap_or("Day")
}
