use anyhow::Result;
use clap::Args;

use nutrify_core::calc::compute_goal;
use nutrify_core::models::{ActivityLevel, DietaryPreference, Goal, NewProfile, Sex};
use nutrify_core::service::TrackerService;
use nutrify_core::storage::KeyValueStore;

use super::helpers::{height_in_cm, print_json, weight_in_kg};

#[derive(Args, Debug, Clone)]
pub(crate) struct ProfileArgs {
    /// Goal: lose_weight, maintain, gain_muscle
    #[arg(long)]
    pub goal: String,
    /// Activity: sedentary, lightly_active, moderately_active, very_active
    #[arg(long)]
    pub activity: String,
    /// Sex: male or female
    #[arg(long)]
    pub sex: String,
    /// Age in years (10-100)
    #[arg(long)]
    pub age: u32,
    /// Body weight
    #[arg(long)]
    pub weight: f64,
    /// Weight unit: kg or lbs
    #[arg(long, default_value = "kg")]
    pub unit: String,
    /// Height in cm (100-250)
    #[arg(long)]
    pub height: Option<f64>,
    /// Height in feet (use with --inches instead of --height)
    #[arg(long)]
    pub feet: Option<f64>,
    /// Extra inches (0-11)
    #[arg(long)]
    pub inches: Option<f64>,
    /// Dietary preference: none, vegetarian, vegan
    #[arg(long, default_value = "none")]
    pub diet: String,
}

impl ProfileArgs {
    pub(crate) fn to_new_profile(&self) -> Result<NewProfile> {
        Ok(NewProfile {
            goal: Goal::parse(&self.goal)?,
            activity_level: ActivityLevel::parse(&self.activity)?,
            sex: Sex::parse(&self.sex)?,
            age: self.age,
            weight_kg: weight_in_kg(self.weight, &self.unit)?,
            height_cm: height_in_cm(self.height, self.feet, self.inches)?,
            dietary_preference: DietaryPreference::parse(&self.diet)?,
        })
    }
}

pub(crate) fn cmd_onboard<S: KeyValueStore>(
    svc: &TrackerService<S>,
    args: &ProfileArgs,
    json: bool,
) -> Result<()> {
    if svc.profile().is_some() {
        eprintln!("Replacing existing profile and plan");
    }

    let new_profile = args.to_new_profile()?;
    let plan = svc.onboard(&new_profile)?;
    let profile = svc.require_profile()?;
    let goal = compute_goal(&profile);

    if json {
        print_json(&serde_json::json!({
            "profile": profile,
            "dailyGoal": goal,
            "plan": plan,
        }))?;
    } else {
        println!("Welcome to Nutrify!");
        println!("  Daily goal: {goal} kcal");
        let meals: usize = plan.days.iter().map(|d| d.meals.len()).sum();
        println!("  Plan: 7 days, {meals} meals");
        println!("\nRun `nutrify plan show` to see today's meals.");
    }

    Ok(())
}
