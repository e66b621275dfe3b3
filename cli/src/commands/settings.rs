use anyhow::{Result, bail};
use clap::Args;

use nutrify_core::calc::compute_goal;
use nutrify_core::models::{ActivityLevel, DietaryPreference, Goal, NewProfile, Profile, Sex, Theme};
use nutrify_core::service::TrackerService;
use nutrify_core::storage::KeyValueStore;

use super::helpers::{height_in_cm, print_json, weight_in_kg};

/// Partial profile update; anything not passed keeps its current value.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SettingsArgs {
    /// Goal: lose_weight, maintain, gain_muscle
    #[arg(long)]
    pub goal: Option<String>,
    /// Activity: sedentary, lightly_active, moderately_active, very_active
    #[arg(long)]
    pub activity: Option<String>,
    /// Sex: male or female
    #[arg(long)]
    pub sex: Option<String>,
    /// Age in years (10-100)
    #[arg(long)]
    pub age: Option<u32>,
    /// Body weight (20-300 kg)
    #[arg(long)]
    pub weight: Option<f64>,
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
    #[arg(long)]
    pub diet: Option<String>,
    /// Daily calorie override (500-9999)
    #[arg(long = "override", value_name = "KCAL", conflicts_with = "no_override")]
    pub goal_override: Option<f64>,
    /// Remove the daily calorie override
    #[arg(long)]
    pub no_override: bool,
}

impl SettingsArgs {
    pub(crate) fn merge(&self, current: &Profile) -> Result<NewProfile> {
        let height_cm = if self.height.is_some() || self.feet.is_some() {
            height_in_cm(self.height, self.feet, self.inches)?
        } else {
            current.height_cm
        };

        Ok(NewProfile {
            goal: self
                .goal
                .as_deref()
                .map_or(Ok(current.goal), Goal::parse)?,
            activity_level: self
                .activity
                .as_deref()
                .map_or(Ok(current.activity_level), ActivityLevel::parse)?,
            sex: self.sex.as_deref().map_or(Ok(current.sex), Sex::parse)?,
            age: self.age.unwrap_or(current.age),
            weight_kg: match self.weight {
                Some(w) => weight_in_kg(w, &self.unit)?,
                None => current.weight_kg,
            },
            height_cm,
            dietary_preference: self
                .diet
                .as_deref()
                .map_or(Ok(current.dietary_preference), DietaryPreference::parse)?,
        })
    }

    /// Override to save: explicit value, explicit removal, or the current one.
    #[allow(clippy::cast_precision_loss)]
    fn resolve_override(&self, current: Option<i64>) -> Option<f64> {
        if self.no_override {
            None
        } else {
            self.goal_override.or(current.map(|k| k as f64))
        }
    }
}

fn format_profile(profile: &Profile, suggested: i64, goal_override: Option<i64>) -> String {
    let override_line = match goal_override {
        Some(kcal) => format!("{kcal} kcal/day"),
        None => "(none)".to_string(),
    };
    [
        format!("Goal:        {}", profile.goal),
        format!("Activity:    {}", profile.activity_level),
        format!("Sex:         {}", profile.sex),
        format!("Age:         {}", profile.age),
        format!("Weight:      {:.1} kg", profile.weight_kg),
        format!("Height:      {:.1} cm", profile.height_cm),
        format!("Diet:        {}", profile.dietary_preference),
        format!("Suggested:   {suggested} kcal/day"),
        format!("Override:    {override_line}"),
    ]
    .join("\n")
}

pub(crate) fn cmd_settings_show<S: KeyValueStore>(
    svc: &TrackerService<S>,
    json: bool,
) -> Result<()> {
    let profile = svc.require_profile()?;
    let suggested = compute_goal(&profile);
    let goal_override = svc.goal_override();

    if json {
        print_json(&serde_json::json!({
            "profile": profile,
            "suggestedGoal": suggested,
            "goalOverride": goal_override,
            "theme": svc.theme(),
        }))
    } else {
        println!("{}", format_profile(&profile, suggested, goal_override));
        println!("Theme:       {}", svc.theme());
        Ok(())
    }
}

pub(crate) fn cmd_settings_update<S: KeyValueStore>(
    svc: &TrackerService<S>,
    args: &SettingsArgs,
    json: bool,
) -> Result<()> {
    let current = svc.require_profile()?;
    let new_profile = args.merge(&current)?;
    let goal_override = args.resolve_override(svc.goal_override());

    let profile = svc.save_settings(&new_profile, goal_override)?;
    let suggested = compute_goal(&profile);

    if json {
        print_json(&serde_json::json!({
            "profile": profile,
            "suggestedGoal": suggested,
            "goalOverride": svc.goal_override(),
        }))
    } else {
        println!("Settings saved!\n");
        println!("{}", format_profile(&profile, suggested, svc.goal_override()));
        Ok(())
    }
}

/// Show the theme, or set it to `light`, `dark` or `toggle`.
pub(crate) fn cmd_theme<S: KeyValueStore>(
    svc: &TrackerService<S>,
    mode: Option<&str>,
    json: bool,
) -> Result<()> {
    let theme = match mode {
        None => svc.theme(),
        Some("toggle") => svc.toggle_theme(),
        Some(s) => {
            let theme = Theme::parse(s)?;
            svc.set_theme(theme);
            theme
        }
    };

    if json {
        println!("{}", serde_json::json!({ "theme": theme }));
    } else {
        println!("Theme: {theme}");
    }
    Ok(())
}

pub(crate) fn cmd_reset<S: KeyValueStore>(
    svc: &TrackerService<S>,
    yes: bool,
    json: bool,
) -> Result<()> {
    if !yes {
        bail!("This deletes all your data and restarts onboarding. Re-run with --yes to confirm");
    }
    svc.reset();
    if json {
        println!("{}", serde_json::json!({ "reset": true }));
    } else {
        println!("All data deleted. Run `nutrify onboard` to start again.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrify_core::storage::MemoryStorage;

    fn svc() -> TrackerService<MemoryStorage> {
        let svc = TrackerService::new_in_memory();
        svc.onboard(&NewProfile {
            goal: Goal::LoseWeight,
            activity_level: ActivityLevel::ModeratelyActive,
            sex: Sex::Male,
            age: 30,
            weight_kg: 70.0,
            height_cm: 175.0,
            dietary_preference: DietaryPreference::NoPreference,
        })
        .unwrap();
        svc
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let svc = svc();
        let current = svc.require_profile().unwrap();
        let args = SettingsArgs {
            age: Some(31),
            diet: Some("vegan".to_string()),
            unit: "kg".to_string(),
            ..SettingsArgs::default()
        };
        let merged = args.merge(&current).unwrap();
        assert_eq!(merged.age, 31);
        assert_eq!(merged.dietary_preference, DietaryPreference::Vegan);
        assert_eq!(merged.goal, Goal::LoseWeight);
        assert!((merged.height_cm - 175.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_profile_uses_input_spelling() {
        let svc = svc();
        let profile = svc.require_profile().unwrap();
        let text = format_profile(&profile, 2056, None);
        assert!(text.contains("Goal:        lose_weight"));
        assert!(text.contains("Activity:    moderately_active"));
        assert!(text.contains("Sex:         male"));
        assert!(text.contains("Diet:        none"));
        assert!(text.contains("Override:    (none)"));
        assert!(!text.contains("LoseWeight"));
    }

    #[test]
    fn test_resolve_override() {
        let keep = SettingsArgs::default();
        assert_eq!(keep.resolve_override(Some(1800)), Some(1800.0));
        assert_eq!(keep.resolve_override(None), None);

        let set = SettingsArgs {
            goal_override: Some(2100.0),
            ..SettingsArgs::default()
        };
        assert_eq!(set.resolve_override(Some(1800)), Some(2100.0));

        let clear = SettingsArgs {
            no_override: true,
            ..SettingsArgs::default()
        };
        assert_eq!(clear.resolve_override(Some(1800)), None);
    }

    #[test]
    fn test_settings_update_rejects_light_weight() {
        let svc = svc();
        let args = SettingsArgs {
            weight: Some(15.0),
            unit: "kg".to_string(),
            ..SettingsArgs::default()
        };
        assert!(cmd_settings_update(&svc, &args, true).is_err());
        assert!((svc.require_profile().unwrap().weight_kg - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_theme_modes() {
        let svc = TrackerService::new_in_memory();
        cmd_theme(&svc, Some("toggle"), true).unwrap();
        assert_eq!(svc.theme(), Theme::Dark);
        cmd_theme(&svc, Some("light"), true).unwrap();
        assert_eq!(svc.theme(), Theme::Light);
        assert!(cmd_theme(&svc, Some("neon"), true).is_err());
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let svc = svc();
        assert!(cmd_reset(&svc, false, true).is_err());
        assert!(svc.profile().is_some());
        cmd_reset(&svc, true, true).unwrap();
        assert!(svc.profile().is_none());
    }
}
