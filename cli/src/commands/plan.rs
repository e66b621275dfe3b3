use std::path::Path;

use anyhow::{Context, Result};

use nutrify_core::models::{Day, WATER_MAX, day_name, parse_day};
use nutrify_core::service::TrackerService;
use nutrify_core::storage::KeyValueStore;

use super::helpers::{print_json, print_meals_table, today};

fn print_day_header(day: &Day, goal: i64, water: Option<u8>) {
    let consumed = day.consumed_calories();
    let remaining = goal - consumed;
    let name = day_name(day.day_index);

    let status = if remaining >= 0 {
        format!("{remaining} kcal left")
    } else {
        format!("{} kcal over", remaining.abs())
    };
    println!("=== {name} ===  Goal: {goal} kcal  |  {consumed} / {goal} kcal  |  {status}");
    if consumed > goal {
        println!("⚠️  Over budget!");
    }
    if day.is_complete() {
        println!("✅ Day complete!");
    }
    if let Some(glasses) = water {
        println!("{}", water_line(glasses));
    }
}

fn water_line(glasses: u8) -> String {
    format!("Water today: {glasses}/{WATER_MAX}")
}

pub(crate) fn cmd_plan_show<S: KeyValueStore>(
    svc: &TrackerService<S>,
    day: Option<&str>,
    json: bool,
) -> Result<()> {
    let plan = svc.plan_or_init()?;
    let goal = svc.daily_goal()?;
    let days: Vec<&Day> = match day {
        Some(d) => vec![plan.day(parse_day(d)?)?],
        None => plan.days.iter().collect(),
    };

    if json {
        return print_json(&serde_json::json!({ "goal": goal, "days": days }));
    }

    let today = today();
    let today_index = {
        use chrono::Datelike;
        today.weekday().num_days_from_monday() as usize
    };

    for (i, d) in days.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let water = (d.day_index == today_index).then(|| svc.water(today));
        print_day_header(d, goal, water);
        if d.meals.is_empty() {
            println!("  (no meals)");
        } else {
            print_meals_table(d);
        }
    }

    Ok(())
}

pub(crate) fn cmd_plan_export<S: KeyValueStore>(
    svc: &TrackerService<S>,
    output: Option<&Path>,
) -> Result<()> {
    let text = svc.export_text()?;
    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Plan exported to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

pub(crate) fn cmd_plan_regenerate<S: KeyValueStore>(
    svc: &TrackerService<S>,
    json: bool,
) -> Result<()> {
    let plan = svc.regenerate_plan()?;
    if json {
        print_json(&plan)?;
    } else {
        let goal = svc.daily_goal()?;
        println!("Regenerated the 7-day plan ({goal} kcal/day). Meal edits and check-offs were reset.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrify_core::models::{ActivityLevel, DietaryPreference, Goal, NewProfile, Sex};

    fn svc() -> TrackerService<nutrify_core::storage::MemoryStorage> {
        let svc = TrackerService::new_in_memory();
        svc.onboard(&NewProfile {
            goal: Goal::Maintain,
            activity_level: ActivityLevel::Sedentary,
            sex: Sex::Female,
            age: 30,
            weight_kg: 70.0,
            height_cm: 175.0,
            dietary_preference: DietaryPreference::Vegetarian,
        })
        .unwrap();
        svc
    }

    #[test]
    fn test_water_line_uses_daily_max() {
        assert_eq!(water_line(3), format!("Water today: 3/{WATER_MAX}"));
    }

    #[test]
    fn test_plan_show_requires_valid_day() {
        let svc = svc();
        assert!(cmd_plan_show(&svc, Some("mon"), true).is_ok());
        assert!(cmd_plan_show(&svc, Some("8"), true).is_err());
    }

    #[test]
    fn test_plan_export_to_file() {
        let svc = svc();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.txt");
        cmd_plan_export(&svc, Some(&path)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Nutrify — 7-Day Diet Plan"));
        assert!(text.contains("[Lunch] Paneer curry with rice"));
    }
}
