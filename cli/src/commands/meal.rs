use anyhow::Result;
use std::process;

use nutrify_core::models::{Meal, day_name};
use nutrify_core::service::TrackerService;
use nutrify_core::storage::KeyValueStore;

use super::helpers::{json_error, parse_day_arg, print_json, today};

fn print_meal(verb: &str, day: usize, meal: &Meal) {
    println!(
        "{verb} [{}] {} — {} kcal on {} (id: {})",
        meal.meal_type,
        meal.name,
        meal.calories,
        day_name(day),
        meal.id
    );
}

pub(crate) fn cmd_meal_add<S: KeyValueStore>(
    svc: &TrackerService<S>,
    day: Option<&str>,
    name: &str,
    meal_type: &str,
    calories: f64,
    json: bool,
) -> Result<()> {
    let day = parse_day_arg(day)?;
    let meal = svc.add_meal(day, name, meal_type, calories)?;
    if json {
        print_json(&meal)?;
    } else {
        print_meal("Added", day, &meal);
    }
    Ok(())
}

pub(crate) fn cmd_meal_edit<S: KeyValueStore>(
    svc: &TrackerService<S>,
    day: Option<&str>,
    meal_id: &str,
    name: Option<&str>,
    meal_type: Option<&str>,
    calories: Option<f64>,
    json: bool,
) -> Result<()> {
    let day = parse_day_arg(day)?;
    let plan = svc.plan_or_init()?;
    let Some(current) = plan.day(day)?.meals.iter().find(|m| m.id == meal_id) else {
        let msg = format!("Meal '{meal_id}' not found on {}", day_name(day));
        if json {
            println!("{}", json_error(&msg));
        } else {
            eprintln!("{msg}");
        }
        process::exit(2);
    };

    #[allow(clippy::cast_precision_loss)]
    let meal = svc.edit_meal(
        day,
        meal_id,
        name.unwrap_or(current.name.as_str()),
        meal_type.unwrap_or(current.meal_type.as_str()),
        calories.unwrap_or(current.calories as f64),
    )?;

    if json {
        print_json(&meal)?;
    } else {
        print_meal("Updated", day, &meal);
    }
    Ok(())
}

pub(crate) fn cmd_meal_delete<S: KeyValueStore>(
    svc: &TrackerService<S>,
    day: Option<&str>,
    meal_id: &str,
    json: bool,
) -> Result<()> {
    let day = parse_day_arg(day)?;
    if svc.delete_meal(day, meal_id)? {
        if json {
            println!("{}", serde_json::json!({ "deleted": meal_id }));
        } else {
            println!("Deleted meal {meal_id} from {}", day_name(day));
        }
        Ok(())
    } else {
        let msg = format!("Meal '{meal_id}' not found on {}", day_name(day));
        if json {
            println!("{}", json_error(&msg));
        } else {
            eprintln!("{msg}");
        }
        process::exit(2);
    }
}

/// Check a meal off (or back on). Completing the last open meal of a day
/// advances the streak using today's date.
pub(crate) fn cmd_meal_done<S: KeyValueStore>(
    svc: &TrackerService<S>,
    day: Option<&str>,
    meal_id: &str,
    completed: bool,
    json: bool,
) -> Result<()> {
    let day = parse_day_arg(day)?;
    let day_complete = svc.toggle_meal(day, meal_id, completed, today())?;
    let streak = svc.streak();

    if json {
        print_json(&serde_json::json!({
            "mealId": meal_id,
            "completed": completed,
            "dayComplete": day_complete,
            "streak": streak,
        }))?;
    } else {
        let state = if completed { "done" } else { "not done" };
        println!("Marked {meal_id} as {state}");
        if completed && day_complete {
            println!("✅ {} complete! Streak: {} day(s)", day_name(day), streak.count);
        }
    }
    Ok(())
}

pub(crate) fn cmd_meal_note<S: KeyValueStore>(
    svc: &TrackerService<S>,
    day: Option<&str>,
    meal_id: &str,
    note: &str,
    json: bool,
) -> Result<()> {
    let day = parse_day_arg(day)?;
    svc.set_meal_note(day, meal_id, note)?;
    if json {
        println!("{}", serde_json::json!({ "mealId": meal_id, "note": note }));
    } else if note.is_empty() {
        println!("Cleared note on {meal_id}");
    } else {
        println!("Saved note on {meal_id}");
    }
    Ok(())
}
