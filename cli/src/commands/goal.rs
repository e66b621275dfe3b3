use anyhow::Result;

use nutrify_core::service::TrackerService;
use nutrify_core::storage::KeyValueStore;

pub(crate) fn cmd_goal_show<S: KeyValueStore>(svc: &TrackerService<S>, json: bool) -> Result<()> {
    let suggested = svc.suggested_goal()?;
    let override_kcal = svc.goal_override();
    let effective = override_kcal.unwrap_or(suggested);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "dailyGoal": effective,
                "suggested": suggested,
                "override": override_kcal,
            })
        );
    } else {
        println!("Daily goal: {effective} kcal");
        match override_kcal {
            Some(_) => println!("  (override; suggested from profile: {suggested} kcal)"),
            None => println!("  (computed from profile)"),
        }
    }
    Ok(())
}

pub(crate) fn cmd_goal_set<S: KeyValueStore>(
    svc: &TrackerService<S>,
    kcal: f64,
    json: bool,
) -> Result<()> {
    let kcal = svc.set_goal_override(kcal)?;
    if json {
        println!("{}", serde_json::json!({ "override": kcal }));
    } else {
        println!("Daily goal override set to {kcal} kcal");
    }
    Ok(())
}

pub(crate) fn cmd_goal_clear<S: KeyValueStore>(svc: &TrackerService<S>, json: bool) -> Result<()> {
    svc.clear_goal_override();
    let goal = svc.daily_goal()?;
    if json {
        println!("{}", serde_json::json!({ "override": null, "dailyGoal": goal }));
    } else {
        println!("Override cleared. Daily goal is back to {goal} kcal");
    }
    Ok(())
}
