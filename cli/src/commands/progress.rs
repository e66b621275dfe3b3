use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nutrify_core::calc::tip_for_day;
use nutrify_core::progress::{DayProgress, describe_streak};
use nutrify_core::service::TrackerService;
use nutrify_core::storage::KeyValueStore;

use super::helpers::{parse_day_arg, print_json};

const BAR_WIDTH: usize = 20;

#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn progress_bar(row: &DayProgress) -> String {
    let filled = (row.ratio * BAR_WIDTH as f64).round() as usize;
    let fill = if row.over_budget { '▓' } else { '█' };
    let mut bar: String = std::iter::repeat_n(fill, filled.min(BAR_WIDTH)).collect();
    bar.extend(std::iter::repeat_n('░', BAR_WIDTH.saturating_sub(filled)));
    bar
}

pub(crate) fn cmd_progress<S: KeyValueStore>(svc: &TrackerService<S>, json: bool) -> Result<()> {
    let summary = svc.weekly_summary()?;
    let breakdown = svc.daily_breakdown()?;

    if json {
        return print_json(&serde_json::json!({
            "summary": summary,
            "days": breakdown,
            "streak": svc.streak(),
        }));
    }

    println!("=== This week ===\n");
    println!("  {:>7} kcal consumed", summary.total_consumed);
    println!("  {:>7} kcal weekly goal", summary.weekly_goal);
    println!("  {:>7} kcal planned", summary.total_planned);
    println!("  {:>7} days completed", summary.days_completed);
    println!("  {:>7} avg kcal / active day", summary.average_per_active_day);
    println!();

    #[derive(Tabled)]
    struct DayRow {
        #[tabled(rename = "Day")]
        day: &'static str,
        #[tabled(rename = "Consumed")]
        consumed: String,
        #[tabled(rename = "Progress")]
        bar: String,
        #[tabled(rename = "%")]
        percent: String,
        #[tabled(rename = "Status")]
        status: &'static str,
    }

    let rows: Vec<DayRow> = breakdown
        .iter()
        .map(|r| DayRow {
            day: r.day_name,
            consumed: format!("{} / {}", r.consumed, r.goal),
            bar: progress_bar(r),
            percent: format!("{:.1}", r.percent),
            status: if r.over_budget {
                "over budget"
            } else if r.complete {
                "complete"
            } else {
                ""
            },
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
        .with(Modify::new(Columns::new(3..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    println!("\nStreak: {}", describe_streak(&svc.streak()));
    Ok(())
}

pub(crate) fn cmd_streak<S: KeyValueStore>(svc: &TrackerService<S>, json: bool) -> Result<()> {
    let streak = svc.streak();
    if json {
        print_json(&streak)?;
    } else {
        println!("🔥 Streak: {}", describe_streak(&streak));
    }
    Ok(())
}

/// Tip for a plan day (default today).
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn cmd_tip(day: Option<&str>, json: bool) -> Result<()> {
    let tip = tip_for_day(parse_day_arg(day)? as i64);
    if json {
        println!("{}", serde_json::json!({ "tip": tip }));
    } else {
        println!("💡 {tip}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ratio: f64, over_budget: bool) -> DayProgress {
        DayProgress {
            day_index: 0,
            day_name: "Monday",
            consumed: 0,
            goal: 2000,
            remaining: 2000,
            ratio,
            percent: ratio * 100.0,
            over_budget,
            complete: false,
        }
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(&row(0.0, false)), "░".repeat(20));
        assert_eq!(progress_bar(&row(0.5, false)), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        assert_eq!(progress_bar(&row(1.0, true)), "▓".repeat(20));
    }

    #[test]
    fn test_progress_requires_profile() {
        let svc = TrackerService::new_in_memory();
        assert!(cmd_progress(&svc, true).is_err());
    }

    #[test]
    fn test_tip_accepts_day() {
        assert!(cmd_tip(Some("wed"), true).is_ok());
        assert!(cmd_tip(Some("nope"), true).is_err());
    }
}
