use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::calc::{progress_ratio, round_half_up};
use crate::models::{Plan, Streak, WeightEntry, date_key, day_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub total_consumed: i64,
    pub total_planned: i64,
    pub weekly_goal: i64,
    pub days_completed: usize,
    pub active_days: usize,
    pub average_per_active_day: i64,
}

/// Totals across the whole plan. Only completed meals count as consumed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn weekly_summary(plan: &Plan, goal: i64) -> WeeklySummary {
    let mut summary = WeeklySummary {
        total_consumed: 0,
        total_planned: 0,
        weekly_goal: goal * 7,
        days_completed: 0,
        active_days: 0,
        average_per_active_day: 0,
    };

    for day in &plan.days {
        let consumed = day.consumed_calories();
        summary.total_consumed += consumed;
        summary.total_planned += day.planned_calories();
        if day.is_complete() {
            summary.days_completed += 1;
        }
        if consumed > 0 {
            summary.active_days += 1;
        }
    }

    if summary.active_days > 0 {
        summary.average_per_active_day =
            round_half_up(summary.total_consumed as f64 / summary.active_days as f64);
    }
    summary
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayProgress {
    pub day_index: usize,
    pub day_name: &'static str,
    pub consumed: i64,
    pub goal: i64,
    /// Negative when over budget.
    pub remaining: i64,
    /// Clamped to 1.0 for display. Use `over_budget` to detect excess.
    pub ratio: f64,
    pub percent: f64,
    pub over_budget: bool,
    pub complete: bool,
}

#[must_use]
pub fn daily_breakdown(plan: &Plan, goal: i64) -> Vec<DayProgress> {
    plan.days
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let consumed = day.consumed_calories();
            let ratio = progress_ratio(consumed, goal).min(1.0);
            DayProgress {
                day_index: i,
                day_name: day_name(i),
                consumed,
                goal,
                remaining: goal - consumed,
                ratio,
                percent: (ratio * 1000.0).round() / 10.0,
                over_budget: consumed > goal,
                complete: day.is_complete(),
            }
        })
        .collect()
}

// --- Weight chart geometry ---

pub const CHART_PAD_TOP: f64 = 16.0;
pub const CHART_PAD_RIGHT: f64 = 16.0;
pub const CHART_PAD_BOTTOM: f64 = 32.0;
pub const CHART_PAD_LEFT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightChart {
    NotEnoughData {
        width: f64,
        height: f64,
    },
    Plot {
        width: f64,
        height: f64,
        points: Vec<ChartPoint>,
        x_labels: Vec<AxisLabel>,
        y_labels: Vec<AxisLabel>,
        min_weight: f64,
        max_weight: f64,
    },
}

/// Lay out weight entries (already sorted by date) inside a `width` x
/// `height` box. Points are spaced evenly by index, not by date.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn weight_chart(entries: &[WeightEntry], width: f64, height: f64) -> WeightChart {
    if entries.len() < 2 {
        return WeightChart::NotEnoughData { width, height };
    }

    let chart_w = width - CHART_PAD_LEFT - CHART_PAD_RIGHT;
    let chart_h = height - CHART_PAD_TOP - CHART_PAD_BOTTOM;

    let min_weight = entries.iter().map(|e| e.weight).fold(f64::INFINITY, f64::min);
    let max_weight = entries
        .iter()
        .map(|e| e.weight)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = if max_weight > min_weight {
        max_weight - min_weight
    } else {
        1.0
    };

    let last = entries.len() - 1;
    let to_x = |i: usize| CHART_PAD_LEFT + (i as f64 / last as f64) * chart_w;
    let to_y = |w: f64| CHART_PAD_TOP + chart_h - ((w - min_weight) / range) * chart_h;

    let points = entries
        .iter()
        .enumerate()
        .map(|(i, e)| ChartPoint {
            x: to_x(i),
            y: to_y(e.weight),
            weight: e.weight,
            date: e.date,
        })
        .collect();

    let x_labels = [0, last / 2, last]
        .into_iter()
        .map(|i| AxisLabel {
            x: to_x(i),
            y: height - 4.0,
            text: entries[i].date.format("%m-%d").to_string(),
        })
        .collect();

    let y_labels = [min_weight, max_weight]
        .into_iter()
        .map(|w| AxisLabel {
            x: CHART_PAD_LEFT - 4.0,
            y: to_y(w) + 4.0,
            text: w.to_string(),
        })
        .collect();

    WeightChart::Plot {
        width,
        height,
        points,
        x_labels,
        y_labels,
        min_weight,
        max_weight,
    }
}

impl WeightChart {
    /// Inline SVG line chart with dot markers and axis labels.
    #[must_use]
    pub fn to_svg(&self) -> String {
        match self {
            WeightChart::NotEnoughData { width, height } => format!(
                "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\">\n  \
                 <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" fill=\"#9E9E9E\" font-size=\"14\">Not enough data</text>\n</svg>",
                width / 2.0,
                height / 2.0
            ),
            WeightChart::Plot {
                width,
                height,
                points,
                x_labels,
                y_labels,
                ..
            } => {
                let polyline = points
                    .iter()
                    .map(|p| format!("{:.1},{:.1}", p.x, p.y))
                    .collect::<Vec<_>>()
                    .join(" ");

                let mut svg = format!(
                    "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\">\n  \
                     <polyline points=\"{polyline}\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\" stroke-linejoin=\"round\" stroke-linecap=\"round\"/>\n"
                );
                for p in points {
                    let _ = writeln!(
                        svg,
                        "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"currentColor\"/>",
                        p.x, p.y
                    );
                }
                for l in x_labels {
                    let _ = writeln!(
                        svg,
                        "  <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\">{}</text>",
                        l.x, l.y, l.text
                    );
                }
                for l in y_labels {
                    let _ = writeln!(
                        svg,
                        "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\">{}</text>",
                        l.x, l.y, l.text
                    );
                }
                svg.push_str("</svg>");
                svg
            }
        }
    }
}

// --- Streak ---

/// Streak after a day is fully completed on `completed_on`.
#[must_use]
pub fn next_streak(streak: Streak, completed_on: NaiveDate) -> Streak {
    let Some(last) = streak.last_completed_date else {
        return Streak {
            count: 1,
            last_completed_date: Some(completed_on),
        };
    };

    match (completed_on - last).num_days() {
        1 => Streak {
            count: streak.count.saturating_add(1),
            last_completed_date: Some(completed_on),
        },
        gap if gap > 1 => Streak {
            count: 1,
            last_completed_date: Some(completed_on),
        },
        // Same day again, or a date before the last completion
        _ => streak,
    }
}

/// Short human label for a streak, e.g. "3 days (last 2024-06-15)".
#[must_use]
pub fn describe_streak(streak: &Streak) -> String {
    let unit = if streak.count == 1 { "day" } else { "days" };
    match streak.last_completed_date {
        Some(date) => format!("{} {unit} (last {})", streak.count, date_key(date)),
        None => format!("{} {unit}", streak.count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Meal, MealType};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn meal(id: &str, calories: i64, completed: bool) -> Meal {
        Meal {
            id: id.to_string(),
            name: id.to_string(),
            meal_type: MealType::Lunch,
            calories,
            completed,
            note: String::new(),
        }
    }

    fn plan_with(days: Vec<Vec<Meal>>) -> Plan {
        Plan {
            days: days
                .into_iter()
                .enumerate()
                .map(|(day_index, meals)| Day { day_index, meals })
                .collect(),
            created_at: "2024-06-10T00:00:00+00:00".to_string(),
            updated_at: "2024-06-10T00:00:00+00:00".to_string(),
        }
    }

    fn sample_plan() -> Plan {
        plan_with(vec![
            vec![meal("a", 500, true), meal("b", 700, true)],
            vec![meal("c", 400, true), meal("d", 600, false)],
            vec![meal("e", 300, false)],
            Vec::new(),
            vec![meal("f", 2500, true)],
            Vec::new(),
            Vec::new(),
        ])
    }

    #[test]
    fn test_weekly_summary() {
        let summary = weekly_summary(&sample_plan(), 2000);
        assert_eq!(summary.total_consumed, 500 + 700 + 400 + 2500);
        assert_eq!(summary.total_planned, 500 + 700 + 400 + 600 + 300 + 2500);
        assert_eq!(summary.weekly_goal, 14_000);
        // Day 0 and day 4; empty days never count
        assert_eq!(summary.days_completed, 2);
        assert_eq!(summary.active_days, 3);
        // 4100 / 3 = 1366.67
        assert_eq!(summary.average_per_active_day, 1367);
    }

    #[test]
    fn test_weekly_summary_without_activity() {
        let summary = weekly_summary(&plan_with(vec![Vec::new(); 7]), 1800);
        assert_eq!(summary.total_consumed, 0);
        assert_eq!(summary.days_completed, 0);
        assert_eq!(summary.average_per_active_day, 0);
    }

    #[test]
    fn test_daily_breakdown() {
        let rows = daily_breakdown(&sample_plan(), 2000);
        assert_eq!(rows.len(), 7);

        assert_eq!(rows[0].day_name, "Monday");
        assert_eq!(rows[0].consumed, 1200);
        assert!((rows[0].ratio - 0.6).abs() < 1e-9);
        assert!((rows[0].percent - 60.0).abs() < 1e-9);
        assert!(!rows[0].over_budget);
        assert!(rows[0].complete);
        assert_eq!(rows[0].remaining, 800);

        assert_eq!(rows[4].consumed, 2500);
        assert!((rows[4].ratio - 1.0).abs() < f64::EPSILON);
        assert!(rows[4].over_budget);
        assert_eq!(rows[4].remaining, -500);
        assert!(!rows[1].complete);

        assert!(rows[6].ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_breakdown_zero_goal() {
        let rows = daily_breakdown(&sample_plan(), 0);
        assert!(rows.iter().all(|r| r.ratio.abs() < f64::EPSILON));
        assert!(rows[0].over_budget);
    }

    #[test]
    fn test_weight_chart_not_enough_data() {
        let one = [WeightEntry { date: date("2024-06-01"), weight: 70.0 }];
        assert_eq!(
            weight_chart(&one, 320.0, 160.0),
            WeightChart::NotEnoughData { width: 320.0, height: 160.0 }
        );
        assert!(weight_chart(&[], 320.0, 160.0).to_svg().contains("Not enough data"));
    }

    #[test]
    fn test_weight_chart_geometry() {
        let entries = [
            WeightEntry { date: date("2024-06-01"), weight: 72.0 },
            WeightEntry { date: date("2024-06-02"), weight: 71.0 },
            WeightEntry { date: date("2024-06-03"), weight: 70.0 },
        ];
        let WeightChart::Plot { points, x_labels, y_labels, .. } =
            weight_chart(&entries, 320.0, 160.0)
        else {
            panic!("expected a plot");
        };

        // chart area 264 x 112
        assert!((points[0].x - 40.0).abs() < 1e-9);
        assert!((points[1].x - 172.0).abs() < 1e-9);
        assert!((points[2].x - 304.0).abs() < 1e-9);
        // heaviest at the top, lightest at the bottom
        assert!((points[0].y - 16.0).abs() < 1e-9);
        assert!((points[1].y - 72.0).abs() < 1e-9);
        assert!((points[2].y - 128.0).abs() < 1e-9);

        let texts: Vec<&str> = x_labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["06-01", "06-02", "06-03"]);
        assert!((x_labels[0].y - 156.0).abs() < 1e-9);

        assert_eq!(y_labels[0].text, "70");
        assert_eq!(y_labels[1].text, "72");
        assert!((y_labels[0].y - 132.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_chart_flat_series() {
        let entries = [
            WeightEntry { date: date("2024-06-01"), weight: 65.5 },
            WeightEntry { date: date("2024-06-08"), weight: 65.5 },
        ];
        let chart = weight_chart(&entries, 300.0, 150.0);
        let WeightChart::Plot { points, y_labels, .. } = &chart else {
            panic!("expected a plot");
        };
        // Range falls back to 1, so both points sit on the baseline
        assert!((points[0].y - 118.0).abs() < 1e-9);
        assert!((points[1].y - 118.0).abs() < 1e-9);
        assert_eq!(y_labels[0].text, "65.5");

        let svg = chart.to_svg();
        assert!(svg.contains("<polyline points=\"40.0,118.0 284.0,118.0\""));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn test_next_streak_transitions() {
        let first = next_streak(Streak::default(), date("2024-06-10"));
        assert_eq!(first.count, 1);
        assert_eq!(first.last_completed_date, Some(date("2024-06-10")));

        let second = next_streak(first, date("2024-06-11"));
        assert_eq!(second.count, 2);

        // Completing the same day again is a no-op
        assert_eq!(next_streak(second, date("2024-06-11")), second);

        let broken = next_streak(second, date("2024-06-14"));
        assert_eq!(broken.count, 1);
        assert_eq!(broken.last_completed_date, Some(date("2024-06-14")));
    }

    #[test]
    fn test_next_streak_ignores_earlier_dates() {
        let streak = Streak {
            count: 4,
            last_completed_date: Some(date("2024-06-10")),
        };
        assert_eq!(next_streak(streak, date("2024-06-08")), streak);
    }

    #[test]
    fn test_describe_streak() {
        assert_eq!(describe_streak(&Streak::default()), "0 days");
        let streak = Streak {
            count: 1,
            last_completed_date: Some(date("2024-06-10")),
        };
        assert_eq!(describe_streak(&streak), "1 day (last 2024-06-10)");
    }
}
