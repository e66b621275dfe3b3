use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nutrify_core::calc::{feet_inches_to_cm, lbs_to_kg};
use nutrify_core::models::{Day, parse_day, validate_imperial_height};

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(today()),
        Some(s) => match s.as_str() {
            "today" => Ok(today()),
            "yesterday" => Ok(today() - chrono::Duration::days(1)),
            "tomorrow" => Ok(today() + chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").with_context(|| {
                format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
            }),
        },
    }
}

/// Day argument, defaulting to today's weekday (Monday = 0).
pub(crate) fn parse_day_arg(day: Option<&str>) -> Result<usize> {
    use chrono::Datelike;

    match day {
        None | Some("today") => Ok(today().weekday().num_days_from_monday() as usize),
        Some(s) => parse_day(s),
    }
}

/// Convert a weight in `unit` (kg or lbs) to kilograms.
pub(crate) fn weight_in_kg(value: f64, unit: &str) -> Result<f64> {
    match unit.to_lowercase().as_str() {
        "kg" => Ok(value),
        "lbs" | "lb" => {
            let kg = lbs_to_kg(value);
            eprintln!("Converting {value:.1} lbs → {kg:.2} kg");
            Ok(kg)
        }
        _ => bail!("Invalid unit '{unit}'. Use 'kg' or 'lbs'"),
    }
}

/// Height from either `--height` (cm) or `--feet`/`--inches`.
pub(crate) fn height_in_cm(
    height_cm: Option<f64>,
    feet: Option<f64>,
    inches: Option<f64>,
) -> Result<f64> {
    match (height_cm, feet) {
        (Some(_), Some(_)) => bail!("Use either --height or --feet/--inches, not both"),
        (Some(cm), None) => Ok(cm),
        (None, Some(ft)) => {
            let inches = inches.unwrap_or(0.0);
            validate_imperial_height(ft, inches)?;
            Ok(feet_inches_to_cm(ft, inches))
        }
        (None, None) => bail!("Height is required: pass --height <cm> or --feet <ft> [--inches <in>]"),
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_meals_table(day: &Day) {
    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Type")]
        meal_type: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "kcal")]
        calories: i64,
        #[tabled(rename = "Done")]
        done: &'static str,
        #[tabled(rename = "Note")]
        note: String,
    }

    let rows: Vec<MealRow> = day
        .meals
        .iter()
        .map(|m| MealRow {
            id: m.id.clone(),
            meal_type: m.meal_type.to_string(),
            name: truncate(&m.name, 35),
            calories: m.calories,
            done: if m.completed { "✓" } else { "" },
            note: truncate(&m.note, 30),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}
