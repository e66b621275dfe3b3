use std::path::Path;

use anyhow::{Context, Result};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nutrify_core::calc::KG_PER_LB;
use nutrify_core::models::date_key;
use nutrify_core::progress::WeightChart;
use nutrify_core::service::TrackerService;
use nutrify_core::storage::KeyValueStore;

use super::helpers::{parse_date, print_json, weight_in_kg};

pub(crate) fn cmd_weight_log<S: KeyValueStore>(
    svc: &TrackerService<S>,
    value: f64,
    unit: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let weight_kg = weight_in_kg(value, unit)?;
    let date = parse_date(date)?;
    let entry = svc.log_weight(date, weight_kg)?;

    if json {
        print_json(&entry)?;
    } else {
        println!(
            "Logged {:.1} kg ({:.1} lbs) for {}",
            entry.weight,
            entry.weight / KG_PER_LB,
            date_key(entry.date)
        );
    }
    Ok(())
}

pub(crate) fn cmd_weight_history<S: KeyValueStore>(
    svc: &TrackerService<S>,
    json: bool,
) -> Result<()> {
    let entries = svc.weight_log();

    if json {
        print_json(&entries)?;
    } else if entries.is_empty() {
        eprintln!("No weight entries found. Use `nutrify weight log` to record your weight.");
    } else {
        #[derive(Tabled)]
        struct WeightRow {
            #[tabled(rename = "Date")]
            date: String,
            #[tabled(rename = "Weight (kg)")]
            kg: String,
            #[tabled(rename = "Weight (lbs)")]
            lbs: String,
            #[tabled(rename = "Change")]
            change: String,
        }

        let rows: Vec<WeightRow> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| WeightRow {
                date: date_key(e.date),
                kg: format!("{:.1}", e.weight),
                lbs: format!("{:.1}", e.weight / KG_PER_LB),
                change: i
                    .checked_sub(1)
                    .map(|prev| e.weight - entries[prev].weight)
                    .map_or_else(String::new, |d| format!("{d:+.1}")),
            })
            .collect();

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..4)).with(Alignment::right()))
            .to_string();
        println!("{table}");
    }
    Ok(())
}

/// Print chart geometry, or write an SVG when `svg_out` is given.
pub(crate) fn cmd_weight_chart<S: KeyValueStore>(
    svc: &TrackerService<S>,
    width: f64,
    height: f64,
    svg_out: Option<&Path>,
    json: bool,
) -> Result<()> {
    let chart = svc.weight_chart(width, height);

    if let Some(path) = svg_out {
        std::fs::write(path, chart.to_svg())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Chart written to {}", path.display());
        return Ok(());
    }

    if json {
        return print_json(&chart);
    }

    match &chart {
        WeightChart::NotEnoughData { .. } => {
            println!("Not enough data. Log at least two weights to see a chart.");
        }
        WeightChart::Plot {
            points,
            min_weight,
            max_weight,
            ..
        } => {
            println!("Weight trend: {min_weight} - {max_weight} kg");
            for p in points {
                println!("  {}  {:>6.1} kg  ({:.1}, {:.1})", date_key(p.date), p.weight, p.x, p.y);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_log_lbs_and_chart_svg() {
        let svc = TrackerService::new_in_memory();
        cmd_weight_log(&svc, 160.0, "lbs", Some("2024-06-01".to_string()), true).unwrap();
        cmd_weight_log(&svc, 71.0, "kg", Some("2024-06-08".to_string()), true).unwrap();
        let log = svc.weight_log();
        assert_eq!(log.len(), 2);
        assert!((log[0].weight - 72.574_72).abs() < 1e-6);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weight.svg");
        cmd_weight_chart(&svc, 320.0, 160.0, Some(&path), false).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("06-08"));
    }

    #[test]
    fn test_weight_log_rejects_out_of_range() {
        let svc = TrackerService::new_in_memory();
        assert!(cmd_weight_log(&svc, 400.0, "kg", None, true).is_err());
        assert!(svc.weight_log().is_empty());
    }
}
