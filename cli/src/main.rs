mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use crate::commands::{
    ProfileArgs, SettingsArgs, cmd_goal_clear, cmd_goal_set, cmd_goal_show, cmd_meal_add,
    cmd_meal_delete, cmd_meal_done, cmd_meal_edit, cmd_meal_note, cmd_onboard, cmd_plan_export,
    cmd_plan_regenerate, cmd_plan_show, cmd_progress, cmd_reset, cmd_settings_show,
    cmd_settings_update, cmd_streak, cmd_theme, cmd_tip, cmd_water, cmd_weight_chart,
    cmd_weight_history, cmd_weight_log,
};
use crate::config::Config;
use nutrify_core::service::TrackerService;

#[derive(Parser)]
#[command(
    name = "nutrify",
    version,
    about = "A local-first 7-day diet tracker",
    long_about = "Onboard with your body profile, get a daily calorie goal and a 7-day meal plan, \
                  then check off meals, log water and weight, and follow your weekly progress."
)]
struct Cli {
    /// Directory holding nutrify.db (overrides NUTRIFY_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create your profile and a fresh 7-day plan
    Onboard {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// View, export or regenerate the 7-day plan
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Add, edit, check off or annotate meals
    Meal {
        #[command(subcommand)]
        command: MealCommands,
    },
    /// Show or set glasses of water for a day (0-8)
    Water {
        /// Number of glasses to record
        count: Option<u8>,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Track body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },
    /// Weekly summary and per-day breakdown
    Progress {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or override the daily calorie goal
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Show or update your profile
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Show or change the theme preference (light, dark, toggle)
    Theme {
        /// light, dark or toggle
        mode: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show your completed-days streak
    Streak {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a nutrition tip
    Tip {
        /// Plan day: 0-6, monday-sunday or mon-sun (default: today)
        #[arg(short, long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all data
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Show meals for one day or the whole week
    Show {
        /// Plan day: 0-6, monday-sunday or mon-sun (default: whole week)
        #[arg(short, long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the plan as plain text
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Rebuild the default plan from your profile
    Regenerate {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum MealCommands {
    /// Add a meal to a day
    Add {
        /// Meal name
        name: String,
        /// Calories (1-9999)
        #[arg(short, long)]
        calories: f64,
        /// Meal type: Breakfast, Lunch, Snack, Dinner, or any custom label
        #[arg(short = 't', long = "type", default_value = "Snack")]
        meal_type: String,
        /// Plan day: 0-6, monday-sunday or mon-sun (default: today)
        #[arg(short, long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a meal's name, type or calories
    Edit {
        /// Meal ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New meal type
        #[arg(short = 't', long = "type")]
        meal_type: Option<String>,
        /// New calories (1-9999)
        #[arg(short, long)]
        calories: Option<f64>,
        /// Plan day: 0-6, monday-sunday or mon-sun (default: today)
        #[arg(short, long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a meal
    Delete {
        /// Meal ID
        id: String,
        /// Plan day: 0-6, monday-sunday or mon-sun (default: today)
        #[arg(short, long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a meal as eaten
    Done {
        /// Meal ID
        id: String,
        /// Plan day: 0-6, monday-sunday or mon-sun (default: today)
        #[arg(short, long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a meal as not eaten
    Undo {
        /// Meal ID
        id: String,
        /// Plan day: 0-6, monday-sunday or mon-sun (default: today)
        #[arg(short, long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set or clear a meal note
    Note {
        /// Meal ID
        id: String,
        /// Note text (omit to clear)
        #[arg(default_value = "")]
        note: String,
        /// Plan day: 0-6, monday-sunday or mon-sun (default: today)
        #[arg(short, long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Log a weight entry (20-300 kg)
    Log {
        /// Weight value (number)
        value: f64,
        /// Unit: kg or lbs (default: kg)
        #[arg(short, long, default_value = "kg")]
        unit: String,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weight history
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the weight chart layout or write it as SVG
    Chart {
        /// Chart width in pixels
        #[arg(long, default_value = "320")]
        width: f64,
        /// Chart height in pixels
        #[arg(long, default_value = "160")]
        height: f64,
        /// Write an SVG file
        #[arg(long, value_name = "PATH")]
        svg: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Show the effective daily goal
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Override the daily goal (500-9999 kcal)
    Set {
        /// Daily calorie goal
        kcal: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the override and use the computed goal
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show your profile and goal
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update profile fields and the goal override
    Update {
        #[command(flatten)]
        settings: SettingsArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.data_dir)?;
    log::debug!("Data directory: {}", config.data_dir.display());
    let svc = TrackerService::open(&config.db_path)?;

    match cli.command {
        Commands::Onboard { profile, json } => cmd_onboard(&svc, &profile, json),
        Commands::Plan { command } => match command {
            PlanCommands::Show { day, json } => cmd_plan_show(&svc, day.as_deref(), json),
            PlanCommands::Export { output } => cmd_plan_export(&svc, output.as_deref()),
            PlanCommands::Regenerate { json } => cmd_plan_regenerate(&svc, json),
        },
        Commands::Meal { command } => match command {
            MealCommands::Add {
                name,
                calories,
                meal_type,
                day,
                json,
            } => cmd_meal_add(&svc, day.as_deref(), &name, &meal_type, calories, json),
            MealCommands::Edit {
                id,
                name,
                meal_type,
                calories,
                day,
                json,
            } => cmd_meal_edit(
                &svc,
                day.as_deref(),
                &id,
                name.as_deref(),
                meal_type.as_deref(),
                calories,
                json,
            ),
            MealCommands::Delete { id, day, json } => {
                cmd_meal_delete(&svc, day.as_deref(), &id, json)
            }
            MealCommands::Done { id, day, json } => {
                cmd_meal_done(&svc, day.as_deref(), &id, true, json)
            }
            MealCommands::Undo { id, day, json } => {
                cmd_meal_done(&svc, day.as_deref(), &id, false, json)
            }
            MealCommands::Note {
                id,
                note,
                day,
                json,
            } => cmd_meal_note(&svc, day.as_deref(), &id, &note, json),
        },
        Commands::Water { count, date, json } => cmd_water(&svc, count, date, json),
        Commands::Weight { command } => match command {
            WeightCommands::Log {
                value,
                unit,
                date,
                json,
            } => cmd_weight_log(&svc, value, &unit, date, json),
            WeightCommands::History { json } => cmd_weight_history(&svc, json),
            WeightCommands::Chart {
                width,
                height,
                svg,
                json,
            } => cmd_weight_chart(&svc, width, height, svg.as_deref(), json),
        },
        Commands::Progress { json } => cmd_progress(&svc, json),
        Commands::Goal { command } => match command {
            GoalCommands::Show { json } => cmd_goal_show(&svc, json),
            GoalCommands::Set { kcal, json } => cmd_goal_set(&svc, kcal, json),
            GoalCommands::Clear { json } => cmd_goal_clear(&svc, json),
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show { json } => cmd_settings_show(&svc, json),
            SettingsCommands::Update { settings, json } => {
                cmd_settings_update(&svc, &settings, json)
            }
        },
        Commands::Theme { mode, json } => cmd_theme(&svc, mode.as_deref(), json),
        Commands::Streak { json } => cmd_streak(&svc, json),
        Commands::Tip { day, json } => cmd_tip(day.as_deref(), json),
        Commands::Reset { yes, json } => cmd_reset(&svc, yes, json),
    }
}
