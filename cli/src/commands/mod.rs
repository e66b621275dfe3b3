mod goal;
mod helpers;
mod meal;
mod onboard;
mod plan;
mod progress;
mod settings;
mod water;
mod weight;

pub(crate) use goal::{cmd_goal_clear, cmd_goal_set, cmd_goal_show};
pub(crate) use meal::{cmd_meal_add, cmd_meal_delete, cmd_meal_done, cmd_meal_edit, cmd_meal_note};
pub(crate) use onboard::{ProfileArgs, cmd_onboard};
pub(crate) use plan::{cmd_plan_export, cmd_plan_regenerate, cmd_plan_show};
pub(crate) use progress::{cmd_progress, cmd_streak, cmd_tip};
pub(crate) use settings::{SettingsArgs, cmd_reset, cmd_settings_show, cmd_settings_update, cmd_theme};
pub(crate) use water::cmd_water;
pub(crate) use weight::{cmd_weight_chart, cmd_weight_history, cmd_weight_log};
