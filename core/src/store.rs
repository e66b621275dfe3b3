//! Typed record access over a [`KeyValueStore`].
//!
//! Every value is a JSON blob under a fixed key. Reads never fail: a missing
//! key yields the caller's default, and a value that no longer deserializes
//! is deleted and replaced by the default. Writes never fail either; backend
//! errors are logged and dropped since everything here can be regenerated.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, error, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{Plan, Profile, Streak, Theme, WATER_MAX, WeightEntry, date_key};
use crate::storage::KeyValueStore;

pub const KEY_PROFILE: &str = "ddt_profile";
pub const KEY_PLAN: &str = "ddt_plan";
pub const KEY_GOAL: &str = "ddt_goal";
pub const KEY_THEME: &str = "ddt_theme";
pub const KEY_STREAK: &str = "ddt_streak";
pub const KEY_WEIGHT_LOG: &str = "ddt_weight_log";
pub const KEY_WATER_LOG: &str = "ddt_water_log";

/// Per-date water keys written by older versions (`ddt_water_YYYY-MM-DD`).
pub const LEGACY_WATER_PREFIX: &str = "ddt_water_";

pub const FIXED_KEYS: &[&str] = &[
    KEY_PROFILE,
    KEY_PLAN,
    KEY_GOAL,
    KEY_THEME,
    KEY_STREAK,
    KEY_WEIGHT_LOG,
    KEY_WATER_LOG,
];

pub type WaterLog = BTreeMap<String, u8>;

pub struct Store<S> {
    backend: S,
}

impl<S: KeyValueStore> Store<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    // --- Core ---

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                error!("Store: failed to read key \"{key}\": {e:#}");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Store: corrupted data for key \"{key}\", clearing: {e}");
                self.delete(key);
                default
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Store: failed to serialize key \"{key}\": {e}");
                return;
            }
        };
        match self.backend.set_item(key, &raw) {
            Ok(()) => debug!("Store: wrote {} bytes to \"{key}\"", raw.len()),
            Err(e) => error!("Store: failed to write key \"{key}\" (quota exceeded?): {e:#}"),
        }
    }

    pub fn delete(&self, key: &str) {
        if let Err(e) = self.backend.remove_item(key) {
            error!("Store: failed to remove key \"{key}\": {e:#}");
        }
    }

    pub fn clear_all(&self) {
        for key in FIXED_KEYS {
            self.delete(key);
        }
        match self.backend.keys() {
            Ok(keys) => {
                for key in keys.iter().filter(|k| k.starts_with(LEGACY_WATER_PREFIX)) {
                    self.delete(key);
                }
            }
            Err(e) => error!("Store: failed to list keys during reset: {e:#}"),
        }
        debug!("Store: cleared all records");
    }

    // --- Profile ---

    pub fn profile(&self) -> Option<Profile> {
        self.get(KEY_PROFILE, None)
    }

    pub fn set_profile(&self, profile: &Profile) {
        self.set(KEY_PROFILE, profile);
    }

    // --- Plan ---

    pub fn plan(&self) -> Option<Plan> {
        self.get(KEY_PLAN, None)
    }

    /// Stamps `updated_at` with the current time before writing, except when
    /// the plan already carries a later stamp (clock skew). That later value
    /// is kept, so `updated_at` never moves backwards.
    pub fn set_plan(&self, plan: &mut Plan) {
        let now = Utc::now();
        let previous = DateTime::parse_from_rfc3339(&plan.updated_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc));
        if previous.is_none_or(|ts| ts <= now) {
            plan.updated_at = now.to_rfc3339();
        }
        self.set(KEY_PLAN, plan);
    }

    // --- Goal override ---

    pub fn goal_override(&self) -> Option<i64> {
        self.get(KEY_GOAL, None)
    }

    pub fn set_goal_override(&self, kcal: Option<i64>) {
        self.set(KEY_GOAL, &kcal);
    }

    pub fn clear_goal_override(&self) {
        self.delete(KEY_GOAL);
    }

    // --- Theme ---

    pub fn theme(&self) -> Theme {
        self.get(KEY_THEME, Theme::default())
    }

    pub fn set_theme(&self, theme: Theme) {
        self.set(KEY_THEME, &theme);
    }

    // --- Streak ---

    pub fn streak(&self) -> Streak {
        self.get(KEY_STREAK, Streak::default())
    }

    pub fn set_streak(&self, streak: &Streak) {
        self.set(KEY_STREAK, streak);
    }

    // --- Water (one map of date -> glasses) ---

    pub fn water_log(&self) -> WaterLog {
        self.get(KEY_WATER_LOG, WaterLog::new())
    }

    pub fn water(&self, date: NaiveDate) -> u8 {
        self.water_log()
            .get(&date_key(date))
            .copied()
            .unwrap_or(0)
            .min(WATER_MAX)
    }

    pub fn set_water(&self, date: NaiveDate, count: i64) {
        let clamped = u8::try_from(count.clamp(0, i64::from(WATER_MAX))).unwrap_or(WATER_MAX);
        let mut log = self.water_log();
        log.insert(date_key(date), clamped);
        self.set(KEY_WATER_LOG, &log);
    }

    // --- Weight log ---

    pub fn weight_log(&self) -> Vec<WeightEntry> {
        self.get(KEY_WEIGHT_LOG, Vec::new())
    }

    /// Upsert by date, then keep the log in ascending date order.
    pub fn append_weight(&self, entry: WeightEntry) {
        let mut log = self.weight_log();
        if let Some(existing) = log.iter_mut().find(|e| e.date == entry.date) {
            *existing = entry;
        } else {
            log.push(entry);
        }
        log.sort_by_key(|e| e.date);
        self.set(KEY_WEIGHT_LOG, &log);
    }
}
