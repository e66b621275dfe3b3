//! Property tests for the persistence layer and goal calculation.

use chrono::{DateTime, Days, NaiveDate};
use proptest::prelude::*;

use nutrify_core::calc::compute_goal;
use nutrify_core::models::{
    ActivityLevel, DietaryPreference, Goal, Plan, Profile, Sex, Theme, WATER_MAX, WeightEntry,
};
use nutrify_core::storage::{KeyValueStore, MemoryStorage};
use nutrify_core::store::{FIXED_KEYS, KEY_PROFILE, Store};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn date_at(offset: u64) -> NaiveDate {
    base_date() + Days::new(offset)
}

fn profile_strategy() -> impl Strategy<Value = Profile> {
    (
        prop_oneof![
            Just(Goal::LoseWeight),
            Just(Goal::Maintain),
            Just(Goal::GainMuscle)
        ],
        prop_oneof![
            Just(ActivityLevel::Sedentary),
            Just(ActivityLevel::LightlyActive),
            Just(ActivityLevel::ModeratelyActive),
            Just(ActivityLevel::VeryActive)
        ],
        prop_oneof![Just(Sex::Male), Just(Sex::Female)],
        10u32..=100,
        20.0f64..=300.0,
        100.0f64..=250.0,
        prop_oneof![
            Just(DietaryPreference::NoPreference),
            Just(DietaryPreference::Vegetarian),
            Just(DietaryPreference::Vegan)
        ],
    )
        .prop_map(
            |(goal, activity_level, sex, age, weight_kg, height_cm, dietary_preference)| Profile {
                goal,
                activity_level,
                sex,
                age,
                weight_kg,
                height_cm,
                dietary_preference,
                created_at: None,
            },
        )
}

proptest! {
    #[test]
    fn prop_plan_round_trip(
        profile in profile_strategy(),
        toggles in prop::collection::vec((0usize..7, 0usize..4), 0..12),
    ) {
        let store = Store::new(MemoryStorage::new());
        let mut plan = Plan::from_profile(&profile);
        for (day, slot) in toggles {
            let id = plan.days[day].meals[slot].id.clone();
            plan.set_completed(day, &id, true).unwrap();
        }
        let before = DateTime::parse_from_rfc3339(&plan.updated_at).unwrap();

        store.set_plan(&mut plan);
        let loaded = store.plan().unwrap();

        prop_assert_eq!(&loaded.days, &plan.days);
        prop_assert_eq!(&loaded.created_at, &plan.created_at);
        let after = DateTime::parse_from_rfc3339(&loaded.updated_at).unwrap();
        prop_assert!(after >= before);
    }

    #[test]
    fn prop_corrupt_value_reads_as_default_and_is_removed(
        key in prop::sample::select(FIXED_KEYS),
        garbage in "\\{[a-z ]{0,20}",
    ) {
        let backend = MemoryStorage::new();
        backend.set_item(key, &garbage).unwrap();
        let store = Store::new(backend.clone());

        let value = store.get(key, serde_json::Value::Null);
        prop_assert_eq!(value, serde_json::Value::Null);
        prop_assert_eq!(backend.get_item(key).unwrap(), None);
    }

    #[test]
    fn prop_corrupt_profile_reads_as_none(garbage in "\\{[a-z ]{0,20}") {
        let backend = MemoryStorage::new();
        backend.set_item(KEY_PROFILE, &garbage).unwrap();

        prop_assert!(Store::new(backend.clone()).profile().is_none());
        prop_assert_eq!(backend.get_item(KEY_PROFILE).unwrap(), None);
    }

    #[test]
    fn prop_theme_survives_new_store(dark in any::<bool>()) {
        let backend = MemoryStorage::new();
        let theme = if dark { Theme::Dark } else { Theme::Light };
        Store::new(backend.clone()).set_theme(theme);

        prop_assert_eq!(Store::new(backend).theme(), theme);
    }

    #[test]
    fn prop_water_is_clamped_and_per_date(
        writes in prop::collection::vec((0u64..30, -5i64..20), 1..20),
    ) {
        let store = Store::new(MemoryStorage::new());
        let mut expected = std::collections::BTreeMap::new();
        for (offset, count) in &writes {
            store.set_water(date_at(*offset), *count);
            expected.insert(*offset, (*count).clamp(0, i64::from(WATER_MAX)));
        }

        for offset in 0u64..30 {
            let want = expected.get(&offset).copied().unwrap_or(0);
            prop_assert_eq!(i64::from(store.water(date_at(offset))), want);
        }
    }

    #[test]
    fn prop_weight_log_sorted_unique_last_write_wins(
        writes in prop::collection::vec((0u64..60, 200u32..=3000), 1..30),
    ) {
        let store = Store::new(MemoryStorage::new());
        let mut expected = std::collections::BTreeMap::new();
        for (offset, tenths) in &writes {
            let weight = f64::from(*tenths) / 10.0;
            store.append_weight(WeightEntry { date: date_at(*offset), weight });
            expected.insert(date_at(*offset), weight);
        }

        let log = store.weight_log();
        prop_assert_eq!(log.len(), expected.len());
        prop_assert!(log.windows(2).all(|w| w[0].date < w[1].date));
        for (entry, (date, weight)) in log.iter().zip(&expected) {
            prop_assert_eq!(entry.date, *date);
            prop_assert!((entry.weight - weight).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_compute_goal_is_deterministic(profile in profile_strategy()) {
        prop_assert_eq!(compute_goal(&profile), compute_goal(&profile.clone()));
    }

    #[test]
    fn prop_goal_orders_by_objective(profile in profile_strategy()) {
        let with_goal = |goal| Profile { goal, ..profile.clone() };
        let lose = compute_goal(&with_goal(Goal::LoseWeight));
        let maintain = compute_goal(&with_goal(Goal::Maintain));
        let gain = compute_goal(&with_goal(Goal::GainMuscle));
        prop_assert_eq!(maintain - lose, 500);
        prop_assert_eq!(gain - maintain, 300);
    }
}
