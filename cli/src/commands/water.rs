use anyhow::Result;

use nutrify_core::models::{WATER_MAX, date_key};
use nutrify_core::service::TrackerService;
use nutrify_core::storage::KeyValueStore;

use super::helpers::parse_date;

fn glasses(count: u8) -> String {
    (0..WATER_MAX)
        .map(|i| if i < count { '●' } else { '○' })
        .collect()
}

/// Show the water count for a date, or set it when `count` is given.
pub(crate) fn cmd_water<S: KeyValueStore>(
    svc: &TrackerService<S>,
    count: Option<u8>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let count = match count {
        Some(c) => svc.set_water(date, c)?,
        None => svc.water(date),
    };

    if json {
        println!(
            "{}",
            serde_json::json!({ "date": date_key(date), "glasses": count, "max": WATER_MAX })
        );
    } else {
        println!("{}  {}  {count}/{WATER_MAX} glasses", date_key(date), glasses(count));
    }
    Ok(())
}
