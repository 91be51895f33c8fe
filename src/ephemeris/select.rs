use chrono::{DateTime, Utc};

use super::types::OrbitalElementSet;

/// Pick the element set for `satellite_id` whose epoch is closest to
/// `target`. Ties keep the earliest occurrence in table order. Returns
/// `None` when the table holds no sets for the satellite.
pub fn nearest<'a>(
    table: &'a [OrbitalElementSet],
    satellite_id: u32,
    target: DateTime<Utc>,
) -> Option<&'a OrbitalElementSet> {
    let mut best: Option<(&OrbitalElementSet, i64)> = None;

    for set in table.iter().filter(|s| s.satellite_id == satellite_id) {
        let offset_ms = (set.epoch - target).num_milliseconds().abs();
        match best {
            Some((_, best_ms)) if offset_ms >= best_ms => {}
            _ => best = Some((set, offset_ms)),
        }
    }

    best.map(|(set, _)| set)
}
