//! Dismissal synthesis.
//!
//! Appends one dismissal entry per weekday, starting the moment that
//! weekday's last activity ends.

use chrono::NaiveTime;
use std::collections::BTreeMap;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{Category, ScheduleEntry};

/// Latest nominal stop per weekday.
///
/// Multi-weekday entries count toward each of their weekdays.
pub fn last_stops(entries: &[ScheduleEntry]) -> Result<BTreeMap<u8, NaiveTime>> {
    let mut last: BTreeMap<u8, NaiveTime> = BTreeMap::new();
    for entry in entries {
        let stop = entry.nominal_stop()?;
        for &weekday in &entry.weekdays {
            last.entry(weekday)
                .and_modify(|t| *t = (*t).max(stop))
                .or_insert(stop);
        }
    }
    Ok(last)
}

/// Appends a dismissal entry for every weekday present in `entries`.
///
/// Dismissal entries go at the end of the list in ascending weekday
/// order; existing entries are left untouched.
///
/// # Errors
/// [`crate::Error::InvalidInput`] if any entry's timing cannot be resolved.
pub fn add_dismissals(
    mut entries: Vec<ScheduleEntry>,
    config: &EngineConfig,
) -> Result<Vec<ScheduleEntry>> {
    let last = last_stops(&entries)?;
    for (weekday, stop) in last {
        let minutes = config.dismissal_minutes_for(weekday);
        debug!(weekday, start = %stop, minutes, "Synthesized dismissal");
        entries.push(ScheduleEntry::with_duration(
            Category::Dismissal,
            [weekday],
            None,
            stop,
            minutes,
        ));
    }
    Ok(entries)
}
