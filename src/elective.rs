//! Elective substitution.
//!
//! A weekday without its last regular period runs one wide elective block
//! instead of the last two periods.
//!
//! # Rule
//! With `L` the last regular period and `E` the elective's instance:
//! - nothing is substituted unless some weekday has a class entry at `L`;
//! - every eligible weekday with no class entry at `L` is substituted;
//! - substitution drops class entries at `E..=L` and recess entries at
//!   `E+1..=L` (the recess before the elective itself stays);
//! - the elective template, specialized to the weekday, is appended.
//!
//! Once substitution is triggered, the elective is appended even when
//! nothing was dropped, so a weekday with no afternoon markers still gets
//! an elective block.

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::TemplateCatalog;
use crate::config::EngineConfig;
use crate::models::{Category, ScheduleEntry};

/// Replaces the trailing periods of one weekday with the elective block.
///
/// Returns a new list: kept entries in their original order, followed by
/// the elective entry.
pub fn replace_with_elective(
    entries: &[ScheduleEntry],
    weekday: u8,
    catalog: &TemplateCatalog,
    last_regular_period: u32,
) -> Vec<ScheduleEntry> {
    let elective = catalog.elective_for(weekday);
    let first = elective.instance.unwrap_or(last_regular_period);

    let replaced = |entry: &ScheduleEntry| {
        if !entry.applies_to(weekday) {
            return false;
        }
        match (entry.category, entry.instance) {
            (Category::Class, Some(i)) => (first..=last_regular_period).contains(&i),
            (Category::Recess, Some(i)) => i > first && i <= last_regular_period,
            _ => false,
        }
    };

    let mut result: Vec<ScheduleEntry> = entries
        .iter()
        .filter(|&e| !replaced(e))
        .cloned()
        .collect();
    debug!(
        weekday,
        removed = entries.len() - result.len(),
        "Substituted elective block"
    );
    result.push(elective);
    result
}

/// Weekdays that will receive an elective block.
///
/// Eligible weekdays without a class entry at the last regular period,
/// in ascending order. Empty when no weekday has that period at all.
pub fn elective_weekdays(entries: &[ScheduleEntry], config: &EngineConfig) -> BTreeSet<u8> {
    let with_last: BTreeSet<u8> = entries
        .iter()
        .filter(|e| e.is_class(config.last_regular_period))
        .flat_map(|e| e.weekdays.iter().copied())
        .collect();
    if with_last.is_empty() {
        debug!(
            period = config.last_regular_period,
            "No weekday has the last regular period, skipping electives"
        );
        return BTreeSet::new();
    }

    config
        .elective_weekdays
        .difference(&with_last)
        .copied()
        .collect()
}

/// Applies elective substitution to every qualifying weekday.
pub fn apply_electives(
    entries: Vec<ScheduleEntry>,
    catalog: &TemplateCatalog,
    config: &EngineConfig,
) -> Vec<ScheduleEntry> {
    elective_weekdays(&entries, config)
        .into_iter()
        .fold(entries, |acc, weekday| {
            replace_with_elective(&acc, weekday, catalog, config.last_regular_period)
        })
}
