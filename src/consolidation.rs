//! Window consolidation.
//!
//! Fans schedule entries out over a concrete week and merges them into
//! per-weekday playback windows.
//!
//! # Algorithm
//! For day offset `k` in `0..7`, with `W0` the weekday of the start date:
//! 1. `weekday = (W0 + k) mod 7`.
//! 2. Every entry applying to `weekday` is keyed by its exact
//!    `(start, end)`. An existing window with that key gets the entry's
//!    program appended; otherwise a new window is created.
//! 3. The weekday's windows are sorted by start.
//!
//! Merge keys are scoped per weekday. Windows that overlap without being
//! identical are never merged; the [`OverlapPolicy`] decides whether they
//! are an error.
//!
//! # Program Resolution
//! The resolver is called once per logical program name
//! ([`ProgramKey::name`]); later entries with the same name reuse the
//! first reference.
//!
//! # Complexity
//! O(d * n * w) where d=7 days, n=entries, w=windows per day.

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::config::OverlapPolicy;
use crate::error::{Error, Result};
use crate::models::{ProgramKey, ProgramRef, ProgramResolver, ScheduleEntry, TimeWindow, WeeklyPlan};
use crate::validation::find_overlap;

/// Builds a weekly plan from schedule entries.
///
/// # Errors
/// - [`Error::InvalidInput`] if an entry's timing cannot be resolved or the
///   week starting at `start_date` is not representable.
/// - [`Error::OverlapViolation`] if two different windows of a weekday
///   overlap and `policy` is [`OverlapPolicy::Reject`].
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_timetable::config::OverlapPolicy;
/// use u_timetable::consolidation::consolidate;
/// use u_timetable::models::{parse_time, Category, IdSequence, ProgramRegistry, ScheduleEntry};
///
/// let start = parse_time("09:50:00").unwrap();
/// let entries = vec![ScheduleEntry::with_duration(Category::Recess, 0..5, Some(3), start, 10)];
///
/// let mut registry = ProgramRegistry::new(IdSequence::starting_at(1));
/// let monday = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
/// let plan = consolidate(&entries, monday, &mut registry, OverlapPolicy::Reject).unwrap();
///
/// assert_eq!(plan.window_count(), 5);
/// assert_eq!(registry.programs().len(), 1); // one shared "recess" program
/// ```
pub fn consolidate<R>(
    entries: &[ScheduleEntry],
    start_date: NaiveDate,
    resolver: &mut R,
    policy: OverlapPolicy,
) -> Result<WeeklyPlan>
where
    R: ProgramResolver + ?Sized,
{
    let spans: Vec<(NaiveTime, NaiveTime)> = entries
        .iter()
        .map(|e| Ok((e.start, e.end()?)))
        .collect::<Result<_>>()?;

    let mut plan = WeeklyPlan::new(start_date)?;
    let mut programs: HashMap<String, ProgramRef> = HashMap::new();

    for day in &mut plan.days {
        let weekday = day.weekday;
        for (entry, &(start, end)) in entries.iter().zip(&spans) {
            if !entry.applies_to(weekday) {
                continue;
            }

            let key = ProgramKey::new(entry.category, entry.instance, weekday);
            let program = programs
                .entry(key.name())
                .or_insert_with(|| resolver.resolve(&key))
                .clone();

            match day.windows.iter().position(|w| w.has_span(start, end)) {
                Some(index) => {
                    let window = &mut day.windows[index];
                    trace!(weekday, span = %window.span_label(), %program, "Merged into window");
                    window.programs.push(program);
                }
                None => day
                    .windows
                    .push(TimeWindow::new(weekday, start, end).with_program(program)),
            }
        }
        day.windows.sort_by_key(|w| (w.start, w.end));

        if let Some((first, second)) = find_overlap(&day.windows) {
            match policy {
                OverlapPolicy::Reject => {
                    return Err(Error::OverlapViolation {
                        weekday,
                        first: first.span_label(),
                        second: second.span_label(),
                    })
                }
                OverlapPolicy::Accept => warn!(
                    weekday,
                    first = %first.span_label(),
                    second = %second.span_label(),
                    "Overlapping windows accepted"
                ),
            }
        }
    }

    debug!(
        start_date = %start_date,
        windows = plan.window_count(),
        programs = programs.len(),
        "Consolidated weekly plan"
    );
    Ok(plan)
}
