//! Integrity checks for catalogs and weekly plans.
//!
//! Catalog checks (before resolution):
//! - Weekdays within 0..7
//! - Every row has a period instance
//! - Every row has exactly one of stop/duration and stays within the day
//! - No (weekday, instance) matched by two rows of the same table
//!
//! Plan checks (after consolidation):
//! - Windows belong to the day they are filed under
//! - Windows sorted ascending by start
//! - No two windows share a (start, end) key
//! - No two windows overlap
//!
//! All checks run to completion and report every issue found.

use std::collections::{BTreeSet, HashMap};

use crate::catalog::{TemplateCatalog, TemplateTable};
use crate::models::{DayPlan, ScheduleEntry, TimeWindow, WeeklyPlan, DAYS_PER_WEEK};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A weekday outside 0..7.
    WeekdayOutOfRange,
    /// A catalog row without a period instance.
    MissingInstance,
    /// A row whose timing cannot be resolved.
    InvalidTiming,
    /// Two rows of one table match the same (weekday, instance).
    AmbiguousTemplate,
    /// A window filed under the wrong weekday.
    MisfiledWindow,
    /// Windows not sorted by start.
    Unordered,
    /// Two windows with identical (start, end).
    DuplicateWindow,
    /// Two windows that overlap.
    Overlap,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a template catalog.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &TemplateCatalog) -> ValidationResult {
    let mut errors = Vec::new();

    for table in [TemplateTable::PreClass, TemplateTable::ClassPeriod] {
        let rows = catalog.rows(table);
        for (index, row) in rows.iter().enumerate() {
            check_row(&format!("{table} row {index}"), row, &mut errors);
        }
        check_ambiguity(table, rows, &mut errors);
    }
    check_row("elective", &catalog.elective, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_row(label: &str, row: &ScheduleEntry, errors: &mut Vec<ValidationError>) {
    if let Some(day) = row.weekdays.iter().find(|&&d| d >= DAYS_PER_WEEK) {
        errors.push(ValidationError::new(
            ValidationErrorKind::WeekdayOutOfRange,
            format!("{label}: weekday {day} out of range"),
        ));
    }
    if row.instance.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingInstance,
            format!("{label}: no period instance"),
        ));
    }
    if let Err(e) = row.nominal_stop() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTiming,
            format!("{label}: {e}"),
        ));
    }
}

fn check_ambiguity(table: TemplateTable, rows: &[ScheduleEntry], errors: &mut Vec<ValidationError>) {
    // (weekday, instance) -> first row index claiming it
    let mut claimed: HashMap<(u8, u32), usize> = HashMap::new();
    let mut reported: BTreeSet<(usize, usize)> = BTreeSet::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(instance) = row.instance else {
            continue;
        };
        for &day in &row.weekdays {
            if let Some(&first) = claimed.get(&(day, instance)) {
                if reported.insert((first, index)) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::AmbiguousTemplate,
                        format!(
                            "{table} rows {first} and {index} both match weekday {day} period {instance}"
                        ),
                    ));
                }
            } else {
                claimed.insert((day, instance), index);
            }
        }
    }
}

/// Validates a consolidated weekly plan.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_plan(plan: &WeeklyPlan) -> ValidationResult {
    let mut errors = Vec::new();

    for day in &plan.days {
        check_day(day, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_day(day: &DayPlan, errors: &mut Vec<ValidationError>) {
    for w in &day.windows {
        if w.weekday != day.weekday {
            errors.push(ValidationError::new(
                ValidationErrorKind::MisfiledWindow,
                format!(
                    "Window {} of weekday {} filed under weekday {}",
                    w.span_label(),
                    w.weekday,
                    day.weekday
                ),
            ));
        }
    }

    for pair in day.windows.windows(2) {
        if pair[1].start < pair[0].start {
            errors.push(ValidationError::new(
                ValidationErrorKind::Unordered,
                format!(
                    "Weekday {}: {} listed after {}",
                    day.weekday,
                    pair[1].span_label(),
                    pair[0].span_label()
                ),
            ));
        }
    }

    for (i, a) in day.windows.iter().enumerate() {
        for b in &day.windows[i + 1..] {
            if a.has_span(b.start, b.end) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateWindow,
                    format!("Weekday {}: duplicate window {}", day.weekday, a.span_label()),
                ));
            } else if a.overlaps(b) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::Overlap,
                    format!(
                        "Weekday {}: {} overlaps {}",
                        day.weekday,
                        a.span_label(),
                        b.span_label()
                    ),
                ));
            }
        }
    }
}

/// Finds the first pair of distinct overlapping windows in a start-sorted
/// window list.
pub fn find_overlap(windows: &[TimeWindow]) -> Option<(&TimeWindow, &TimeWindow)> {
    let mut latest: Option<&TimeWindow> = None;
    for w in windows {
        if let Some(prev) = latest {
            if prev.overlaps(w) && !prev.has_span(w.start, w.end) {
                return Some((prev, w));
            }
            if w.end > prev.end {
                latest = Some(w);
            }
        } else {
            latest = Some(w);
        }
    }
    None
}
