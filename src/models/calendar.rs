//! Time window and weekly plan models.
//!
//! Defines the output of consolidation: per-weekday, start-ordered windows
//! carrying the programs to play in them.
//!
//! # Time Model
//! Windows are closed intervals `[start, end]` of a single day with second
//! precision. Two windows touch (but do not overlap) when one ends at
//! `hh:mm:59` and the next starts at the following minute.
//!
//! # Anchoring
//! A plan covers the 7 days starting at `start_date`. Day offset `k`
//! corresponds to weekday `(W0 + k) mod 7`, where `W0` is the weekday of
//! `start_date` (0 = Monday).

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::marker::DAYS_PER_WEEK;
use super::program::ProgramRef;
use super::time::format_time;
use crate::error::{Error, Result};

/// A playback window on one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Zero-based weekday.
    pub weekday: u8,
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (inclusive).
    pub end: NaiveTime,
    /// Programs to play, in insertion order. May repeat.
    pub programs: Vec<ProgramRef>,
}

impl TimeWindow {
    /// Creates a window with no programs.
    pub fn new(weekday: u8, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            weekday,
            start,
            end,
            programs: Vec::new(),
        }
    }

    /// Adds a program reference.
    pub fn with_program(mut self, program: ProgramRef) -> Self {
        self.programs.push(program);
        self
    }

    /// Whether this window has the given (start, end) key.
    #[inline]
    pub fn has_span(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start == start && self.end == end
    }

    /// Whether a time of day falls within this window.
    #[inline]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time <= self.end
    }

    /// Whether two windows overlap (closed intervals).
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// `start-end` label used in messages.
    pub fn span_label(&self) -> String {
        format!("{}-{}", format_time(self.start), format_time(self.end))
    }
}

/// One calendar day of a weekly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based position within the plan.
    pub seq: u8,
    /// Zero-based weekday.
    pub weekday: u8,
    /// Calendar date of this day.
    pub date: NaiveDate,
    /// Windows sorted ascending by start.
    pub windows: Vec<TimeWindow>,
}

/// Seven consecutive days of playback windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    /// First calendar day of the plan.
    pub start_date: NaiveDate,
    /// Days in offset order (`days[0]` is `start_date`).
    pub days: Vec<DayPlan>,
}

impl WeeklyPlan {
    /// Creates an empty plan anchored at `start_date`.
    ///
    /// # Errors
    /// [`Error::InvalidInput`] if the week runs past the last representable
    /// date.
    pub fn new(start_date: NaiveDate) -> Result<Self> {
        let first = first_weekday(start_date);
        let days = (0..DAYS_PER_WEEK)
            .map(|offset| {
                let date = start_date
                    .checked_add_signed(Duration::days(i64::from(offset)))
                    .ok_or_else(|| {
                        Error::InvalidInput(format!("Week starting {start_date} is out of range"))
                    })?;
                Ok(DayPlan {
                    seq: offset + 1,
                    weekday: (first + offset) % DAYS_PER_WEEK,
                    date,
                    windows: Vec::new(),
                })
            })
            .collect::<Result<_>>()?;
        Ok(Self { start_date, days })
    }

    /// Weekday of the first day (0 = Monday).
    pub fn first_weekday(&self) -> u8 {
        first_weekday(self.start_date)
    }

    /// The day plan for a weekday.
    pub fn day(&self, weekday: u8) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.weekday == weekday)
    }

    /// Windows of a weekday (empty for unknown weekdays).
    pub fn windows_for(&self, weekday: u8) -> &[TimeWindow] {
        self.day(weekday).map(|d| d.windows.as_slice()).unwrap_or(&[])
    }

    /// Calendar date of a weekday within this plan.
    pub fn date_for(&self, weekday: u8) -> Option<NaiveDate> {
        self.day(weekday).map(|d| d.date)
    }

    /// Total number of windows across all days.
    pub fn window_count(&self) -> usize {
        self.days.iter().map(|d| d.windows.len()).sum()
    }

    /// Iterates all windows in day-offset order.
    pub fn windows(&self) -> impl Iterator<Item = &TimeWindow> {
        self.days.iter().flat_map(|d| d.windows.iter())
    }
}

fn first_weekday(date: NaiveDate) -> u8 {
    // num_days_from_monday is always < 7
    date.weekday().num_days_from_monday() as u8
}
