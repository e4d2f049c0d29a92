//! Schedule entry model.
//!
//! A schedule entry is one timed activity of the school day (a class, a
//! recess, lunch, ...) before any program is bound to it. Catalog rows are
//! entries spanning many weekdays; derived entries always carry a single
//! weekday.
//!
//! # Timing
//! Exactly one of `stop` / `minutes` is set. Use [`ScheduleEntry::with_duration`]
//! or [`ScheduleEntry::with_stop`] to build entries that uphold this.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::time::{format_time, nominal_stop, resolve_end};
use crate::error::Result;

/// Activity category of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Morning self-study before the first class.
    MorningReading,
    /// Mid-morning exercise break.
    Exercise,
    /// Short break between classes.
    Recess,
    /// Midday break.
    Lunch,
    /// A class period (regular or elective).
    Class,
    /// End of the school day.
    Dismissal,
}

impl Category {
    /// Stable label, also used as the logical program name of shared categories.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MorningReading => "morning-reading",
            Category::Exercise => "exercise",
            Category::Recess => "recess",
            Category::Lunch => "lunch",
            Category::Class => "class",
            Category::Dismissal => "dismissal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timed activity applicable to a set of weekdays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Activity category.
    pub category: Category,
    /// Zero-based weekdays (0 = Monday) this entry applies to.
    pub weekdays: BTreeSet<u8>,
    /// Period instance (`None` for synthesized entries such as dismissal).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<u32>,
    /// Canonical start time.
    pub start: NaiveTime,
    /// Explicit nominal stop time (exclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<NaiveTime>,
    /// Duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
}

impl ScheduleEntry {
    /// Creates a duration-based entry.
    pub fn with_duration(
        category: Category,
        weekdays: impl IntoIterator<Item = u8>,
        instance: Option<u32>,
        start: NaiveTime,
        minutes: u32,
    ) -> Self {
        Self {
            category,
            weekdays: weekdays.into_iter().collect(),
            instance,
            start,
            stop: None,
            minutes: Some(minutes),
        }
    }

    /// Creates an entry with an explicit stop time.
    pub fn with_stop(
        category: Category,
        weekdays: impl IntoIterator<Item = u8>,
        instance: Option<u32>,
        start: NaiveTime,
        stop: NaiveTime,
    ) -> Self {
        Self {
            category,
            weekdays: weekdays.into_iter().collect(),
            instance,
            start,
            stop: Some(stop),
            minutes: None,
        }
    }

    /// Returns a copy restricted to a single weekday.
    pub fn specialize(&self, weekday: u8) -> Self {
        Self {
            weekdays: BTreeSet::from([weekday]),
            ..self.clone()
        }
    }

    /// Whether this entry applies to the given weekday.
    #[inline]
    pub fn applies_to(&self, weekday: u8) -> bool {
        self.weekdays.contains(&weekday)
    }

    /// Inclusive end time (`[start, end]`).
    pub fn end(&self) -> Result<NaiveTime> {
        resolve_end(self.start, self.stop, self.minutes)
    }

    /// Nominal stop: the time the following activity starts.
    pub fn nominal_stop(&self) -> Result<NaiveTime> {
        nominal_stop(self.start, self.stop, self.minutes)
    }

    /// Whether this is a class entry at the given instance.
    pub fn is_class(&self, instance: u32) -> bool {
        self.category == Category::Class && self.instance == Some(instance)
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)?;
        if let Some(instance) = self.instance {
            write!(f, "#{instance}")?;
        }
        write!(f, " {:?} @{}", self.weekdays, format_time(self.start))?;
        match (self.stop, self.minutes) {
            (Some(stop), _) => write!(f, "-{}", format_time(stop)),
            (None, Some(minutes)) => write!(f, " ({minutes}m)"),
            (None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_time;

    fn t(text: &str) -> NaiveTime {
        parse_time(text).unwrap()
    }

    #[test]
    fn test_entry_end_times() {
        let class = ScheduleEntry::with_duration(Category::Class, [0], Some(1), t("08:00:00"), 40);
        assert_eq!(class.end().unwrap(), t("08:39:59"));
        assert_eq!(class.nominal_stop().unwrap(), t("08:40:00"));

        let lunch =
            ScheduleEntry::with_stop(Category::Lunch, [0, 1], Some(5), t("11:35:00"), t("13:30:00"));
        assert_eq!(lunch.end().unwrap(), t("13:29:59"));
    }

    #[test]
    fn test_specialize_replaces_weekdays() {
        let row = ScheduleEntry::with_duration(Category::Recess, 0..5, Some(3), t("09:50:00"), 10);
        let entry = row.specialize(2);
        assert_eq!(entry.weekdays, BTreeSet::from([2]));
        assert_eq!(entry.start, row.start);
        assert_eq!(row.weekdays.len(), 5);
        assert!(entry.applies_to(2));
        assert!(!entry.applies_to(0));
    }

    #[test]
    fn test_is_class() {
        let class = ScheduleEntry::with_duration(Category::Class, [0], Some(7), t("15:15:00"), 40);
        assert!(class.is_class(7));
        assert!(!class.is_class(8));
        let recess = ScheduleEntry::with_duration(Category::Recess, [0], Some(7), t("15:05:00"), 10);
        assert!(!recess.is_class(7));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::MorningReading.to_string(), "morning-reading");
        assert_eq!(Category::Dismissal.as_str(), "dismissal");
    }

    #[test]
    fn test_display() {
        let class = ScheduleEntry::with_duration(Category::Class, [0], Some(7), t("15:15:00"), 90);
        assert_eq!(class.to_string(), "class#7 {0} @15:15:00 (90m)");
    }
}
