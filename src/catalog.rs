//! Template catalog.
//!
//! Static lookup tables mapping (weekday, period) to canonical timing.
//!
//! # Tables
//! - **Pre-class**: the activity immediately preceding each period
//!   (morning reading before period 1, lunch before period 5, recess
//!   elsewhere).
//! - **Class period**: the period itself.
//! - **Elective**: a single wide block that replaces the last two periods
//!   on days without the final period.
//!
//! Rows may span many weekdays. For any legal (weekday, instance) at most
//! one row per table matches; [`crate::validation::validate_catalog`]
//! checks this.
//!
//! # Lookup
//! [`TemplateCatalog::find`] returns a fresh entry specialized to the
//! queried weekday; the rows themselves are never mutated.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{Category, ScheduleEntry};
use crate::validation::validate_catalog;

/// Which catalog table a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateTable {
    /// Activities preceding a period.
    PreClass,
    /// The periods themselves.
    ClassPeriod,
}

impl fmt::Display for TemplateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateTable::PreClass => f.write_str("pre-class"),
            TemplateTable::ClassPeriod => f.write_str("class-period"),
        }
    }
}

/// The complete set of timing templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCatalog {
    /// Pre-class rows, searched in order.
    pub pre_class: Vec<ScheduleEntry>,
    /// Class-period rows, searched in order.
    pub class_periods: Vec<ScheduleEntry>,
    /// Elective block template. Its weekday set is ignored.
    pub elective: ScheduleEntry,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TemplateCatalog {
    /// The standard weekly timetable.
    ///
    /// Monday to Thursday run eight periods until 16:45; Friday runs six
    /// periods with a shorter lunch.
    pub fn standard() -> Self {
        use Category::{Class, Exercise, Lunch, MorningReading, Recess};

        const MON_FRI: &[u8] = &[0, 1, 2, 3, 4];
        const MON_THU: &[u8] = &[0, 1, 2, 3];
        const FRI: &[u8] = &[4];

        let mins = |category, days: &[u8], instance, start, minutes| {
            ScheduleEntry::with_duration(category, days.iter().copied(), Some(instance), start, minutes)
        };
        let until = |category, days: &[u8], instance, start, stop| {
            ScheduleEntry::with_stop(category, days.iter().copied(), Some(instance), start, stop)
        };

        let pre_class = vec![
            until(MorningReading, MON_FRI, 1, hm(6, 50), hm(8, 0)),
            mins(Exercise, MON_FRI, 2, hm(8, 40), 30),
            mins(Recess, MON_FRI, 3, hm(9, 50), 10),
            mins(Recess, MON_FRI, 4, hm(10, 45), 10),
            until(Lunch, MON_THU, 5, hm(11, 35), hm(13, 30)),
            until(Lunch, FRI, 5, hm(11, 35), hm(13, 0)),
            mins(Recess, MON_THU, 6, hm(14, 10), 10),
            mins(Recess, FRI, 6, hm(13, 40), 10),
            mins(Recess, MON_THU, 7, hm(15, 5), 10),
            mins(Recess, MON_THU, 8, hm(15, 55), 10),
        ];

        let class_periods = vec![
            mins(Class, MON_FRI, 1, hm(8, 0), 40),
            mins(Class, MON_FRI, 2, hm(9, 10), 40),
            mins(Class, MON_FRI, 3, hm(10, 0), 45),
            mins(Class, MON_FRI, 4, hm(10, 55), 40),
            mins(Class, MON_THU, 5, hm(13, 30), 40),
            mins(Class, FRI, 5, hm(13, 0), 40),
            mins(Class, MON_THU, 6, hm(14, 20), 45),
            mins(Class, FRI, 6, hm(13, 50), 45),
            mins(Class, MON_THU, 7, hm(15, 15), 40),
            mins(Class, MON_THU, 8, hm(16, 5), 40),
        ];

        let elective = mins(Class, &[], 7, hm(15, 15), 90);

        Self {
            pre_class,
            class_periods,
            elective,
        }
    }

    /// Parses and validates a catalog from TOML.
    ///
    /// ```toml
    /// [[pre_class]]
    /// category = "morning-reading"
    /// weekdays = [0, 1, 2, 3, 4]
    /// instance = 1
    /// start = "06:50:00"
    /// stop = "08:00:00"
    ///
    /// [[class_periods]]
    /// category = "class"
    /// weekdays = [0, 1, 2, 3, 4]
    /// instance = 1
    /// start = "08:00:00"
    /// minutes = 40
    ///
    /// [elective]
    /// category = "class"
    /// weekdays = []
    /// instance = 7
    /// start = "15:15:00"
    /// minutes = 90
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(text)?;
        if let Err(errors) = validate_catalog(&catalog) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::Config(format!(
                "Invalid catalog: {}",
                messages.join("; ")
            )));
        }
        Ok(catalog)
    }

    /// Loads and validates a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Rows of a table.
    pub fn rows(&self, table: TemplateTable) -> &[ScheduleEntry] {
        match table {
            TemplateTable::PreClass => &self.pre_class,
            TemplateTable::ClassPeriod => &self.class_periods,
        }
    }

    /// Finds the first row of `table` matching (weekday, instance),
    /// specialized to that weekday.
    ///
    /// # Errors
    /// [`Error::NoTemplate`] if no row matches.
    pub fn find(&self, table: TemplateTable, weekday: u8, instance: u32) -> Result<ScheduleEntry> {
        self.rows(table)
            .iter()
            .find(|row| row.applies_to(weekday) && row.instance == Some(instance))
            .map(|row| row.specialize(weekday))
            .ok_or(Error::NoTemplate {
                table,
                weekday,
                instance,
            })
    }

    /// The activity preceding period `instance` on `weekday`.
    pub fn find_pre_class(&self, weekday: u8, instance: u32) -> Result<ScheduleEntry> {
        self.find(TemplateTable::PreClass, weekday, instance)
    }

    /// Period `instance` on `weekday`.
    pub fn find_class(&self, weekday: u8, instance: u32) -> Result<ScheduleEntry> {
        self.find(TemplateTable::ClassPeriod, weekday, instance)
    }

    /// The elective block specialized to `weekday`.
    pub fn elective_for(&self, weekday: u8) -> ScheduleEntry {
        self.elective.specialize(weekday)
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}
