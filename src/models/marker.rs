//! Period markers.
//!
//! A marker records that a class takes place at a given weekday and
//! period. Markers come from content file names of the form
//! `<weekday-1-based>-<instance>`, e.g. `3-7.JPG` is Wednesday, period 7.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Number of days in a week.
pub const DAYS_PER_WEEK: u8 = 7;

/// A detected (weekday, period) pair.
///
/// Ordering is by weekday, then instance. Deserialization applies the same
/// range checks as [`PeriodMarker::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawMarker")]
pub struct PeriodMarker {
    /// Zero-based weekday (0 = Monday).
    pub weekday: u8,
    /// Period instance (1-based).
    pub instance: u32,
}

impl PeriodMarker {
    /// Creates a marker, validating its ranges.
    pub fn new(weekday: u8, instance: u32) -> Result<Self> {
        if weekday >= DAYS_PER_WEEK {
            return Err(Error::InvalidInput(format!(
                "Weekday {weekday} out of range 0..{DAYS_PER_WEEK}"
            )));
        }
        if instance == 0 {
            return Err(Error::InvalidInput(
                "Period instance must be at least 1".to_string(),
            ));
        }
        Ok(Self { weekday, instance })
    }

    /// Parses a file stem such as `"3-7"` (weekday written 1-based).
    pub fn from_stem(stem: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput(format!("Invalid period marker '{stem}'"));

        let (weekday, instance) = stem.split_once('-').ok_or_else(invalid)?;
        let weekday: u8 = weekday.trim().parse().map_err(|_| invalid())?;
        let instance: u32 = instance.trim().parse().map_err(|_| invalid())?;
        if weekday == 0 {
            return Err(invalid());
        }
        Self::new(weekday - 1, instance)
    }

    /// Parses a file path, ignoring directories and the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::InvalidInput(format!("Invalid marker path {path:?}")))?;
        Self::from_stem(stem)
    }
}

#[derive(Deserialize)]
struct RawMarker {
    weekday: u8,
    instance: u32,
}

impl TryFrom<RawMarker> for PeriodMarker {
    type Error = Error;

    fn try_from(raw: RawMarker) -> Result<Self> {
        Self::new(raw.weekday, raw.instance)
    }
}

impl fmt::Display for PeriodMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", u32::from(self.weekday) + 1, self.instance)
    }
}

/// Parses and deduplicates markers from file paths.
///
/// The returned set is ordered by (weekday, instance).
pub fn markers_from_paths<I, P>(paths: I) -> Result<BTreeSet<PeriodMarker>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().map(PeriodMarker::from_path).collect()
}
