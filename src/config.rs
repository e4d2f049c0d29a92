//! Engine configuration.
//!
//! Tunable constants of the resolution pipeline. Every field has a default
//! matching the standard school week, so an empty TOML document is a valid
//! configuration.
//!
//! ```toml
//! last_regular_period = 8
//! elective_weekdays = [0, 1, 2, 3]
//! dismissal_minutes = 45
//! overlap_policy = "reject"
//!
//! [[dismissal_overrides]]
//! weekday = 4
//! minutes = 30
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::DAYS_PER_WEEK;

/// What to do when consolidation produces overlapping windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Fail with [`Error::OverlapViolation`].
    #[default]
    Reject,
    /// Keep the plan; overlaps are only logged.
    Accept,
}

/// Dismissal duration for a specific weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissalOverride {
    /// Zero-based weekday.
    pub weekday: u8,
    /// Dismissal duration (minutes).
    pub minutes: u32,
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Last regular class period; a weekday without it gets an elective block.
    pub last_regular_period: u32,
    /// Weekdays eligible for elective substitution.
    pub elective_weekdays: BTreeSet<u8>,
    /// Default dismissal duration (minutes).
    pub dismissal_minutes: u32,
    /// Per-weekday dismissal durations.
    pub dismissal_overrides: Vec<DismissalOverride>,
    /// Handling of overlapping windows after consolidation.
    pub overlap_policy: OverlapPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            last_regular_period: 8,
            elective_weekdays: BTreeSet::from([0, 1, 2, 3]),
            dismissal_minutes: 45,
            dismissal_overrides: vec![DismissalOverride {
                weekday: 4,
                minutes: 30,
            }],
            overlap_policy: OverlapPolicy::Reject,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Sets the last regular period.
    pub fn with_last_regular_period(mut self, period: u32) -> Self {
        self.last_regular_period = period;
        self
    }

    /// Sets the weekdays eligible for elective substitution.
    pub fn with_elective_weekdays(mut self, weekdays: impl IntoIterator<Item = u8>) -> Self {
        self.elective_weekdays = weekdays.into_iter().collect();
        self
    }

    /// Sets the default dismissal duration.
    pub fn with_dismissal_minutes(mut self, minutes: u32) -> Self {
        self.dismissal_minutes = minutes;
        self
    }

    /// Sets (or replaces) the dismissal duration of one weekday.
    pub fn with_dismissal_override(mut self, weekday: u8, minutes: u32) -> Self {
        self.dismissal_overrides.retain(|o| o.weekday != weekday);
        self.dismissal_overrides
            .push(DismissalOverride { weekday, minutes });
        self
    }

    /// Sets the overlap policy.
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Dismissal duration for a weekday.
    pub fn dismissal_minutes_for(&self, weekday: u8) -> u32 {
        self.dismissal_overrides
            .iter()
            .find(|o| o.weekday == weekday)
            .map(|o| o.minutes)
            .unwrap_or(self.dismissal_minutes)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.last_regular_period == 0 {
            return Err(Error::Config(
                "last_regular_period must be at least 1".to_string(),
            ));
        }
        if let Some(day) = self.elective_weekdays.iter().find(|&&d| d >= DAYS_PER_WEEK) {
            return Err(Error::Config(format!(
                "elective weekday {day} out of range 0..{DAYS_PER_WEEK}"
            )));
        }
        if self.dismissal_minutes == 0 {
            return Err(Error::Config("dismissal_minutes must be positive".to_string()));
        }
        for o in &self.dismissal_overrides {
            if o.weekday >= DAYS_PER_WEEK || o.minutes == 0 {
                return Err(Error::Config(format!(
                    "invalid dismissal override: weekday {} minutes {}",
                    o.weekday, o.minutes
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.last_regular_period, 8);
        assert_eq!(config.dismissal_minutes_for(0), 45);
        assert_eq!(config.dismissal_minutes_for(3), 45);
        assert_eq!(config.dismissal_minutes_for(4), 30);
        assert_eq!(config.overlap_policy, OverlapPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
            last_regular_period = 7
            elective_weekdays = [0, 2]
            dismissal_minutes = 40
            overlap_policy = "accept"

            [[dismissal_overrides]]
            weekday = 2
            minutes = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.last_regular_period, 7);
        assert_eq!(config.elective_weekdays, BTreeSet::from([0, 2]));
        assert_eq!(config.dismissal_minutes_for(2), 20);
        assert_eq!(config.dismissal_minutes_for(4), 40);
        assert_eq!(config.overlap_policy, OverlapPolicy::Accept);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("elective_weekdays = [9]"),
            Err(Error::Config(_))
        ));
        assert!(EngineConfig::from_toml_str("dismissal_minutes = 0").is_err());
        assert!(EngineConfig::from_toml_str("overlap_policy = \"maybe\"").is_err());
    }

    #[test]
    fn test_builder_override_replaces() {
        let config = EngineConfig::default().with_dismissal_override(4, 25);
        assert_eq!(config.dismissal_overrides.len(), 1);
        assert_eq!(config.dismissal_minutes_for(4), 25);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dismissal_minutes = 50").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.dismissal_minutes_for(1), 50);

        assert!(matches!(
            EngineConfig::load("/nonexistent/u-timetable.toml"),
            Err(Error::Config(_))
        ));
    }
}
