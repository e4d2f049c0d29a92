//! End-to-end timetable planner.
//!
//! # Pipeline
//!
//! 1. Derive entries from period markers ([`crate::derivation`]).
//! 2. Substitute elective blocks ([`crate::elective`]).
//! 3. Append dismissal entries ([`crate::dismissal`]).
//! 4. Consolidate into a weekly plan ([`crate::consolidation`]).
//!
//! Steps 1-3 depend only on the markers; step 4 binds programs and
//! anchors the result to a calendar week.

use chrono::NaiveDate;
use std::path::Path;

use tracing::info;

use crate::catalog::TemplateCatalog;
use crate::config::EngineConfig;
use crate::consolidation::consolidate;
use crate::derivation::derive_entries;
use crate::dismissal::add_dismissals;
use crate::elective::apply_electives;
use crate::error::Result;
use crate::models::{markers_from_paths, PeriodMarker, ProgramResolver, ScheduleEntry, WeeklyPlan};

/// Runs the resolution pipeline against a catalog and configuration.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_timetable::models::{IdSequence, PeriodMarker, ProgramRegistry};
/// use u_timetable::planner::TimetablePlanner;
///
/// let planner = TimetablePlanner::new();
/// let markers = [PeriodMarker::new(0, 7).unwrap(), PeriodMarker::new(0, 8).unwrap()];
///
/// let mut registry = ProgramRegistry::new(IdSequence::starting_at(1));
/// let monday = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
/// let plan = planner.plan_week(markers, monday, &mut registry).unwrap();
///
/// // recess, period 7, recess, period 8, dismissal
/// assert_eq!(plan.windows_for(0).len(), 5);
/// // elective block, dismissal
/// assert_eq!(plan.windows_for(1).len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetablePlanner {
    catalog: TemplateCatalog,
    config: EngineConfig,
}

impl TimetablePlanner {
    /// Creates a planner with the standard catalog and default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the template catalog.
    pub fn with_catalog(mut self, catalog: TemplateCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The template catalog in use.
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves markers into the final schedule entry list.
    ///
    /// Order: derived entries (minus substituted periods), elective blocks
    /// by weekday, dismissal entries by weekday.
    pub fn resolve_entries(
        &self,
        markers: impl IntoIterator<Item = PeriodMarker>,
    ) -> Result<Vec<ScheduleEntry>> {
        let entries = derive_entries(&self.catalog, markers)?;
        let entries = apply_electives(entries, &self.catalog, &self.config);
        add_dismissals(entries, &self.config)
    }

    /// Resolves markers and consolidates them into a weekly plan.
    pub fn plan_week<R>(
        &self,
        markers: impl IntoIterator<Item = PeriodMarker>,
        start_date: NaiveDate,
        resolver: &mut R,
    ) -> Result<WeeklyPlan>
    where
        R: ProgramResolver + ?Sized,
    {
        let entries = self.resolve_entries(markers)?;
        let plan = consolidate(&entries, start_date, resolver, self.config.overlap_policy)?;
        info!(
            start_date = %start_date,
            entries = entries.len(),
            windows = plan.window_count(),
            "Planned week"
        );
        Ok(plan)
    }

    /// Like [`Self::plan_week`], reading markers from content file names.
    pub fn plan_week_from_paths<I, P, R>(
        &self,
        paths: I,
        start_date: NaiveDate,
        resolver: &mut R,
    ) -> Result<WeeklyPlan>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        R: ProgramResolver + ?Sized,
    {
        let markers = markers_from_paths(paths)?;
        self.plan_week(markers, start_date, resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TemplateTable;
    use crate::config::OverlapPolicy;
    use crate::models::{parse_time, Category, IdSequence, ProgramRegistry, TimeWindow};
    use crate::validation::validate_plan;
    use crate::Error;
    use chrono::NaiveTime;

    fn t(text: &str) -> NaiveTime {
        parse_time(text).unwrap()
    }

    fn marker(weekday: u8, instance: u32) -> PeriodMarker {
        PeriodMarker::new(weekday, instance).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 15).unwrap()
    }

    fn dur(
        category: Category,
        weekday: u8,
        instance: Option<u32>,
        start: &str,
        minutes: u32,
    ) -> ScheduleEntry {
        ScheduleEntry::with_duration(category, [weekday], instance, t(start), minutes)
    }

    #[test]
    fn test_basic_derivation_scenario() {
        let planner = TimetablePlanner::new();
        let entries = planner.resolve_entries([marker(0, 7), marker(0, 8)]).unwrap();

        let expected = vec![
            dur(Category::Recess, 0, Some(7), "15:05:00", 10),
            dur(Category::Class, 0, Some(7), "15:15:00", 40),
            dur(Category::Recess, 0, Some(8), "15:55:00", 10),
            dur(Category::Class, 0, Some(8), "16:05:00", 40),
            dur(Category::Class, 1, Some(7), "15:15:00", 90),
            dur(Category::Class, 2, Some(7), "15:15:00", 90),
            dur(Category::Class, 3, Some(7), "15:15:00", 90),
            dur(Category::Dismissal, 0, None, "16:45:00", 45),
            dur(Category::Dismissal, 1, None, "16:45:00", 45),
            dur(Category::Dismissal, 2, None, "16:45:00", 45),
            dur(Category::Dismissal, 3, None, "16:45:00", 45),
        ];
        assert_eq!(entries, expected);

        let ends: Vec<NaiveTime> = entries[..4].iter().map(|e| e.end().unwrap()).collect();
        assert_eq!(
            ends,
            vec![t("15:14:59"), t("15:54:59"), t("16:04:59"), t("16:44:59")]
        );
    }

    #[test]
    fn test_unknown_marker_aborts() {
        let planner = TimetablePlanner::new();
        assert!(matches!(
            planner.resolve_entries([marker(0, 1), marker(5, 9)]),
            Err(Error::NoTemplate {
                table: TemplateTable::PreClass,
                weekday: 5,
                instance: 9
            })
        ));
    }

    #[test]
    fn test_full_week_plan() {
        // every period of the standard week except Monday period 8
        let mut markers = Vec::new();
        for weekday in 0..4u8 {
            for instance in 1..=8 {
                markers.push(marker(weekday, instance));
            }
        }
        for instance in 1..=6 {
            markers.push(marker(4, instance));
        }
        markers.retain(|m| *m != marker(0, 8));

        let planner = TimetablePlanner::new();
        let mut registry = ProgramRegistry::new(IdSequence::starting_at(1000));
        let plan = planner.plan_week(markers, monday(), &mut registry).unwrap();
        assert!(validate_plan(&plan).is_ok());

        // Monday: 7 periods with their pre-class windows, period 7 widened to
        // the elective, dismissal at 16:45
        let mon = plan.windows_for(0);
        assert_eq!(mon.len(), 14 + 1);
        let elective = &mon[13];
        assert_eq!(elective.start, t("15:15:00"));
        assert_eq!(elective.end, t("16:44:59"));
        assert_eq!(mon[14].start, t("16:45:00"));
        assert_eq!(mon[14].end, t("17:29:59"));

        // Tuesday: all 8 periods, 16 windows + dismissal
        assert_eq!(plan.windows_for(1).len(), 17);

        // Friday: 6 periods, dismissal at 14:35 for 30 minutes
        let fri = plan.windows_for(4);
        assert_eq!(fri.len(), 13);
        assert_eq!(fri[12].start, t("14:35:00"));
        assert_eq!(fri[12].end, t("15:04:59"));

        // Weekend stays empty
        assert!(plan.windows_for(5).is_empty());
        assert!(plan.windows_for(6).is_empty());

        // shared programs: morning-reading, exercise, recess, lunch, dismissal
        // + one per class period (7 + 8 + 8 + 8 + 6)
        assert_eq!(registry.programs().len(), 5 + 37);
    }

    #[test]
    fn test_plan_week_from_paths() {
        let planner = TimetablePlanner::new();
        let mut registry = ProgramRegistry::new(IdSequence::starting_at(1));
        let plan = planner
            .plan_week_from_paths(
                ["images/class/5-1.JPG", "images/class/5-1.JPG", "images/class/5-2.JPG"],
                monday(),
                &mut registry,
            )
            .unwrap();

        let fri: Vec<String> = plan.windows_for(4).iter().map(TimeWindow::span_label).collect();
        assert_eq!(
            fri,
            vec![
                "06:50:00-07:59:59",
                "08:00:00-08:39:59",
                "08:40:00-09:09:59",
                "09:10:00-09:49:59",
                "09:50:00-10:19:59",
            ]
        );
        // no period 8 anywhere: Monday-Thursday stay empty
        for weekday in 0..4 {
            assert!(plan.windows_for(weekday).is_empty());
        }
        assert!(planner
            .plan_week_from_paths(["readme.txt"], monday(), &mut registry)
            .is_err());
    }

    #[test]
    fn test_week_without_last_period_has_no_electives() {
        let planner = TimetablePlanner::new();
        let entries = planner.resolve_entries([marker(4, 1), marker(1, 3)]).unwrap();

        let electives = entries
            .iter()
            .filter(|e| e.category == Category::Class && e.minutes == Some(90))
            .count();
        assert_eq!(electives, 0);

        let dismissal_days: Vec<u8> = entries
            .iter()
            .filter(|e| e.category == Category::Dismissal)
            .flat_map(|e| e.weekdays.iter().copied())
            .collect();
        assert_eq!(dismissal_days, vec![1, 4]);
    }

    #[test]
    fn test_custom_config() {
        let config = EngineConfig::default()
            .with_elective_weekdays([])
            .with_dismissal_minutes(20)
            .with_overlap_policy(OverlapPolicy::Accept);
        let planner = TimetablePlanner::new().with_config(config);
        let entries = planner.resolve_entries([marker(2, 7)]).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2], dur(Category::Dismissal, 2, None, "15:55:00", 20));
        assert_eq!(planner.config().dismissal_minutes, 20);
    }

    #[test]
    fn test_catalog_is_configurable() {
        let mut catalog = TemplateCatalog::standard();
        catalog.elective.minutes = Some(60);
        let planner = TimetablePlanner::new().with_catalog(catalog);
        let entries = planner.resolve_entries([marker(0, 8)]).unwrap();
        let elective = entries
            .iter()
            .find(|e| e.applies_to(1) && e.category == Category::Class)
            .unwrap();
        assert_eq!(elective.end().unwrap(), t("16:14:59"));
        assert_eq!(planner.catalog().elective.minutes, Some(60));
    }
}
