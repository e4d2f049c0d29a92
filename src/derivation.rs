//! Schedule derivation.
//!
//! Joins observed period markers against the template catalog.
//!
//! # Algorithm
//! 1. Deduplicate markers and sort by (weekday, instance).
//! 2. For each marker, look up the pre-class row, then the class row.
//! 3. Append both, in that order, specialized to the marker's weekday.
//!
//! A marker without a template aborts the whole derivation: skipping it
//! would leave a hole in that day's timeline.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::catalog::TemplateCatalog;
use crate::error::Result;
use crate::models::{PeriodMarker, ScheduleEntry};

/// Derives schedule entries for a set of markers.
///
/// The output holds two entries per distinct marker, in ascending
/// (weekday, instance) order, pre-class entry first.
///
/// # Errors
/// [`crate::Error::NoTemplate`] for the first marker without a matching row.
///
/// # Example
///
/// ```
/// use u_timetable::catalog::TemplateCatalog;
/// use u_timetable::derivation::derive_entries;
/// use u_timetable::models::{Category, PeriodMarker};
///
/// let markers = [PeriodMarker::new(0, 1).unwrap()];
/// let entries = derive_entries(&TemplateCatalog::standard(), markers).unwrap();
/// assert_eq!(entries[0].category, Category::MorningReading);
/// assert_eq!(entries[1].category, Category::Class);
/// ```
pub fn derive_entries(
    catalog: &TemplateCatalog,
    markers: impl IntoIterator<Item = PeriodMarker>,
) -> Result<Vec<ScheduleEntry>> {
    let markers: BTreeSet<PeriodMarker> = markers.into_iter().collect();

    let mut entries = Vec::with_capacity(markers.len() * 2);
    for marker in &markers {
        let pre_class = catalog.find_pre_class(marker.weekday, marker.instance)?;
        let class = catalog.find_class(marker.weekday, marker.instance)?;
        trace!(%marker, pre_class = %pre_class, class = %class, "Derived period");
        entries.push(pre_class);
        entries.push(class);
    }

    debug!(
        markers = markers.len(),
        entries = entries.len(),
        "Derived schedule entries"
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TemplateTable;
    use crate::models::{parse_time, Category};
    use crate::Error;

    fn marker(weekday: u8, instance: u32) -> PeriodMarker {
        PeriodMarker::new(weekday, instance).unwrap()
    }

    #[test]
    fn test_derive_pairs_in_order() {
        let catalog = TemplateCatalog::standard();
        let entries = derive_entries(&catalog, [marker(0, 8), marker(0, 7)]).unwrap();

        let summary: Vec<(Category, u32, String)> = entries
            .iter()
            .map(|e| {
                (
                    e.category,
                    e.instance.unwrap(),
                    e.start.format("%H:%M:%S").to_string(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (Category::Recess, 7, "15:05:00".to_string()),
                (Category::Class, 7, "15:15:00".to_string()),
                (Category::Recess, 8, "15:55:00".to_string()),
                (Category::Class, 8, "16:05:00".to_string()),
            ]
        );
        assert!(entries.iter().all(|e| e.weekdays.len() == 1 && e.applies_to(0)));
    }

    #[test]
    fn test_duplicate_markers_collapse() {
        let catalog = TemplateCatalog::standard();
        let entries =
            derive_entries(&catalog, [marker(1, 3), marker(1, 3), marker(0, 2)]).unwrap();
        assert_eq!(entries.len(), 4);
        assert!(entries[0].applies_to(0));
        assert!(entries[2].applies_to(1));
    }

    #[test]
    fn test_weekday_sorts_before_instance() {
        let catalog = TemplateCatalog::standard();
        let entries = derive_entries(&catalog, [marker(1, 1), marker(0, 6)]).unwrap();
        assert!(entries[0].applies_to(0));
        assert_eq!(entries[1].start, parse_time("14:20:00").unwrap());
        assert!(entries[3].applies_to(1));
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let catalog = TemplateCatalog::standard();
        let err = derive_entries(&catalog, [marker(0, 1), marker(5, 9)]).unwrap_err();
        assert_eq!(
            err,
            Error::NoTemplate {
                table: TemplateTable::PreClass,
                weekday: 5,
                instance: 9
            }
        );
    }

    #[test]
    fn test_friday_seventh_period_has_no_template() {
        let catalog = TemplateCatalog::standard();
        assert!(matches!(
            derive_entries(&catalog, [marker(4, 7)]),
            Err(Error::NoTemplate { weekday: 4, .. })
        ));
    }

    #[test]
    fn test_empty_markers() {
        let catalog = TemplateCatalog::standard();
        assert!(derive_entries(&catalog, []).unwrap().is_empty());
    }
}
