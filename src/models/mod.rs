//! Timetable domain models.
//!
//! Provides the data types flowing through the resolution pipeline, from
//! raw period markers to the finished weekly plan.
//!
//! # Pipeline Mapping
//!
//! | Stage | Input | Output |
//! |-------|-------|--------|
//! | Derivation | `PeriodMarker` | `ScheduleEntry` |
//! | Elective / dismissal | `ScheduleEntry` | `ScheduleEntry` |
//! | Consolidation | `ScheduleEntry` + `ProgramRef` | `WeeklyPlan` of `TimeWindow` |

mod calendar;
mod entry;
mod marker;
mod program;
mod time;

pub use calendar::{DayPlan, TimeWindow, WeeklyPlan};
pub use entry::{Category, ScheduleEntry};
pub use marker::{markers_from_paths, PeriodMarker, DAYS_PER_WEEK};
pub use program::{
    IdSequence, Program, ProgramKey, ProgramRef, ProgramRegistry, ProgramResolver,
};
pub use time::{add_minutes, format_time, nominal_stop, parse_time, resolve_end, TIME_FORMAT};
