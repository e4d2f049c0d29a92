//! Weekly program schedule resolution.
//!
//! Turns the period markers observed in a content store into a weekly
//! plan of playback windows, each bound to the programs that play in it.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ScheduleEntry`, `PeriodMarker`,
//!   `TimeWindow`, `WeeklyPlan`, `ProgramKey`, `ProgramRegistry`
//! - **`catalog`**: Pre-class and class-period template tables
//! - **`derivation`**: Marker to entry join against the catalog
//! - **`elective`**: Elective block substitution for short weekdays
//! - **`dismissal`**: Per-weekday dismissal synthesis
//! - **`consolidation`**: Week fan-out and window merging
//! - **`planner`**: The end-to-end pipeline
//! - **`config`**: Engine settings, loadable from TOML
//! - **`validation`**: Catalog and plan integrity checks
//!
//! # Time Model
//!
//! Windows are closed intervals `[start, end]` at one-second resolution.
//! An entry that runs `m` minutes from `s` ends at `s + m - 1s`; its
//! nominal stop `s + m` is where the next activity may begin.

pub mod catalog;
pub mod config;
pub mod consolidation;
pub mod derivation;
pub mod dismissal;
pub mod elective;
pub mod error;
pub mod models;
pub mod planner;
pub mod validation;

pub use error::{Error, Result};
