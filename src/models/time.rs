//! Time-of-day arithmetic.
//!
//! # Time Model
//! All times are wall-clock times of day ([`NaiveTime`]) with second
//! precision and no date component. Nothing in a school day spans
//! midnight, so any computation that wraps past midnight is rejected.
//!
//! # Inclusive Ends
//! A window occupies `[start, end]` where `end` is one second before the
//! nominal stop. The next window begins exactly at the nominal stop:
//! - duration-based: `end = start + minutes - 1s`
//! - stop-based: `end = stop - 1s`

use chrono::{Duration, NaiveTime};

use crate::error::{Error, Result};

/// Wire format for times of day (`HH:MM:SS`).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Parses an `HH:MM:SS` time of day.
pub fn parse_time(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), TIME_FORMAT)
        .map_err(|e| Error::InvalidInput(format!("Invalid time '{text}': {e}")))
}

/// Formats a time of day as `HH:MM:SS`.
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Resolves the inclusive end time of a window.
///
/// Exactly one of `stop` / `duration_minutes` must be provided.
///
/// # Errors
/// [`Error::InvalidInput`] if both or neither are given, if the duration is
/// zero, if `stop` is not after `start`, or if the end would cross midnight.
///
/// # Examples
///
/// ```
/// use u_timetable::models::{parse_time, resolve_end};
///
/// let start = parse_time("06:50:00").unwrap();
/// let end = resolve_end(start, None, Some(70)).unwrap();
/// assert_eq!(end, parse_time("07:59:59").unwrap());
/// ```
pub fn resolve_end(
    start: NaiveTime,
    stop: Option<NaiveTime>,
    duration_minutes: Option<u32>,
) -> Result<NaiveTime> {
    let nominal = match (stop, duration_minutes) {
        (Some(_), Some(_)) => {
            return Err(Error::InvalidInput(format!(
                "Window at {} has both a stop time and a duration",
                format_time(start)
            )))
        }
        (None, None) => {
            return Err(Error::InvalidInput(format!(
                "Window at {} has neither a stop time nor a duration",
                format_time(start)
            )))
        }
        (Some(stop), None) => {
            if stop <= start {
                return Err(Error::InvalidInput(format!(
                    "Stop {} is not after start {}",
                    format_time(stop),
                    format_time(start)
                )));
            }
            stop
        }
        (None, Some(0)) => {
            return Err(Error::InvalidInput(format!(
                "Window at {} has a zero duration",
                format_time(start)
            )))
        }
        (None, Some(minutes)) => add_minutes(start, minutes)?,
    };

    // nominal > start, so stepping back one second never wraps
    Ok(nominal - Duration::seconds(1))
}

/// Nominal (exclusive) stop: the instant the next window may begin.
///
/// Same validation as [`resolve_end`]. A window that ends exactly at
/// midnight has no representable nominal stop and is rejected.
pub fn nominal_stop(
    start: NaiveTime,
    stop: Option<NaiveTime>,
    duration_minutes: Option<u32>,
) -> Result<NaiveTime> {
    let end = resolve_end(start, stop, duration_minutes)?;
    let (next, wrapped) = end.overflowing_add_signed(Duration::seconds(1));
    if wrapped != 0 {
        return Err(Error::InvalidInput(format!(
            "Window at {} runs until midnight",
            format_time(start)
        )));
    }
    Ok(next)
}

/// Adds whole minutes to a time of day, rejecting midnight crossings.
pub fn add_minutes(time: NaiveTime, minutes: u32) -> Result<NaiveTime> {
    let (sum, wrapped) = time.overflowing_add_signed(Duration::minutes(i64::from(minutes)));
    if wrapped != 0 {
        return Err(Error::InvalidInput(format!(
            "{} + {} min crosses midnight",
            format_time(time),
            minutes
        )));
    }
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(text: &str) -> NaiveTime {
        parse_time(text).unwrap()
    }

    #[test]
    fn test_resolve_end_from_duration() {
        assert_eq!(resolve_end(t("06:50:00"), None, Some(70)).unwrap(), t("07:59:59"));
        assert_eq!(resolve_end(t("15:15:00"), None, Some(90)).unwrap(), t("16:44:59"));
    }

    #[test]
    fn test_resolve_end_from_stop() {
        assert_eq!(
            resolve_end(t("11:35:00"), Some(t("13:30:00")), None).unwrap(),
            t("13:29:59")
        );
    }

    #[test]
    fn test_resolve_end_requires_exactly_one() {
        assert!(matches!(
            resolve_end(t("08:00:00"), None, None),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            resolve_end(t("08:00:00"), Some(t("09:00:00")), Some(40)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_end_rejects_midnight_crossing() {
        assert!(resolve_end(t("23:30:00"), None, Some(45)).is_err());
        // 23:30 + 30 min lands on midnight: no time of day left
        assert!(resolve_end(t("23:30:00"), None, Some(30)).is_err());
        assert_eq!(resolve_end(t("23:30:00"), None, Some(29)).unwrap(), t("23:58:59"));
    }

    #[test]
    fn test_resolve_end_rejects_degenerate_windows() {
        assert!(resolve_end(t("08:00:00"), None, Some(0)).is_err());
        assert!(resolve_end(t("08:00:00"), Some(t("08:00:00")), None).is_err());
        assert!(resolve_end(t("08:00:00"), Some(t("07:00:00")), None).is_err());
    }

    #[test]
    fn test_nominal_stop() {
        assert_eq!(nominal_stop(t("16:05:00"), None, Some(40)).unwrap(), t("16:45:00"));
        assert_eq!(
            nominal_stop(t("06:50:00"), Some(t("08:00:00")), None).unwrap(),
            t("08:00:00")
        );
    }

    #[test]
    fn test_parse_and_format() {
        assert_eq!(format_time(t("06:50:00")), "06:50:00");
        assert_eq!(format_time(t(" 13:05:09 ")), "13:05:09");
        assert!(parse_time("25:00:00").is_err());
        assert!(parse_time("8:00").is_err());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(t("09:59:59") < t("10:00:00"));
        assert!(t("10:00:00") < t("10:00:01"));
    }
}
