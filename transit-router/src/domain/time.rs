//! Service-day time handling.
//!
//! All times inside the router are integer seconds relative to midnight of the
//! service date ("noon minus 12h" in GTFS terms). Trips running past midnight
//! simply have times above 24:00:00, so a single `i32` orders every event of a
//! service day without any date arithmetic in the hot path. This module converts
//! between that representation and human readable strings or calendar datetimes.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

/// Sentinel for "no time"; never a valid stop time.
pub const TIME_NOT_SET: i32 = i32::MIN;

/// Longest street or flexible leg the router accepts, in seconds.
///
/// Longer durations come from broken data. Keeping every leg below this
/// keeps service-day times far from `i32` overflow.
pub const MAX_LEG_DURATION: i32 = 2_000_000;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a service time in "HH:MM" or "HH:MM:SS" format into seconds since
/// service-day midnight.
///
/// Hours may exceed 23 for trips running after midnight.
///
/// # Examples
///
/// ```
/// use transit_router::domain::parse_time;
///
/// assert_eq!(parse_time("00:00").unwrap(), 0);
/// assert_eq!(parse_time("10:30").unwrap(), 37_800);
/// assert_eq!(parse_time("25:00:30").unwrap(), 90_030);
///
/// assert!(parse_time("1030").is_err());
/// assert!(parse_time("10:60").is_err());
/// ```
pub fn parse_time(s: &str) -> Result<i32, TimeError> {
    let mut parts = s.split(':');

    let hour = parts
        .next()
        .ok_or_else(|| TimeError::new("expected HH:MM format"))
        .and_then(parse_field)?;
    let minute = parts
        .next()
        .ok_or_else(|| TimeError::new("expected HH:MM format"))
        .and_then(parse_field)?;
    let second = match parts.next() {
        Some(sec) => parse_field(sec)?,
        None => 0,
    };

    if parts.next().is_some() {
        return Err(TimeError::new("too many fields"));
    }
    if hour > 99 {
        return Err(TimeError::new("hour must be 0-99"));
    }
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }
    if second > 59 {
        return Err(TimeError::new("second must be 0-59"));
    }

    Ok((hour * 3600 + minute * 60 + second) as i32)
}

/// Parse one two-digit field.
fn parse_field(field: &str) -> Result<u32, TimeError> {
    if field.len() != 2 {
        return Err(TimeError::new("fields must have two digits"));
    }
    field
        .parse::<u32>()
        .map_err(|_| TimeError::new("invalid digits"))
}

/// Display adapter printing seconds since midnight as "HH:MM:SS".
///
/// Negative times (possible in reverse searches before midnight) are
/// prefixed with a minus sign.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TimeFmt(pub i32);

impl fmt::Display for TimeFmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == TIME_NOT_SET {
            return f.write_str("-");
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        let secs = self.0.unsigned_abs();
        write!(
            f,
            "{sign}{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    }
}

impl fmt::Debug for TimeFmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeFmt({self})")
    }
}

/// Display adapter for durations, e.g. "1h5m30s" or "45s".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationFmt(pub i32);

impl fmt::Display for DurationFmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
        if h > 0 {
            write!(f, "{h}h")?;
        }
        if m > 0 {
            write!(f, "{m}m")?;
        }
        if s > 0 || (h == 0 && m == 0) {
            write!(f, "{s}s")?;
        }
        Ok(())
    }
}

/// Convert a service-day time to a calendar datetime.
///
/// Times past 24:00:00 land on the following calendar day.
///
/// # Examples
///
/// ```
/// use transit_router::domain::to_datetime;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let dt = to_datetime(date, 25 * 3600).unwrap();
/// assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
/// ```
pub fn to_datetime(service_date: NaiveDate, time: i32) -> Option<NaiveDateTime> {
    if time == TIME_NOT_SET {
        return None;
    }
    service_date
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::seconds(i64::from(time)))
}
