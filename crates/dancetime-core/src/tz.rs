//! Timezone handling utilities.
//!
//! This module provides functions for parsing IANA zone names and
//! converting between UTC and wall-clock time with DST gaps and overlaps
//! resolved deterministically.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{DanceTimeError, Result};

/// Upper bound for walking out of a DST gap, in minutes.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Parse an IANA timezone name into a [`chrono_tz::Tz`].
///
/// Surrounding whitespace is ignored.
///
/// # Arguments
///
/// * `name` - The IANA timezone name (e.g., "America/Chicago")
///
/// # Returns
///
/// The parsed timezone, or [`DanceTimeError::InvalidTimezone`] for unknown names.
///
/// # Examples
///
/// ```
/// use dancetime_core::tz::parse_tz;
///
/// let tz = parse_tz("America/New_York").unwrap();
/// assert_eq!(tz.to_string(), "America/New_York");
/// ```
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| DanceTimeError::InvalidTimezone(name.to_string()))
}

/// Convert a wall-clock datetime in `tz` to UTC.
///
/// Ambiguous times (fall back) resolve to the earlier occurrence. Times
/// inside a spring-forward gap resolve to the first valid wall-clock minute
/// after the gap.
///
/// # Arguments
///
/// * `local` - The wall-clock datetime (without timezone)
/// * `tz` - The timezone to interpret it in
///
/// # Returns
///
/// The UTC instant. Never fails.
pub fn local_to_utc(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return dt.with_timezone(&Utc);
    }

    for minutes in 1..=MAX_GAP_MINUTES {
        let candidate = local + Duration::minutes(minutes);
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return dt.with_timezone(&Utc);
        }
    }

    // No zone in the database has a gap this wide; read the wall clock as UTC.
    local.and_utc()
}

/// Format a datetime as RFC3339 with its UTC offset.
pub fn format_rfc3339<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}
