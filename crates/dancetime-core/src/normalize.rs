//! Date normalization.
//!
//! Store values arrive in three shapes:
//! - bare calendar dates: `2025-03-10` (optionally with a `T00:00:00` suffix)
//! - full datetimes: `2025-04-01T18:00:00Z`, `2025-04-01 18:00:00+00`,
//!   `2025-04-01T18:00:00` (no offset, read as UTC)
//! - either of the above plus a separate IANA zone column
//!
//! Bare dates are split into integer components and never handed to an
//! offset-aware parser. Anchoring them at UTC midnight and re-reading them
//! in a zone west of Greenwich moves them to the previous calendar day.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::trace;

use crate::error::ParseError;
use crate::instant::NormalizedInstant;
use crate::models::TemporalRecord;
use crate::tz::{local_to_utc, parse_tz};

const OFFSET_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Normalize a raw date, an optional separate time column and an optional
/// IANA zone into a [`NormalizedInstant`].
///
/// Without a zone a bare date yields a civil value. With a zone it yields
/// that wall-clock time in the zone. Full datetimes are parsed as absolute
/// instants and observed in `timezone`, or in UTC when no zone is given;
/// `raw_time` is ignored for them.
///
/// # Arguments
///
/// * `raw_date` - The stored value (e.g., "2025-03-10", "2025-04-01T18:00:00+00")
/// * `raw_time` - Separate `HH:MM[:SS]` column for date-only rows, if any
/// * `timezone` - IANA zone the row was recorded in, if any
///
/// # Returns
///
/// The normalized value, or a [`ParseError`] naming `raw_date` when either
/// the date, the time column or the zone cannot be read.
///
/// # Examples
///
/// ```
/// use dancetime_core::normalize::normalize;
///
/// let class = normalize("2025-03-10", Some("18:30"), None).unwrap();
/// assert_eq!((class.month(), class.day(), class.hour()), (3, 10, 18));
/// assert!(class.is_civil());
///
/// let event = normalize("2025-04-01T18:00:00Z", None, Some("America/New_York")).unwrap();
/// assert_eq!(event.hour(), 14);
///
/// assert!(normalize("not-a-date", None, None).is_err());
/// ```
pub fn normalize(
    raw_date: &str,
    raw_time: Option<&str>,
    timezone: Option<&str>,
) -> Result<NormalizedInstant, ParseError> {
    let trimmed = raw_date.trim();
    if trimmed.is_empty() {
        return Err(ParseError::new(raw_date, "empty date"));
    }

    let tz = timezone
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| parse_tz(name).map_err(|e| ParseError::new(raw_date, e.to_string())))
        .transpose()?;

    let date = parse_date_prefix(trimmed)
        .ok_or_else(|| ParseError::new(raw_date, "expected a YYYY-MM-DD date"))?;
    let suffix = &trimmed[10..];

    if is_date_only(suffix) {
        let time = match raw_time.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => parse_time(t).ok_or_else(|| {
                ParseError::new(raw_date, format!("invalid time '{}', expected HH:MM[:SS]", t))
            })?,
            None => NaiveTime::MIN,
        };
        trace!(raw_date, ?time, "normalized bare date");
        return Ok(from_wall_clock(date.and_time(time), tz));
    }

    let utc = parse_datetime(trimmed).ok_or_else(|| {
        ParseError::new(raw_date, "expected an ISO 8601 datetime after the date")
    })?;
    if raw_time.is_some() {
        trace!(raw_date, "separate time column ignored for full datetime");
    }
    let zone = tz.unwrap_or(chrono_tz::UTC);
    Ok(NormalizedInstant::zoned(utc.with_timezone(&zone)))
}

/// Normalize the date fields of a [`TemporalRecord`].
pub fn normalize_record(record: &TemporalRecord) -> Result<NormalizedInstant, ParseError> {
    normalize(
        &record.raw_date,
        record.raw_time.as_deref(),
        record.timezone.as_deref(),
    )
}

/// Parse a bare `HH:MM[:SS]` time column.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw.trim(), fmt).ok())
}

/// Read the leading `YYYY-MM-DD` as integers.
fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let prefix = s.get(..10)?;
    let bytes = prefix.as_bytes();
    let digits_at = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    if bytes[4] != b'-'
        || bytes[7] != b'-'
        || !digits_at(0..4)
        || !digits_at(5..7)
        || !digits_at(8..10)
    {
        return None;
    }

    let year: i32 = prefix[0..4].parse().ok()?;
    let month: u32 = prefix[5..7].parse().ok()?;
    let day: u32 = prefix[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// True for an empty suffix or a midnight time without any offset.
fn is_date_only(suffix: &str) -> bool {
    if suffix.is_empty() {
        return true;
    }
    let Some(time) = suffix.strip_prefix(['T', 't', ' ']) else {
        return false;
    };
    if time.contains(['Z', 'z', '+', '-']) {
        return false;
    }
    parse_time(time) == Some(NaiveTime::MIN)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::<FixedOffset>::parse_from_str(s, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn from_wall_clock(local: NaiveDateTime, tz: Option<Tz>) -> NormalizedInstant {
    match tz {
        Some(tz) => NormalizedInstant::zoned(local_to_utc(local, tz).with_timezone(&tz)),
        None => NormalizedInstant::civil(local.date(), local.time()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bare_date_keeps_calendar_day() {
        let value = normalize("2025-03-10", None, None).unwrap();
        assert!(value.is_civil());
        assert_eq!((value.year(), value.month(), value.day()), (2025, 3, 10));
        assert_eq!((value.hour(), value.minute()), (0, 0));
    }

    #[test]
    fn bare_date_with_time_column() {
        let value = normalize("2025-03-10", Some("19:45:30"), None).unwrap();
        assert_eq!((value.hour(), value.minute(), value.second()), (19, 45, 30));

        let short = normalize("2025-03-10", Some("07:05"), None).unwrap();
        assert_eq!((short.hour(), short.minute()), (7, 5));
    }

    #[test]
    fn midnight_suffix_is_discarded() {
        let value = normalize("2025-03-10T00:00:00", None, None).unwrap();
        assert!(value.is_civil());
        assert_eq!(value.day(), 10);

        let with_time = normalize("2025-03-10T00:00:00.000", Some("18:00"), None).unwrap();
        assert_eq!(with_time.hour(), 18);
    }

    #[test]
    fn midnight_with_offset_is_an_instant() {
        let value = normalize("2025-03-10T00:00:00Z", None, Some("America/New_York")).unwrap();
        assert!(!value.is_civil());
        // Midnight UTC is the evening before in New York.
        assert_eq!((value.day(), value.hour()), (9, 20));
    }

    #[test]
    fn zulu_datetime_without_zone_stays_utc() {
        let value = normalize("2025-04-01T18:00:00Z", None, None).unwrap();
        assert_eq!(value.zone(), Some(chrono_tz::UTC));
        assert_eq!(
            value.to_utc(chrono_tz::UTC),
            Utc.with_ymd_and_hms(2025, 4, 1, 18, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn offset_datetime_is_observed_in_zone() {
        let value = normalize("2025-04-01T18:00:00+02:00", None, Some("Europe/Berlin")).unwrap();
        assert_eq!((value.day(), value.hour()), (1, 18));
        assert_eq!(
            value.to_utc(chrono_tz::UTC),
            Utc.with_ymd_and_hms(2025, 4, 1, 16, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn postgres_style_offset() {
        let value = normalize("2025-04-01 18:00:00+00", None, None).unwrap();
        assert_eq!(
            value.to_utc(chrono_tz::UTC),
            Utc.with_ymd_and_hms(2025, 4, 1, 18, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn naive_datetime_reads_as_utc() {
        let value = normalize("2025-04-01T18:30:00", None, None).unwrap();
        assert!(!value.is_civil());
        assert_eq!(
            value.to_utc(chrono_tz::UTC),
            Utc.with_ymd_and_hms(2025, 4, 1, 18, 30, 0).single().unwrap()
        );
    }

    #[test]
    fn bare_date_with_zone_is_wall_clock_in_zone() {
        let value = normalize("2025-04-01", Some("20:00"), Some("America/Los_Angeles")).unwrap();
        assert_eq!((value.day(), value.hour()), (1, 20));
        assert_eq!(
            value.to_utc(chrono_tz::UTC),
            Utc.with_ymd_and_hms(2025, 4, 2, 3, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        for raw in [
            "not-a-date",
            "",
            "   ",
            "2025-13-01",
            "2025-02-30",
            "2025/03/10",
            "2025-03-10Tnoon",
            "2025-03",
        ] {
            let err = normalize(raw, None, None).unwrap_err();
            assert_eq!(err.input, raw);
        }
    }

    #[test]
    fn rejects_bad_time_column_and_zone() {
        assert!(normalize("2025-03-10", Some("25:00"), None).is_err());
        assert!(normalize("2025-03-10", Some("soon"), None).is_err());
        assert!(normalize("2025-04-01T18:00:00Z", None, Some("Mars/Olympus")).is_err());
    }

    #[test]
    fn empty_time_column_is_absent() {
        let value = normalize("2025-03-10", Some("  "), Some("")).unwrap();
        assert!(value.is_civil());
        assert_eq!(value.hour(), 0);
    }

    #[test]
    fn normalize_record_uses_all_columns() {
        let record = TemporalRecord {
            id: 1.into(),
            kind: crate::models::RecordKind::EventRsvp,
            raw_date: "2025-04-01T18:00:00Z".to_string(),
            raw_time: None,
            timezone: Some("America/New_York".to_string()),
        };
        let value = normalize_record(&record).unwrap();
        assert_eq!(value.hour(), 14);
    }
}
