//! The normalized date/time value shared by every pipeline stage.
//!
//! A [`NormalizedInstant`] is either *civil* (a calendar date and wall-clock
//! time with no zone, as stored for classes) or *zoned* (an absolute instant
//! observed in a specific IANA zone, as stored for events). Civil values are
//! never promoted to a zone implicitly; they only meet a zone when an
//! absolute comparison needs one, and then it is the zone of the captured
//! reference "now".

use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

use crate::tz::{format_rfc3339, local_to_utc};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    Civil(NaiveDateTime),
    Zoned(DateTime<Tz>),
}

/// A date/time reduced to calendar components plus an optional zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInstant {
    repr: Repr,
}

impl NormalizedInstant {
    /// A zone-less calendar date and wall-clock time.
    pub fn civil(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            repr: Repr::Civil(date.and_time(time)),
        }
    }

    /// An absolute instant observed in `tz`.
    pub fn zoned(dt: DateTime<Tz>) -> Self {
        Self {
            repr: Repr::Zoned(dt),
        }
    }

    /// Capture the reference "now" for one computation pass.
    ///
    /// `tz` is the caller's zone; its calendar date is the "today" that
    /// day-granularity classification compares against.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use dancetime_core::instant::NormalizedInstant;
    /// use dancetime_core::tz::parse_tz;
    ///
    /// let utc = Utc.with_ymd_and_hms(2025, 3, 11, 3, 0, 0).single().unwrap();
    /// let now = NormalizedInstant::reference(utc, parse_tz("America/New_York").unwrap());
    ///
    /// // 03:00Z is still the evening of March 10th in New York.
    /// assert_eq!((now.year(), now.month(), now.day()), (2025, 3, 10));
    /// ```
    pub fn reference(now: DateTime<Utc>, tz: Tz) -> Self {
        Self::zoned(now.with_timezone(&tz))
    }

    /// Wall-clock date and time in the value's own frame.
    pub fn local(&self) -> NaiveDateTime {
        match &self.repr {
            Repr::Civil(naive) => *naive,
            Repr::Zoned(dt) => dt.naive_local(),
        }
    }

    /// Calendar date in the value's own frame.
    pub fn local_date(&self) -> NaiveDate {
        self.local().date()
    }

    pub fn year(&self) -> i32 {
        self.local().year()
    }

    pub fn month(&self) -> u32 {
        self.local().month()
    }

    pub fn day(&self) -> u32 {
        self.local().day()
    }

    pub fn hour(&self) -> u32 {
        self.local().hour()
    }

    pub fn minute(&self) -> u32 {
        self.local().minute()
    }

    pub fn second(&self) -> u32 {
        self.local().second()
    }

    /// The attached zone, `None` for civil values.
    pub fn zone(&self) -> Option<Tz> {
        match &self.repr {
            Repr::Civil(_) => None,
            Repr::Zoned(dt) => Some(dt.timezone()),
        }
    }

    pub fn is_civil(&self) -> bool {
        matches!(self.repr, Repr::Civil(_))
    }

    /// Resolve to an absolute instant.
    ///
    /// Civil values are read as wall-clock time in `fallback`.
    pub fn to_utc(&self, fallback: Tz) -> DateTime<Utc> {
        match &self.repr {
            Repr::Civil(naive) => local_to_utc(*naive, fallback),
            Repr::Zoned(dt) => dt.with_timezone(&Utc),
        }
    }

    /// The same wall-clock time `days` calendar days later.
    ///
    /// Returns `None` when the result leaves chrono's supported range.
    pub fn add_days(&self, days: u64) -> Option<Self> {
        let shifted = self.local().checked_add_days(Days::new(days))?;
        let repr = match &self.repr {
            Repr::Civil(_) => Repr::Civil(shifted),
            Repr::Zoned(dt) => {
                let tz = dt.timezone();
                Repr::Zoned(local_to_utc(shifted, tz).with_timezone(&tz))
            }
        };
        Some(Self { repr })
    }
}

impl fmt::Display for NormalizedInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Civil(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S")),
            Repr::Zoned(dt) => write!(f, "{}[{}]", format_rfc3339(dt), dt.timezone()),
        }
    }
}

impl Serialize for NormalizedInstant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
