//! Core data types for dancetime.
//!
//! This module defines the primary types used throughout the library:
//! - [`RecordKind`] - Which store table a record came from
//! - [`Bucket`] - Past/today/upcoming classification outcome
//! - [`Granularity`] - Calendar-day or full-instant comparison
//! - [`TemporalRecord`] - The abstract dated input unit
//! - [`ClassRow`], [`EventRow`], [`ReviewRow`] - Rows as fetched from the store
//! - [`BucketCounts`], [`AggregateResult`] - Per-kind statistics
//! - [`DashboardSummary`] - The object rendered into dashboard tiles

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::instant::NormalizedInstant;

/// Opaque record identifier; the store hands out both numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// Record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Class,
    EventRsvp,
    Review,
}

impl RecordKind {
    /// The granularity this kind is classified at.
    pub const fn granularity(self) -> Granularity {
        match self {
            RecordKind::Class => Granularity::Day,
            RecordKind::EventRsvp | RecordKind::Review => Granularity::Instant,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Class => write!(f, "class"),
            RecordKind::EventRsvp => write!(f, "event_rsvp"),
            RecordKind::Review => write!(f, "review"),
        }
    }
}

/// Classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Past,
    /// Only produced at [`Granularity::Day`].
    Today,
    Upcoming,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Past => write!(f, "past"),
            Bucket::Today => write!(f, "today"),
            Bucket::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// Comparison resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Compare calendar dates only; yields [`Bucket::Today`] on a match.
    Day,
    /// Compare absolute instants; never yields [`Bucket::Today`].
    Instant,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Instant => write!(f, "instant"),
        }
    }
}

/// The abstract dated input unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalRecord {
    pub id: RecordId,
    pub kind: RecordKind,
    /// Date or datetime as stored.
    pub raw_date: String,
    /// Separate `HH:MM[:SS]` column, classes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_time: Option<String>,
    /// IANA zone, events only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Anything that can be viewed as a [`TemporalRecord`].
pub trait Dated {
    fn temporal(&self) -> TemporalRecord;
}

impl Dated for TemporalRecord {
    fn temporal(&self) -> TemporalRecord {
        self.clone()
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn temporal(&self) -> TemporalRecord {
        (**self).temporal()
    }
}

/// A class as stored: date and time live in two columns, no zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRow {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_name: Option<String>,
    /// Free-text street address; the city is one of its comma segments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_drop_in: bool,
    #[serde(default)]
    pub is_series: bool,
    #[serde(default)]
    pub requires_approval: bool,
    pub class_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

impl Dated for ClassRow {
    fn temporal(&self) -> TemporalRecord {
        TemporalRecord {
            id: self.id.clone(),
            kind: RecordKind::Class,
            raw_date: self.class_date.clone(),
            raw_time: self.start_time.clone(),
            timezone: None,
        }
    }
}

/// An event the user has RSVP'd to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    /// Event id; reviews reference it.
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    pub start_datetime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Dated for EventRow {
    fn temporal(&self) -> TemporalRecord {
        TemporalRecord {
            id: self.id.clone(),
            kind: RecordKind::EventRsvp,
            raw_date: self.start_datetime.clone(),
            raw_time: None,
            timezone: self.timezone.clone(),
        }
    }
}

/// A review the user wrote for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: String,
}

impl Dated for ReviewRow {
    fn temporal(&self) -> TemporalRecord {
        TemporalRecord {
            id: self.id.clone(),
            kind: RecordKind::Review,
            raw_date: self.created_at.clone(),
            raw_time: None,
            timezone: None,
        }
    }
}

/// Per-bucket record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub past: usize,
    /// Always zero at [`Granularity::Instant`].
    pub today: usize,
    pub upcoming: usize,
    /// Records whose date could not be normalized.
    pub unparseable: usize,
}

impl BucketCounts {
    /// Bump the counter for `bucket`.
    pub fn record(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::Past => self.past += 1,
            Bucket::Today => self.today += 1,
            Bucket::Upcoming => self.upcoming += 1,
        }
    }

    /// Records that landed in a bucket.
    pub fn classified(&self) -> usize {
        self.past + self.today + self.upcoming
    }

    /// Every record seen, including unparseable ones.
    pub fn total(&self) -> usize {
        self.classified() + self.unparseable
    }
}

/// Statistics and representative picks for one record kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub counts: BucketCounts,
    /// Soonest record in [`Bucket::Upcoming`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_upcoming: Option<TemporalRecord>,
    /// Latest record in [`Bucket::Past`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_recent_past: Option<TemporalRecord>,
}

/// The latest review plus the title of the event it is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewHighlight {
    pub review: ReviewRow,
    /// Empty when the referenced event is unknown.
    pub event_title: String,
}

/// Everything the dashboard tiles render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// The single "now" every comparison in this summary used.
    pub reference_now: NormalizedInstant,
    pub classes: AggregateResult,
    pub events: AggregateResult,
    pub reviews_given: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_recent_review: Option<ReviewHighlight>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_granularity() {
        assert_eq!(RecordKind::Class.granularity(), Granularity::Day);
        assert_eq!(RecordKind::EventRsvp.granularity(), Granularity::Instant);
    }

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"[7, "abc-1"]"#).unwrap();
        assert_eq!(ids, vec![RecordId::Number(7), RecordId::from("abc-1")]);
        assert_eq!(ids[0].to_string(), "7");
        assert_eq!(ids[1].to_string(), "abc-1");
    }

    #[test]
    fn class_row_defaults_and_temporal_view() {
        let row: ClassRow =
            serde_json::from_str(r#"{"id": 3, "class_date": "2025-03-10", "start_time": "18:30"}"#)
                .unwrap();
        assert!(!row.is_drop_in);
        assert!(row.price.is_none());

        let record = row.temporal();
        assert_eq!(record.kind, RecordKind::Class);
        assert_eq!(record.raw_date, "2025-03-10");
        assert_eq!(record.raw_time.as_deref(), Some("18:30"));
        assert!(record.timezone.is_none());
    }

    #[test]
    fn counts_bookkeeping() {
        let mut counts = BucketCounts::default();
        counts.record(Bucket::Past);
        counts.record(Bucket::Today);
        counts.record(Bucket::Upcoming);
        counts.unparseable += 1;
        assert_eq!(counts.classified(), 3);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn bucket_serialization() {
        assert_eq!(serde_json::to_string(&Bucket::Today).unwrap(), "\"today\"");
        assert_eq!(
            serde_json::to_string(&RecordKind::EventRsvp).unwrap(),
            "\"event_rsvp\""
        );
    }
}
