//! # dancetime-core
//!
//! Timezone-safe classification and aggregation of dated records for a
//! dance-class marketplace dashboard.
//!
//! Rows fetched from the store (classes, event RSVPs, reviews) flow through
//! one pipeline:
//!
//! 1. [`normalize`](normalize::normalize) parses bare dates, full datetimes
//!    and zoned datetimes without shifting the calendar day.
//! 2. [`classify`](classify::classify) buckets a value as past, today or
//!    upcoming at day or instant granularity.
//! 3. [`sort`] orders records with one comparator (soonest upcoming first,
//!    most recent past first).
//! 4. [`aggregate`](aggregate::aggregate) counts buckets and picks the
//!    representative records.
//! 5. [`DashboardSummaryBuilder`] composes the three kinds into one summary.
//!
//! Every stage takes the reference "now" as an argument. Capture it once
//! per render with [`NormalizedInstant::reference`].
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use dancetime_core::prelude::*;
//!
//! let now = NormalizedInstant::reference(
//!     Utc.with_ymd_and_hms(2025, 3, 30, 0, 0, 0).single().unwrap(),
//!     parse_tz("UTC").unwrap(),
//! );
//! let events = vec![
//!     EventRow {
//!         id: RecordId::from("late"),
//!         title: "Brunch Social".to_string(),
//!         start_datetime: "2025-04-02T10:00:00Z".to_string(),
//!         timezone: None,
//!     },
//!     EventRow {
//!         id: RecordId::from("early"),
//!         title: "Friday Night Salsa".to_string(),
//!         start_datetime: "2025-04-01T18:00:00Z".to_string(),
//!         timezone: None,
//!     },
//! ];
//!
//! let summary = build_summary(&[], &events, &[], &now);
//! assert_eq!(summary.events.counts.upcoming, 2);
//! assert_eq!(summary.events.nearest_upcoming.unwrap().id, RecordId::from("early"));
//! ```

pub mod aggregate;
pub mod classify;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod format;
pub mod instant;
pub mod models;
pub mod normalize;
pub mod sort;
pub mod tz;

// Re-export commonly used types at the crate root
pub use aggregate::{aggregate, aggregate_rows};
pub use classify::{ClassifiedBatch, ClassifiedRecord, Unparseable, classify, classify_records};
pub use dashboard::{
    DashboardSummaryBuilder, EventListing, ScheduleItem, ScheduleTab, build_summary,
    event_listing, schedule_tab,
};
pub use error::{DanceTimeError, ParseError, Result};
pub use filter::{ClassFilter, ClassFormat, ClassListing, filter_classes};
pub use instant::NormalizedInstant;
pub use models::{
    AggregateResult, Bucket, BucketCounts, ClassRow, DashboardSummary, Dated, EventRow,
    Granularity, RecordId, RecordKind, ReviewHighlight, ReviewRow, TemporalRecord,
};
pub use normalize::{normalize, normalize_record};

/// Prelude module for convenient imports.
///
/// ```
/// use dancetime_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aggregate::{aggregate, aggregate_rows};
    pub use crate::classify::{ClassifiedBatch, ClassifiedRecord, classify, classify_records};
    pub use crate::dashboard::{
        DashboardSummaryBuilder, build_summary, event_listing, schedule_tab,
    };
    pub use crate::error::{DanceTimeError, ParseError, Result};
    pub use crate::filter::{ClassFilter, ClassFormat, filter_classes};
    pub use crate::instant::NormalizedInstant;
    pub use crate::models::*;
    pub use crate::normalize::{normalize, normalize_record};
    pub use crate::sort::{compare, sort_records};
    pub use crate::tz::parse_tz;
}
