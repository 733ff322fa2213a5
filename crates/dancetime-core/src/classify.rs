//! Past/today/upcoming classification.
//!
//! [`classify`] is the pure comparison of one normalized value against the
//! captured reference "now". [`classify_records`] runs a whole batch through
//! normalization and classification, setting aside records whose dates do
//! not normalize instead of guessing a bucket for them.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::ParseError;
use crate::instant::NormalizedInstant;
use crate::models::{Bucket, BucketCounts, Dated, Granularity};
use crate::normalize::normalize_record;
use crate::sort::sort_records;

/// Classify `instant` relative to `reference_now`.
///
/// - [`Granularity::Instant`]: strictly earlier is [`Bucket::Past`],
///   anything else is [`Bucket::Upcoming`].
/// - [`Granularity::Day`]: only the calendar dates are compared, each in its
///   own frame (civil values as stored, zoned values in their zone, the
///   reference in the caller's zone). Equal dates give [`Bucket::Today`].
///
/// # Arguments
///
/// * `instant` - The normalized record value
/// * `reference_now` - The caller's "now", captured once per computation
/// * `granularity` - How finely the two are compared
///
/// # Returns
///
/// The bucket. Instant granularity never yields [`Bucket::Today`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use dancetime_core::prelude::*;
///
/// // 23:00 on March 10th in UTC-5
/// let tz = parse_tz("America/Bogota").unwrap();
/// let now = NormalizedInstant::reference(
///     Utc.with_ymd_and_hms(2025, 3, 11, 4, 0, 0).single().unwrap(),
///     tz,
/// );
/// let class = normalize("2025-03-10", None, None).unwrap();
///
/// assert_eq!(classify(&class, &now, Granularity::Day), Bucket::Today);
/// ```
pub fn classify(
    instant: &NormalizedInstant,
    reference_now: &NormalizedInstant,
    granularity: Granularity,
) -> Bucket {
    match granularity {
        Granularity::Day => match instant.local_date().cmp(&reference_now.local_date()) {
            Ordering::Less => Bucket::Past,
            Ordering::Equal => Bucket::Today,
            Ordering::Greater => Bucket::Upcoming,
        },
        Granularity::Instant => {
            let frame = reference_frame(reference_now);
            if instant.to_utc(frame) < reference_now.to_utc(frame) {
                Bucket::Past
            } else {
                Bucket::Upcoming
            }
        }
    }
}

/// The zone civil values are resolved in for absolute comparisons.
pub fn reference_frame(reference_now: &NormalizedInstant) -> Tz {
    reference_now.zone().unwrap_or(chrono_tz::UTC)
}

/// A record with its normalized date and bucket attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord<T> {
    pub record: T,
    pub instant: NormalizedInstant,
    pub bucket: Bucket,
    /// Absolute instant used for ordering.
    #[serde(skip)]
    pub effective: DateTime<Utc>,
    /// Index in the input batch, the final tie-breaker.
    #[serde(skip)]
    pub position: usize,
}

/// A record whose date could not be normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unparseable<T> {
    pub record: T,
    pub error: ParseError,
    #[serde(skip)]
    pub position: usize,
}

/// The result of classifying one batch against one reference "now".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedBatch<T> {
    pub reference_now: NormalizedInstant,
    pub granularity: Granularity,
    pub records: Vec<ClassifiedRecord<T>>,
    pub unparseable: Vec<Unparseable<T>>,
}

impl<T> ClassifiedBatch<T> {
    /// Per-bucket counts, unparseable records included.
    pub fn counts(&self) -> BucketCounts {
        let mut counts = BucketCounts {
            unparseable: self.unparseable.len(),
            ..BucketCounts::default()
        };
        for record in &self.records {
            counts.record(record.bucket);
        }
        counts
    }

    /// Order the classified records with the shared comparator.
    pub fn sort(&mut self) {
        sort_records(&mut self.records);
    }

    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }

    /// Classified records in `bucket`, in current order.
    pub fn in_bucket(&self, bucket: Bucket) -> impl Iterator<Item = &ClassifiedRecord<T>> {
        self.records.iter().filter(move |r| r.bucket == bucket)
    }

    /// Keep only the classified records matching `keep`.
    ///
    /// Unparseable records are untouched so they stay visible in counts.
    pub fn retain(&mut self, keep: impl FnMut(&ClassifiedRecord<T>) -> bool) {
        self.records.retain(keep);
    }
}

/// Normalize and classify every record of a batch.
///
/// Unparseable records are logged and returned in
/// [`ClassifiedBatch::unparseable`]; they never reach a bucket. The output
/// keeps input order; call [`ClassifiedBatch::sort`] for display order.
pub fn classify_records<T, I>(
    records: I,
    reference_now: &NormalizedInstant,
    granularity: Granularity,
) -> ClassifiedBatch<T>
where
    T: Dated,
    I: IntoIterator<Item = T>,
{
    let frame = reference_frame(reference_now);
    let mut batch = ClassifiedBatch {
        reference_now: reference_now.clone(),
        granularity,
        records: Vec::new(),
        unparseable: Vec::new(),
    };

    for (position, record) in records.into_iter().enumerate() {
        let temporal = record.temporal();
        match normalize_record(&temporal) {
            Ok(instant) => {
                let bucket = classify(&instant, reference_now, granularity);
                trace!(kind = %temporal.kind, id = %temporal.id, %instant, %bucket, "classified");
                batch.records.push(ClassifiedRecord {
                    effective: instant.to_utc(frame),
                    record,
                    instant,
                    bucket,
                    position,
                });
            }
            Err(error) => {
                warn!(
                    kind = %temporal.kind,
                    id = %temporal.id,
                    error = %error,
                    "excluding record with unparseable date"
                );
                batch.unparseable.push(Unparseable {
                    record,
                    error,
                    position,
                });
            }
        }
    }

    debug!(
        %granularity,
        classified = batch.records.len(),
        unparseable = batch.unparseable.len(),
        "classified batch"
    );
    batch
}
