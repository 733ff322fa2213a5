//! Bucket statistics and representative picks.

use std::cmp::Ordering;

use crate::classify::{ClassifiedBatch, ClassifiedRecord, classify_records};
use crate::instant::NormalizedInstant;
use crate::models::{AggregateResult, Bucket, BucketCounts, Dated, Granularity};
use crate::sort::compare;

/// Fold a classified batch into counts plus the soonest upcoming and most
/// recent past record.
///
/// The picks use the same comparator as list display, so on a sorted batch
/// they are the first upcoming and first past entries. The batch does not
/// have to be sorted.
pub fn aggregate<T: Dated>(batch: &ClassifiedBatch<T>) -> AggregateResult {
    let mut counts = BucketCounts {
        unparseable: batch.unparseable.len(),
        ..BucketCounts::default()
    };
    let mut nearest_upcoming: Option<&ClassifiedRecord<T>> = None;
    let mut most_recent_past: Option<&ClassifiedRecord<T>> = None;

    for record in &batch.records {
        counts.record(record.bucket);
        let slot = match record.bucket {
            Bucket::Upcoming => &mut nearest_upcoming,
            Bucket::Past => &mut most_recent_past,
            Bucket::Today => continue,
        };
        if slot.is_none_or(|best| compare(record, best) == Ordering::Less) {
            *slot = Some(record);
        }
    }

    AggregateResult {
        counts,
        nearest_upcoming: nearest_upcoming.map(|r| r.record.temporal()),
        most_recent_past: most_recent_past.map(|r| r.record.temporal()),
    }
}

/// Classify, sort and aggregate one kind of rows in a single call.
pub fn aggregate_rows<T, I>(
    rows: I,
    reference_now: &NormalizedInstant,
    granularity: Granularity,
) -> AggregateResult
where
    T: Dated,
    I: IntoIterator<Item = T>,
{
    aggregate(&classify_records(rows, reference_now, granularity).sorted())
}
