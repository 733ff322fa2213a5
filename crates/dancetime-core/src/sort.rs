//! The display ordering for classified records.
//!
//! One comparator serves every list and every representative pick:
//! - buckets in the order today, upcoming, past
//! - today and upcoming ascending (soonest first)
//! - past descending (most recent first)
//! - input position as the last tie-breaker

use std::cmp::Ordering;

use crate::classify::ClassifiedRecord;
use crate::models::Bucket;

fn bucket_rank(bucket: Bucket) -> u8 {
    match bucket {
        Bucket::Today => 0,
        Bucket::Upcoming => 1,
        Bucket::Past => 2,
    }
}

/// Compare two classified records under the display policy.
pub fn compare<T>(a: &ClassifiedRecord<T>, b: &ClassifiedRecord<T>) -> Ordering {
    bucket_rank(a.bucket)
        .cmp(&bucket_rank(b.bucket))
        .then_with(|| match a.bucket {
            Bucket::Past => b.effective.cmp(&a.effective),
            Bucket::Today | Bucket::Upcoming => a.effective.cmp(&b.effective),
        })
        .then_with(|| a.position.cmp(&b.position))
}

/// Sort records in place with [`compare`].
pub fn sort_records<T>(records: &mut [ClassifiedRecord<T>]) {
    records.sort_by(compare);
}
