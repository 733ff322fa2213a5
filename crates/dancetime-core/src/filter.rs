//! Class browsing filters.
//!
//! A listing first applies the rolling date window (a day-granularity
//! classification against "now" and against "now + N days"), then the
//! user-facing filters, then the shared display ordering.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{ClassifiedRecord, classify, classify_records};
use crate::error::{DanceTimeError, Result};
use crate::instant::NormalizedInstant;
use crate::models::{Bucket, ClassRow, Granularity, RecordKind};

const CLASS_GRANULARITY: Granularity = RecordKind::Class.granularity();

/// Drop-in and series are mutually exclusive choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassFormat {
    DropIn,
    Series,
}

impl std::fmt::Display for ClassFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassFormat::DropIn => write!(f, "drop-in"),
            ClassFormat::Series => write!(f, "series"),
        }
    }
}

/// User-selected filters for the class list. Echoed back with results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassFilter {
    /// Free text matched against title, instructor and studio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Dance-style keyword matched against the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ClassFormat>,
    /// Only classes that do not need instructor approval.
    #[serde(default)]
    pub open_enrollment: bool,
    /// Keep classes from today through today + N days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_days: Option<u32>,
    /// Without a window, past classes are hidden unless this is set.
    #[serde(default)]
    pub include_past: bool,
}

impl ClassFilter {
    /// Reject price bounds that are negative or inverted.
    pub fn validate(&self) -> Result<()> {
        for bound in [self.min_price, self.max_price].into_iter().flatten() {
            if !bound.is_finite() || bound < 0.0 {
                return Err(DanceTimeError::InvalidFilter(format!(
                    "price bound {} must be a non-negative number",
                    bound
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(DanceTimeError::InvalidFilter(format!(
                "min price {} is above max price {}",
                min, max
            )));
        }
        Ok(())
    }

    /// Apply the user-facing filters (everything but the date window).
    pub fn matches(&self, row: &ClassRow) -> bool {
        self.matches_search(row)
            && self.matches_style(row)
            && self.matches_city(row)
            && self.matches_price(row)
            && self.matches_format(row)
            && (!self.open_enrollment || !row.requires_approval)
    }

    fn matches_search(&self, row: &ClassRow) -> bool {
        let Some(query) = non_empty(&self.search) else {
            return true;
        };
        [
            Some(row.title.as_str()),
            row.instructor_name.as_deref(),
            row.studio_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&query))
    }

    fn matches_style(&self, row: &ClassRow) -> bool {
        match non_empty(&self.style) {
            Some(style) => row.title.to_lowercase().contains(&style),
            None => true,
        }
    }

    fn matches_city(&self, row: &ClassRow) -> bool {
        let Some(city) = non_empty(&self.city) else {
            return true;
        };
        row.address
            .as_deref()
            .and_then(city_from_address)
            .is_some_and(|found| found.to_lowercase() == city)
    }

    fn matches_price(&self, row: &ClassRow) -> bool {
        // Rows without a price are free.
        let price = row.price.unwrap_or(0.0);
        self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }

    fn matches_format(&self, row: &ClassRow) -> bool {
        match self.format {
            Some(ClassFormat::DropIn) => row.is_drop_in && !row.is_series,
            Some(ClassFormat::Series) => row.is_series && !row.is_drop_in,
            None => true,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

/// Extract the city from a free-text address.
///
/// With three or more comma segments the city is the second-to-last
/// (`"12 Main St, Austin, TX 78701"`), with two it is the last
/// (`"12 Main St, Austin"`). A single segment has no recognizable city.
pub fn city_from_address(address: &str) -> Option<&str> {
    let segments: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    match segments.len() {
        0 | 1 => None,
        2 => Some(segments[1]),
        n => Some(segments[n - 2]),
    }
}

/// True when `instant` falls on a calendar day from today through
/// today + `days`, both ends inclusive.
pub fn within_window(
    instant: &NormalizedInstant,
    reference_now: &NormalizedInstant,
    days: u32,
) -> bool {
    if classify(instant, reference_now, CLASS_GRANULARITY) == Bucket::Past {
        return false;
    }
    match reference_now.add_days(u64::from(days)) {
        Some(window_end) => classify(instant, &window_end, CLASS_GRANULARITY) != Bucket::Upcoming,
        None => true,
    }
}

/// The filtered class list plus the filter that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassListing {
    pub filter: ClassFilter,
    pub reference_now: NormalizedInstant,
    pub classes: Vec<ClassifiedRecord<ClassRow>>,
    /// Rows dropped because their date did not normalize.
    pub unparseable: usize,
}

/// Filter and order classes for the browsing page.
pub fn filter_classes(
    rows: &[ClassRow],
    filter: &ClassFilter,
    reference_now: &NormalizedInstant,
) -> Result<ClassListing> {
    filter.validate()?;

    let mut batch = classify_records(rows.iter().cloned(), reference_now, CLASS_GRANULARITY);
    batch.retain(|entry| match filter.window_days {
        Some(days) => within_window(&entry.instant, reference_now, days),
        None => filter.include_past || entry.bucket != Bucket::Past,
    });
    batch.retain(|entry| filter.matches(&entry.record));
    batch.sort();

    debug!(
        total = rows.len(),
        kept = batch.records.len(),
        unparseable = batch.unparseable.len(),
        "filtered classes"
    );

    Ok(ClassListing {
        filter: filter.clone(),
        reference_now: reference_now.clone(),
        unparseable: batch.unparseable.len(),
        classes: batch.records,
    })
}
