//! Dashboard composition.
//!
//! [`DashboardSummaryBuilder`] turns the three fetched collections (classes,
//! event RSVPs, reviews) into one [`DashboardSummary`]. The events tab and
//! the combined "Events & Classes" tab reuse the same classification and
//! ordering so every page agrees on what is upcoming.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::aggregate::aggregate;
use crate::classify::{ClassifiedRecord, classify_records};
use crate::instant::NormalizedInstant;
use crate::models::{
    Bucket, ClassRow, DashboardSummary, Dated, EventRow, RecordId, RecordKind, ReviewHighlight,
    ReviewRow, TemporalRecord,
};
use crate::sort::sort_records;

/// Builds a [`DashboardSummary`] against one captured reference "now".
#[derive(Debug, Clone)]
pub struct DashboardSummaryBuilder {
    reference_now: NormalizedInstant,
    event_titles: HashMap<RecordId, String>,
}

impl DashboardSummaryBuilder {
    pub fn new(reference_now: NormalizedInstant) -> Self {
        Self {
            reference_now,
            event_titles: HashMap::new(),
        }
    }

    /// Titles for events referenced by reviews but absent from the RSVP rows.
    ///
    /// These take precedence over titles found in the event rows.
    pub fn with_event_titles<I>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = (RecordId, String)>,
    {
        self.event_titles.extend(titles);
        self
    }

    /// Classes are classified by calendar day, events by instant.
    ///
    /// Empty or fully unparseable collections produce zero counts and no
    /// representative record.
    pub fn build(
        &self,
        class_rows: &[ClassRow],
        event_rows: &[EventRow],
        review_rows: &[ReviewRow],
    ) -> DashboardSummary {
        let now = &self.reference_now;
        let classes =
            aggregate(&classify_records(class_rows, now, RecordKind::Class.granularity()).sorted());
        let events =
            aggregate(&classify_records(event_rows, now, RecordKind::EventRsvp.granularity()).sorted());

        let most_recent_review =
            most_recent_review(review_rows, &self.reference_now).map(|review| ReviewHighlight {
                event_title: self.event_title(review, event_rows),
                review: review.clone(),
            });

        debug!(
            classes = classes.counts.total(),
            events = events.counts.total(),
            reviews = review_rows.len(),
            "built dashboard summary"
        );

        DashboardSummary {
            reference_now: self.reference_now.clone(),
            classes,
            events,
            reviews_given: review_rows.len(),
            most_recent_review,
        }
    }

    fn event_title(&self, review: &ReviewRow, event_rows: &[EventRow]) -> String {
        let Some(event_id) = &review.event_id else {
            return String::new();
        };
        if let Some(title) = self.event_titles.get(event_id) {
            return title.clone();
        }
        match event_rows.iter().find(|event| &event.id == event_id) {
            Some(event) => event.title.clone(),
            None => {
                debug!(review = %review.id, event = %event_id, "reviewed event not found");
                String::new()
            }
        }
    }
}

/// Build a dashboard summary without extra event titles.
pub fn build_summary(
    class_rows: &[ClassRow],
    event_rows: &[EventRow],
    review_rows: &[ReviewRow],
    reference_now: &NormalizedInstant,
) -> DashboardSummary {
    DashboardSummaryBuilder::new(reference_now.clone()).build(class_rows, event_rows, review_rows)
}

/// The review with the latest creation instant; ties go to the earlier row.
pub fn most_recent_review<'a>(
    review_rows: &'a [ReviewRow],
    reference_now: &NormalizedInstant,
) -> Option<&'a ReviewRow> {
    let batch = classify_records(review_rows, reference_now, RecordKind::Review.granularity());
    let mut latest: Option<&ClassifiedRecord<&ReviewRow>> = None;
    for record in &batch.records {
        if latest.is_none_or(|best| record.effective > best.effective) {
            latest = Some(record);
        }
    }
    latest.map(|record| record.record)
}

/// The events tab: upcoming and past RSVPs as two ordered lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventListing<T> {
    pub reference_now: NormalizedInstant,
    /// Soonest first.
    pub upcoming: Vec<ClassifiedRecord<T>>,
    /// Most recent first.
    pub past: Vec<ClassifiedRecord<T>>,
    pub unparseable: usize,
}

pub fn event_listing<T, I>(rows: I, reference_now: &NormalizedInstant) -> EventListing<T>
where
    T: Dated,
    I: IntoIterator<Item = T>,
{
    let batch =
        classify_records(rows, reference_now, RecordKind::EventRsvp.granularity()).sorted();
    let unparseable = batch.unparseable.len();
    let (upcoming, past): (Vec<_>, Vec<_>) = batch
        .records
        .into_iter()
        .partition(|record| record.bucket != Bucket::Past);

    EventListing {
        reference_now: reference_now.clone(),
        upcoming,
        past,
        unparseable,
    }
}

/// One row of the combined "Events & Classes" tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleItem {
    Class(ClassRow),
    Event(EventRow),
}

impl Dated for ScheduleItem {
    fn temporal(&self) -> TemporalRecord {
        match self {
            ScheduleItem::Class(row) => row.temporal(),
            ScheduleItem::Event(row) => row.temporal(),
        }
    }
}

/// The combined tab: classes by day, events by instant, one ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleTab {
    pub reference_now: NormalizedInstant,
    pub entries: Vec<ClassifiedRecord<ScheduleItem>>,
    pub unparseable: usize,
}

impl ScheduleTab {
    pub fn upcoming(&self) -> impl Iterator<Item = &ClassifiedRecord<ScheduleItem>> {
        self.entries.iter().filter(|e| e.bucket != Bucket::Past)
    }

    pub fn past(&self) -> impl Iterator<Item = &ClassifiedRecord<ScheduleItem>> {
        self.entries.iter().filter(|e| e.bucket == Bucket::Past)
    }
}

pub fn schedule_tab(
    class_rows: &[ClassRow],
    event_rows: &[EventRow],
    reference_now: &NormalizedInstant,
) -> ScheduleTab {
    let classes = classify_records(
        class_rows.iter().cloned().map(ScheduleItem::Class),
        reference_now,
        RecordKind::Class.granularity(),
    );
    let events = classify_records(
        event_rows.iter().cloned().map(ScheduleItem::Event),
        reference_now,
        RecordKind::EventRsvp.granularity(),
    );
    let unparseable = classes.unparseable.len() + events.unparseable.len();

    let mut entries: Vec<_> = classes.records.into_iter().chain(events.records).collect();
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.position = position;
    }
    sort_records(&mut entries);

    ScheduleTab {
        reference_now: reference_now.clone(),
        entries,
        unparseable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tz::parse_tz;
    use chrono::{TimeZone, Utc};

    fn now_utc(y: i32, m: u32, d: u32, h: u32) -> NormalizedInstant {
        NormalizedInstant::reference(
            Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap(),
            chrono_tz::UTC,
        )
    }

    fn class(id: i64, date: &str, time: Option<&str>) -> ClassRow {
        ClassRow {
            id: RecordId::Number(id),
            title: format!("Class {id}"),
            instructor_name: None,
            studio_name: None,
            address: None,
            price: None,
            is_drop_in: true,
            is_series: false,
            requires_approval: false,
            class_date: date.to_string(),
            start_time: time.map(str::to_string),
        }
    }

    fn event(id: i64, title: &str, start: &str) -> EventRow {
        EventRow {
            id: RecordId::Number(id),
            title: title.to_string(),
            start_datetime: start.to_string(),
            timezone: None,
        }
    }

    fn review(id: i64, event_id: Option<i64>, created_at: &str) -> ReviewRow {
        ReviewRow {
            id: RecordId::Number(id),
            event_id: event_id.map(RecordId::Number),
            rating: Some(5),
            comment: None,
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn summary_composes_three_kinds() {
        let now = now_utc(2025, 3, 30, 0);
        let classes = vec![
            class(1, "2025-03-30", None),
            class(2, "2025-04-05", Some("19:00")),
        ];
        let events = vec![
            event(10, "Spring Social", "2025-04-01T18:00:00Z"),
            event(11, "Bachata Night", "2025-04-02T10:00:00Z"),
        ];
        let reviews = vec![
            review(100, Some(11), "2025-01-01"),
            review(101, Some(10), "2025-02-01"),
        ];

        let summary = build_summary(&classes, &events, &reviews, &now);

        assert_eq!(summary.classes.counts.today, 1);
        assert_eq!(summary.classes.counts.upcoming, 1);
        assert_eq!(summary.events.counts.upcoming, 2);
        assert_eq!(summary.events.nearest_upcoming.unwrap().id, RecordId::Number(10));
        assert_eq!(summary.reviews_given, 2);

        let highlight = summary.most_recent_review.unwrap();
        assert_eq!(highlight.review.id, RecordId::Number(101));
        assert_eq!(highlight.event_title, "Spring Social");
    }

    #[test]
    fn each_kind_uses_its_own_granularity() {
        let now = now_utc(2025, 3, 30, 18);
        let classes = vec![class(1, "2025-03-30", Some("09:00"))];
        let events = vec![event(10, "Morning Workshop", "2025-03-30T09:00:00Z")];

        let summary = build_summary(&classes, &events, &[], &now);
        assert_eq!(summary.classes.counts.today, 1);
        assert_eq!(summary.events.counts.past, 1);

        let tab = schedule_tab(&classes, &events, &now);
        let buckets: Vec<_> = tab.entries.iter().map(|e| e.bucket).collect();
        assert_eq!(buckets, vec![Bucket::Today, Bucket::Past]);
    }

    #[test]
    fn empty_and_unparseable_inputs_degrade_to_zero() {
        let now = now_utc(2025, 3, 30, 0);
        let classes = vec![class(1, "TBA", None), class(2, "", None)];
        let summary = build_summary(&classes, &[], &[], &now);

        assert_eq!(summary.classes.counts.unparseable, 2);
        assert_eq!(summary.classes.counts.classified(), 0);
        assert!(summary.classes.nearest_upcoming.is_none());
        assert!(summary.classes.most_recent_past.is_none());
        assert_eq!(summary.events.counts.total(), 0);
        assert_eq!(summary.reviews_given, 0);
        assert!(summary.most_recent_review.is_none());
    }

    #[test]
    fn missing_event_gives_empty_title() {
        let now = now_utc(2025, 3, 30, 0);
        let reviews = vec![
            review(1, Some(99), "2025-03-01T10:00:00Z"),
            review(2, None, "2025-01-01"),
        ];
        let summary = build_summary(&[], &[], &reviews, &now);

        let highlight = summary.most_recent_review.unwrap();
        assert_eq!(highlight.review.id, RecordId::Number(1));
        assert_eq!(highlight.event_title, "");
    }

    #[test]
    fn external_titles_fill_the_join() {
        let now = now_utc(2025, 3, 30, 0);
        let reviews = vec![review(1, Some(99), "2025-03-01")];
        let summary = DashboardSummaryBuilder::new(now)
            .with_event_titles([(RecordId::Number(99), "Salsa Congress".to_string())])
            .build(&[], &[], &reviews);

        assert_eq!(summary.most_recent_review.unwrap().event_title, "Salsa Congress");
    }

    #[test]
    fn most_recent_review_skips_unparseable_and_keeps_first_tie() {
        let now = now_utc(2025, 3, 30, 0);
        let reviews = vec![
            review(1, None, "2025-02-01"),
            review(2, None, "whenever"),
            review(3, None, "2025-02-01T00:00:00"),
            review(4, None, "2025-01-15"),
        ];
        assert_eq!(most_recent_review(&reviews, &now).unwrap().id, RecordId::Number(1));
    }

    #[test]
    fn event_listing_splits_and_orders() {
        let now = now_utc(2025, 3, 30, 12);
        let rows = vec![
            event(1, "Far", "2025-05-01T18:00:00Z"),
            event(2, "Old", "2025-01-01T18:00:00Z"),
            event(3, "Near", "2025-03-30T12:20:00Z"),
            event(4, "Recent", "2025-03-29T18:00:00Z"),
            event(5, "Broken", "soon"),
        ];
        let listing = event_listing(&rows, &now);

        let upcoming: Vec<_> = listing.upcoming.iter().map(|r| r.record.title.as_str()).collect();
        let past: Vec<_> = listing.past.iter().map(|r| r.record.title.as_str()).collect();
        assert_eq!(upcoming, vec!["Near", "Far"]);
        assert_eq!(past, vec!["Recent", "Old"]);
        assert_eq!(listing.unparseable, 1);
    }

    #[test]
    fn schedule_tab_merges_kinds_by_their_granularity() {
        let tz = parse_tz("America/New_York").unwrap();
        let now = NormalizedInstant::reference(
            Utc.with_ymd_and_hms(2025, 3, 30, 22, 0, 0).single().unwrap(),
            tz,
        );
        // 18:00 in New York on March 30th
        let classes = vec![
            class(1, "2025-03-30", Some("10:00")),
            class(2, "2025-04-02", None),
            class(3, "2025-03-28", None),
        ];
        let events = vec![
            event(10, "Tonight", "2025-03-30T23:30:00Z"),
            event(11, "Afternoon", "2025-03-30T18:00:00Z"),
        ];
        let tab = schedule_tab(&classes, &events, &now);

        let order: Vec<(Bucket, String)> = tab
            .entries
            .iter()
            .map(|e| {
                let id = e.record.temporal().id.to_string();
                (e.bucket, id)
            })
            .collect();
        assert_eq!(
            order,
            vec![
                (Bucket::Today, "1".to_string()),
                (Bucket::Upcoming, "10".to_string()),
                (Bucket::Upcoming, "2".to_string()),
                (Bucket::Past, "11".to_string()),
                (Bucket::Past, "3".to_string()),
            ]
        );
        assert_eq!(tab.upcoming().count(), 3);
        assert_eq!(tab.past().count(), 2);
    }
}
