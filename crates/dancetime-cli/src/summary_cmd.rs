use std::process::ExitCode;

use dancetime_core::format::{date_label, time_label};
use dancetime_core::{AggregateResult, DashboardSummaryBuilder, TemporalRecord, normalize_record};

use crate::cli::{OutputFormat, SummaryArgs};
use crate::error::{CliResult, EXIT_SUCCESS};
use crate::shared::{capture_reference_now, print_json, resolve_timezone};
use crate::snapshot::load_snapshot;

pub fn run_summary(args: SummaryArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = resolve_timezone(args.common.tz.as_deref())?;
    let reference_now = capture_reference_now(args.common.now.as_deref(), tz)?;
    let snapshot = load_snapshot(&args.input)?;

    let summary = DashboardSummaryBuilder::new(reference_now).build(
        &snapshot.classes,
        &snapshot.events,
        &snapshot.reviews,
    );

    match output_format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => {
            print_aggregate("Classes", &summary.classes);
            print_aggregate("Events", &summary.events);
            println!("Reviews given: {}", summary.reviews_given);
            if let Some(highlight) = &summary.most_recent_review {
                let title = if highlight.event_title.is_empty() {
                    "(unknown event)"
                } else {
                    highlight.event_title.as_str()
                };
                println!("  Latest: review {} for {}", highlight.review.id, title);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn print_aggregate(label: &str, result: &AggregateResult) {
    let counts = &result.counts;
    println!(
        "{}: {} today, {} upcoming, {} past ({} unparseable)",
        label, counts.today, counts.upcoming, counts.past, counts.unparseable
    );
    if let Some(record) = &result.nearest_upcoming {
        println!("  Next: {}", describe(record));
    }
    if let Some(record) = &result.most_recent_past {
        println!("  Last: {}", describe(record));
    }
}

fn describe(record: &TemporalRecord) -> String {
    match normalize_record(record) {
        Ok(instant) => format!(
            "{} on {} at {}",
            record.id,
            date_label(&instant),
            time_label(&instant)
        ),
        Err(_) => format!("{} (TBA)", record.id),
    }
}
