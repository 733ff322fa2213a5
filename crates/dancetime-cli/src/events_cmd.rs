use std::process::ExitCode;

use dancetime_core::event_listing;
use dancetime_core::format::{countdown, date_label, time_label};

use crate::cli::{EventsArgs, OutputFormat};
use crate::error::{CliResult, EXIT_SUCCESS};
use crate::shared::{capture_reference_now, print_json, resolve_timezone};
use crate::snapshot::load_snapshot;

pub fn run_events(args: EventsArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = resolve_timezone(args.common.tz.as_deref())?;
    let reference_now = capture_reference_now(args.common.now.as_deref(), tz)?;
    let snapshot = load_snapshot(&args.input)?;

    let listing = event_listing(snapshot.events, &reference_now);

    match output_format {
        OutputFormat::Json => print_json(&listing)?,
        OutputFormat::Text => {
            println!("Upcoming:");
            for entry in &listing.upcoming {
                println!(
                    "  {} {} {} (starts in {})",
                    date_label(&entry.instant),
                    time_label(&entry.instant),
                    entry.record.title,
                    countdown(&entry.instant, &reference_now)
                );
            }
            println!("Past:");
            for entry in &listing.past {
                println!(
                    "  {} {} {}",
                    date_label(&entry.instant),
                    time_label(&entry.instant),
                    entry.record.title
                );
            }
            if listing.unparseable > 0 {
                println!("{} events with unparseable dates", listing.unparseable);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
