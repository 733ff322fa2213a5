use std::process::ExitCode;

use dancetime_core::format::{date_label, relative_day_label, time_label};
use dancetime_core::{ScheduleItem, schedule_tab};

use crate::cli::{OutputFormat, ScheduleArgs};
use crate::error::{CliResult, EXIT_SUCCESS};
use crate::shared::{capture_reference_now, print_json, resolve_timezone};
use crate::snapshot::load_snapshot;

pub fn run_schedule(args: ScheduleArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = resolve_timezone(args.common.tz.as_deref())?;
    let reference_now = capture_reference_now(args.common.now.as_deref(), tz)?;
    let snapshot = load_snapshot(&args.input)?;

    let tab = schedule_tab(&snapshot.classes, &snapshot.events, &reference_now);

    match output_format {
        OutputFormat::Json => print_json(&tab)?,
        OutputFormat::Text => {
            for entry in &tab.entries {
                let (kind, title) = match &entry.record {
                    ScheduleItem::Class(row) => ("class", row.title.as_str()),
                    ScheduleItem::Event(row) => ("event", row.title.as_str()),
                };
                println!(
                    "[{}] {} {} ({}) {}: {}",
                    entry.bucket,
                    date_label(&entry.instant),
                    time_label(&entry.instant),
                    relative_day_label(&entry.instant, &reference_now),
                    kind,
                    title
                );
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
