use std::process::ExitCode;

use dancetime_core::format::{date_label, relative_day_label, time_label};
use dancetime_core::{ClassFilter, filter_classes};

use crate::cli::{ClassesArgs, OutputFormat};
use crate::error::{CliResult, EXIT_SUCCESS};
use crate::shared::{capture_reference_now, parse_class_format, print_json, resolve_timezone};
use crate::snapshot::load_snapshot;

pub fn run_classes(args: ClassesArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = resolve_timezone(args.common.tz.as_deref())?;
    let reference_now = capture_reference_now(args.common.now.as_deref(), tz)?;
    let format = args.format.as_deref().map(parse_class_format).transpose()?;

    let filter = ClassFilter {
        search: args.search,
        style: args.style,
        city: args.city,
        min_price: args.min_price,
        max_price: args.max_price,
        format,
        open_enrollment: args.open_enrollment,
        window_days: args.window_days,
        include_past: args.include_past,
    };

    let snapshot = load_snapshot(&args.input)?;
    let listing = filter_classes(&snapshot.classes, &filter, &reference_now)?;

    match output_format {
        OutputFormat::Json => print_json(&listing)?,
        OutputFormat::Text => {
            for entry in &listing.classes {
                println!(
                    "{} {} ({}) {} [{}]",
                    date_label(&entry.instant),
                    time_label(&entry.instant),
                    relative_day_label(&entry.instant, &reference_now),
                    entry.record.title,
                    entry.bucket
                );
            }
            println!(
                "{} classes shown, {} with unparseable dates",
                listing.classes.len(),
                listing.unparseable
            );
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
