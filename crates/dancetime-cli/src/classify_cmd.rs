use std::process::ExitCode;

use dancetime_core::format::{date_label, relative_day_label, time_label};
use dancetime_core::{Bucket, Granularity, NormalizedInstant, classify, normalize};
use serde::Serialize;

use crate::cli::{ClassifyArgs, OutputFormat};
use crate::error::{CliResult, EXIT_SUCCESS};
use crate::shared::{capture_reference_now, parse_granularity, print_json, resolve_timezone};

#[derive(Debug, Serialize)]
struct ClassifyResult {
    date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timezone: Option<String>,
    granularity: Granularity,
    reference_now: NormalizedInstant,
    normalized: NormalizedInstant,
    bucket: Bucket,
    date_label: String,
    time_label: String,
    relative: String,
}

pub fn run_classify(args: ClassifyArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let granularity = parse_granularity(&args.granularity)?;
    let tz = resolve_timezone(args.common.tz.as_deref())?;
    let reference_now = capture_reference_now(args.common.now.as_deref(), tz)?;

    let normalized = normalize(&args.date, args.time.as_deref(), args.timezone.as_deref())?;
    let bucket = classify(&normalized, &reference_now, granularity);

    let result = ClassifyResult {
        date_label: date_label(&normalized),
        time_label: time_label(&normalized),
        relative: relative_day_label(&normalized, &reference_now),
        date: args.date,
        time: args.time,
        timezone: args.timezone,
        granularity,
        reference_now,
        normalized,
        bucket,
    };

    match output_format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => {
            println!("Input: {}", result.date);
            println!("Normalized: {}", result.normalized);
            println!("Reference now: {}", result.reference_now);
            println!("Granularity: {}", result.granularity);
            println!("Bucket: {}", result.bucket);
            println!(
                "Label: {} {} ({})",
                result.date_label, result.time_label, result.relative
            );
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
