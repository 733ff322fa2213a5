use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dancetime_core::{ClassFormat, Granularity, NormalizedInstant};
use serde::Serialize;
use tracing::debug;

use crate::error::{CliError, CliResult};

pub const TIMEZONE_ENV_VAR: &str = "DANCETIME_TIMEZONE";

pub fn parse_granularity(s: &str) -> CliResult<Granularity> {
    match s.to_lowercase().as_str() {
        "day" => Ok(Granularity::Day),
        "instant" => Ok(Granularity::Instant),
        _ => Err(CliError::input(format!(
            "Invalid granularity '{}'. Expected: day, instant",
            s
        ))),
    }
}

pub fn parse_class_format(s: &str) -> CliResult<ClassFormat> {
    match s.to_lowercase().replace('_', "-").as_str() {
        "drop-in" | "dropin" => Ok(ClassFormat::DropIn),
        "series" => Ok(ClassFormat::Series),
        _ => Err(CliError::input(format!(
            "Invalid format '{}'. Expected: drop-in, series",
            s
        ))),
    }
}

pub fn parse_tz_or_input_error(name: &str) -> CliResult<Tz> {
    dancetime_core::tz::parse_tz(name)
        .map_err(|e| CliError::input(format!("Invalid timezone '{}': {}", name, e)))
}

/// The caller's zone: `--tz`, then the environment, then UTC.
pub fn resolve_timezone(flag: Option<&str>) -> CliResult<Tz> {
    if let Some(name) = flag {
        return parse_tz_or_input_error(name);
    }

    match std::env::var(TIMEZONE_ENV_VAR) {
        Ok(raw) if !raw.trim().is_empty() => {
            debug!(timezone = %raw, source = TIMEZONE_ENV_VAR, "resolved timezone");
            parse_tz_or_input_error(&raw)
        }
        _ => Ok(chrono_tz::UTC),
    }
}

pub fn parse_rfc3339_to_utc(s: &str) -> CliResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CliError::input(format!("Invalid --now '{}': {}", s, e)))
}

/// Capture the reference "now" once for the whole invocation.
pub fn capture_reference_now(now: Option<&str>, tz: Tz) -> CliResult<NormalizedInstant> {
    let utc = match now {
        Some(raw) => parse_rfc3339_to_utc(raw)?,
        None => Utc::now(),
    };
    let reference = NormalizedInstant::reference(utc, tz);
    debug!(reference_now = %reference, "captured reference now");
    Ok(reference)
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}
