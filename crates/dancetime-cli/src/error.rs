use std::fmt;
use std::process::ExitCode;

use dancetime_core::{DanceTimeError, ParseError};
use serde::Serialize;

use crate::cli::OutputFormat;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_INPUT_ERROR: u8 = 2;
pub const EXIT_RUNTIME_ERROR: u8 = 3;

/// Failure category; decides the exit code and the JSON status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad flag, unknown zone, unreadable snapshot, contradictory filter.
    Input,
    /// A date value the normalizer rejected.
    Unparseable,
    /// Failure after all inputs were accepted.
    Runtime,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Input | ErrorKind::Unparseable => EXIT_INPUT_ERROR,
            ErrorKind::Runtime => EXIT_RUNTIME_ERROR,
        }
    }

    /// Machine-readable status for the JSON envelope.
    pub fn status(self) -> Option<&'static str> {
        match self {
            ErrorKind::Unparseable => Some("unparseable"),
            ErrorKind::Input | ErrorKind::Runtime => None,
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    kind: ErrorKind,
    message: String,
    rejected: Option<String>,
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Input, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Runtime, message)
    }

    fn with_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            rejected: None,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<ParseError> for CliError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: ErrorKind::Unparseable,
            message: err.to_string(),
            rejected: Some(err.input),
        }
    }
}

impl From<DanceTimeError> for CliError {
    fn from(err: DanceTimeError) -> Self {
        match err {
            DanceTimeError::ParseError(e) => e.into(),
            other => CliError::input(other.to_string()),
        }
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a str,
    exit_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a str>,
}

impl<'a> From<&'a CliError> for ErrorEnvelope<'a> {
    fn from(err: &'a CliError) -> Self {
        Self {
            error: &err.message,
            exit_code: err.exit_code(),
            status: err.kind.status(),
            input: err.rejected.as_deref(),
        }
    }
}

/// Writes the error to stderr in the requested format and returns the
/// process exit code for it.
pub fn render_error(err: &CliError, output_format: OutputFormat) -> ExitCode {
    match output_format {
        OutputFormat::Json => match serde_json::to_string_pretty(&ErrorEnvelope::from(err)) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("Error: {err}"),
        },
        OutputFormat::Text => eprintln!("Error: {err}"),
    }

    ExitCode::from(err.exit_code())
}
