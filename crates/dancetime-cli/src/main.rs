use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod classes_cmd;
mod classify_cmd;
mod cli;
mod error;
mod events_cmd;
mod schedule_cmd;
mod shared;
mod snapshot;
mod summary_cmd;

use classes_cmd::run_classes;
use classify_cmd::run_classify;
use cli::{Cli, Commands, CommonArgs, OutputFormat};
use error::{CliResult, render_error};
use events_cmd::run_events;
use schedule_cmd::run_schedule;
use summary_cmd::run_summary;

fn common_args(command: &Commands) -> &CommonArgs {
    match command {
        Commands::Summary(args) => &args.common,
        Commands::Classes(args) => &args.common,
        Commands::Events(args) => &args.common,
        Commands::Schedule(args) => &args.common,
        Commands::Classify(args) => &args.common,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(command: Commands, output_format: OutputFormat) -> CliResult<ExitCode> {
    match command {
        Commands::Summary(args) => run_summary(args, output_format),
        Commands::Classes(args) => run_classes(args, output_format),
        Commands::Events(args) => run_events(args, output_format),
        Commands::Schedule(args) => run_schedule(args, output_format),
        Commands::Classify(args) => run_classify(args, output_format),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let common = common_args(&cli.command);

    init_tracing(common.verbose);
    debug!("Parsed CLI args: {:?}", cli);

    let output_format = common.output_format;

    match dispatch(cli.command, output_format) {
        Ok(code) => code,
        Err(err) => render_error(&err, output_format),
    }
}
