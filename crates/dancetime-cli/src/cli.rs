use clap::{Parser, Subcommand, ValueEnum};

/// Dashboard summaries and class listings over fetched store rows
#[derive(Parser, Debug)]
#[command(name = "dancetime", version)]
#[command(about = "Dashboard summaries and class listings over fetched store rows")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize classes, event RSVPs and reviews for the dashboard tiles
    Summary(SummaryArgs),
    /// List classes through the browsing filters
    Classes(ClassesArgs),
    /// List event RSVPs split into upcoming and past
    Events(EventsArgs),
    /// List classes and events together in one timeline
    Schedule(ScheduleArgs),
    /// Normalize and classify a single date value
    Classify(ClassifyArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(clap::Args, Debug)]
pub struct CommonArgs {
    /// Reference "now" (RFC3339); defaults to the system clock
    #[arg(long)]
    pub now: Option<String>,

    /// Caller's IANA timezone; falls back to DANCETIME_TIMEZONE, then UTC
    #[arg(short, long)]
    pub tz: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output_format: OutputFormat,

    /// Enable verbose (debug) logging
    #[arg(long)]
    pub verbose: bool,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// JSON snapshot of fetched rows (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug)]
pub struct ClassesArgs {
    /// JSON snapshot of fetched rows (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Only classes from today through today + N days
    #[arg(long)]
    pub window_days: Option<u32>,

    /// Free-text search over title, instructor and studio
    #[arg(long)]
    pub search: Option<String>,

    /// Dance-style keyword matched against the class title
    #[arg(long)]
    pub style: Option<String>,

    /// City taken from the class address
    #[arg(long)]
    pub city: Option<String>,

    /// Minimum price (inclusive)
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price (inclusive)
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Class format: drop-in, series
    #[arg(long)]
    pub format: Option<String>,

    /// Only classes that need no instructor approval
    #[arg(long)]
    pub open_enrollment: bool,

    /// Keep past classes when no window is set
    #[arg(long)]
    pub include_past: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug)]
pub struct EventsArgs {
    /// JSON snapshot of fetched rows (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug)]
pub struct ScheduleArgs {
    /// JSON snapshot of fetched rows (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Date or datetime as stored (e.g., 2025-03-10 or 2025-04-01T18:00:00Z)
    #[arg(long)]
    pub date: String,

    /// Separate HH:MM[:SS] time column
    #[arg(long)]
    pub time: Option<String>,

    /// IANA zone stored with the value
    #[arg(long)]
    pub timezone: Option<String>,

    /// Comparison granularity: day, instant
    #[arg(short = 'g', long, default_value = "day")]
    pub granularity: String,

    #[command(flatten)]
    pub common: CommonArgs,
}
