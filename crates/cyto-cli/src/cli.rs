//! CLI argument definitions for `cyto`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use cyto_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "cyto",
    version,
    about = "Immune cell count pipeline",
    long_about = "Load immune cell counts into a local database, summarize population\n\
                  frequencies, compare responders with non-responders and describe\n\
                  the baseline cohort."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the database file.
    #[arg(long = "db", value_name = "PATH", default_value = "cell-count.db", global = true)]
    pub db: PathBuf,

    /// Seconds to wait for a locked database before failing.
    #[arg(
        long = "busy-timeout-secs",
        value_name = "SECONDS",
        default_value_t = 10,
        global = true
    )]
    pub busy_timeout_secs: u64,

    /// Report format for import, summary, analyze and baseline.
    #[arg(long = "format", value_enum, default_value = "table", global = true)]
    pub format: ReportFormatArg,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the database schema if it does not exist.
    Init,

    /// Load a cell count CSV file into the database.
    Import(ImportArgs),

    /// Print the per-sample population frequency table.
    Summary(SummaryArgs),

    /// Compare responders and non-responders in the PBMC miraclib cohort.
    Analyze,

    /// Describe the baseline PBMC miraclib cohort.
    Baseline,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Source CSV file.
    #[arg(value_name = "CSV", default_value = "cell-count.csv")]
    pub csv: PathBuf,

    /// Records per committed transaction.
    #[arg(long = "batch-size", value_name = "N", default_value_t = cyto_model::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

#[derive(Parser)]
pub struct SummaryArgs {
    /// Show at most this many rows.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Also write the full table to a CSV file.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
