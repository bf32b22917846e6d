//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "mpp",
    version,
    about = "Inspect binary project files",
    long_about = "Read binary project files (MPP8, MPP9, MPP12 and MPP14) and report\n\
                  their schedule contents, container streams and read diagnostics."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

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
    /// Read project files and summarize their contents.
    Inspect(InspectArgs),

    /// List the streams of a compound container.
    Streams(StreamsArgs),

    /// List supported file generations and their format strings.
    Formats,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Project files to read. Several files are decoded concurrently.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// List tasks in outline order.
    #[arg(long = "tasks")]
    pub tasks: bool,

    /// List views and the tables they display.
    #[arg(long = "views")]
    pub views: bool,

    /// List every diagnostic recorded during the read.
    #[arg(long = "diagnostics")]
    pub diagnostics: bool,

    /// Print the decoded projects as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,

    /// Skip presentation data (tables and views).
    #[arg(long = "no-views", conflicts_with = "views")]
    pub no_views: bool,

    /// Exit with status 2 when any read recorded diagnostics.
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Parser)]
pub struct StreamsArgs {
    /// Compound container to list.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
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

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
