//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "labclip",
    version,
    about = "Normalize extracted lab results and render clipboard text",
    long_about = "Normalize extracted lab-result records and render them as copyable text.\n\n\
                  Resolves bracket-encoded reference ranges, collapses duplicate feeds,\n\
                  merges same-day repeat readings, and renders date/facility groups\n\
                  through a configurable token template."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Normalize raw records into date/facility groups.
    Process(ProcessArgs),

    /// Render records as clipboard text through a copy template.
    Render(RenderArgs),

    /// List the field tokens available to copy templates.
    Tokens,
}

#[derive(Parser)]
pub struct ProcessArgs {
    /// Raw records file (JSON array, or CSV with camelCase headers).
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// Pipeline configuration JSON (range overrides, cross-duplicate rules).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the group JSON to a file instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Pretty-print the group JSON.
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Skip the summary table.
    #[arg(long = "no-summary")]
    pub no_summary: bool,
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Raw records file (JSON array, or CSV with camelCase headers).
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// Copy template JSON (defaults to the built-in template).
    #[arg(long = "template", value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Pipeline configuration JSON (range overrides, cross-duplicate rules).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the template's layout mode.
    #[arg(long = "mode", value_enum)]
    pub mode: Option<LayoutModeArg>,

    /// Write the rendered text to a file instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LayoutModeArg {
    Vertical,
    Horizontal,
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
