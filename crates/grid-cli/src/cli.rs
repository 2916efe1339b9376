//! CLI argument definitions for the `grid` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "grid",
    version,
    about = "Render heterogeneous record sets as a table",
    long_about = "Infer a column set from JSON records, format the values and print the \
                  resulting table.\n\n\
                  Column order, widths and visibility can be restored from a saved layout."
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
    /// Print the visible columns and rows.
    Render(ViewArgs),

    /// Print the resolved column definitions.
    Columns(ViewArgs),

    /// Print the layout description of the current view.
    Layout(ViewArgs),
}

#[derive(Args)]
pub struct ViewArgs {
    /// JSON file holding a record collection, a record array, or any other value.
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// JSON metadata catalog with `types` and `fields`.
    #[arg(long, value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Saved layout description to apply.
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// TOML file with grid options; flags below override it.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Render labels and formatted text instead of raw values.
    #[arg(long)]
    pub friendly: bool,

    /// Convert universal timestamps to the local clock.
    #[arg(long = "local-times")]
    pub local_times: bool,

    /// Local clock offset from UTC in minutes (defaults to the host zone).
    #[arg(long = "utc-offset", value_name = "MINUTES", allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,

    /// Keep only rows containing this text (case-insensitive).
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Comma-separated columns the filter looks at.
    #[arg(long = "filter-columns", value_name = "NAMES")]
    pub filter_columns: Option<String>,

    /// Comma-separated preferred column order.
    #[arg(long = "column-order", value_name = "NAMES")]
    pub column_order: Option<String>,

    /// Show ordered columns even when no record populates them.
    #[arg(long = "show-all-ordered")]
    pub show_all_ordered: bool,

    /// Only show columns named in the column order.
    #[arg(long = "hide-unordered")]
    pub hide_unordered: bool,

    #[arg(long = "no-id-column")]
    pub no_id_column: bool,

    #[arg(long = "no-index-column")]
    pub no_index_column: bool,

    #[arg(long, value_enum, default_value = "table")]
    pub output: OutputArg,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
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

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
