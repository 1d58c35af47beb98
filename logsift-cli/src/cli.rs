//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

/// Config file looked up when `--config` is not given.
///
/// A missing file at this path is not an error; defaults apply.
pub const DEFAULT_CONFIG_PATH: &str = "logsift.toml";

/// logsift -- batch analyzer for router/switch syslog exports.
///
/// Parses `seq: Mon D HH:MM:SS TZ: %FAC-SEV-MNEM: message` lines, classifies
/// them into event families, filters, summarizes and optionally exports the rows.
#[derive(Parser, Debug)]
#[command(name = "logsift", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logsift.toml configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Console output format.
    #[arg(long, default_value = "text")]
    pub output_format: OutputFormat,

    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Supported console output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Input, filter and export options.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the input log file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Year applied to parsed timestamps (the log lines carry none).
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Write the filtered rows to this path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format used with --output (csv, json).
    #[arg(long)]
    pub format: Option<String>,

    /// Print summary tables.
    #[arg(long)]
    pub summary: bool,

    /// Keep only these facilities (e.g. SEC SYS).
    #[arg(long, num_args = 1..)]
    pub filter_facility: Option<Vec<String>>,

    /// Keep only these mnemonics (e.g. IPACCESSLOGP UPDOWN).
    #[arg(long, num_args = 1..)]
    pub filter_mnemonic: Option<Vec<String>>,

    /// Keep only these event types (e.g. login_failed).
    #[arg(long, num_args = 1..)]
    pub filter_event_type: Option<Vec<String>>,

    /// Keep only these numeric severities (0-7).
    #[arg(long, num_args = 1..)]
    pub filter_severity: Option<Vec<u32>>,

    /// Keep only rows whose f_interface is one of these.
    #[arg(long, num_args = 1..)]
    pub filter_interface: Option<Vec<String>>,

    /// Keep only rows whose f_user is one of these.
    #[arg(long, num_args = 1..)]
    pub filter_user: Option<Vec<String>>,

    /// Regex searched in the column named by --regex-field.
    #[arg(long, requires = "regex_field")]
    pub regex: Option<String>,

    /// Column the regex runs against (e.g. message, f_command).
    #[arg(long, requires = "regex")]
    pub regex_field: Option<String>,

    /// YAML filter preset; command-line filters override its entries.
    #[arg(long)]
    pub filter_file: Option<PathBuf>,

    /// Log every line dropped by the prefix grammar.
    #[arg(long)]
    pub report_dropped: bool,

    /// Number of filtered rows shown in the console sample.
    #[arg(long)]
    pub sample_rows: Option<usize>,
}
