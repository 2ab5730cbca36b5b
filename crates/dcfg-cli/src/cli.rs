//! CLI argument definitions for the settings backup tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dcfg",
    version,
    about = "Backup and restore device settings images",
    long_about = "Backup and restore the binary settings images of IoT devices.\n\n\
                  Decodes obfuscated device dumps into editable JSON documents or\n\
                  console commands, and re-encodes documents back into flashable\n\
                  images, migrating between firmware versions where needed."
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
    /// Decode a settings image into a document, commands, or a clean image.
    Backup(BackupArgs),

    /// Apply a settings document onto a baseline image and re-encode it.
    Restore(RestoreArgs),

    /// Decode a settings image and print it to stdout.
    Show(ShowArgs),

    /// List the supported firmware versions and their layout eras.
    Versions,
}

#[derive(Parser)]
pub struct BackupArgs {
    /// Path to the settings image to back up.
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Output file (text formats default to stdout; binary requires this).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format to generate.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: BackupFormatArg,

    /// Comma-separated list of field groups to include (default: all).
    #[arg(long = "groups", value_name = "LIST")]
    pub groups: Option<String>,

    /// Migrate the decoded settings to this firmware version first.
    #[arg(long = "target-version", value_name = "VERSION")]
    pub target_version: Option<String>,

    /// Spaces per JSON indent level; 0 renders compact single-line output.
    #[arg(long = "indent", value_name = "SPACES", default_value_t = 2)]
    pub indent: usize,

    /// Mask passwords and other secrets in the output.
    #[arg(long = "hide-pw")]
    pub hide_pw: bool,

    /// Join indexed command families into single Backlog lines.
    #[arg(long = "aggregate")]
    pub aggregate: bool,

    /// Suppress group header lines in command output.
    #[arg(long = "no-group-headers")]
    pub no_group_headers: bool,

    /// Continue on migration warnings instead of aborting.
    #[arg(long = "ignore-warnings")]
    pub ignore_warnings: bool,

    /// Validate and encode without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct RestoreArgs {
    /// Baseline settings image to restore onto.
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Settings document (full or partial JSON) to apply.
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Output image path (default: overwrite the baseline image).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Migrate the merged settings to this firmware version before encoding.
    #[arg(long = "target-version", value_name = "VERSION")]
    pub target_version: Option<String>,

    /// Continue on merge/migration warnings instead of aborting.
    ///
    /// By default any dropped field, narrowed value, or unknown document
    /// key aborts the restore before a single byte is written.
    #[arg(long = "ignore-warnings")]
    pub ignore_warnings: bool,

    /// Validate and encode without writing the output image.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Path to the settings image to display.
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Output format to print.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: ShowFormatArg,

    /// Comma-separated list of field groups to include (default: all).
    #[arg(long = "groups", value_name = "LIST")]
    pub groups: Option<String>,

    /// Migrate the decoded settings to this firmware version first.
    #[arg(long = "target-version", value_name = "VERSION")]
    pub target_version: Option<String>,

    /// Spaces per JSON indent level; 0 renders compact single-line output.
    #[arg(long = "indent", value_name = "SPACES", default_value_t = 2)]
    pub indent: usize,

    /// Mask passwords and other secrets in the output.
    #[arg(long = "hide-pw")]
    pub hide_pw: bool,

    /// Join indexed command families into single Backlog lines.
    #[arg(long = "aggregate")]
    pub aggregate: bool,

    /// Suppress group header lines in command output.
    #[arg(long = "no-group-headers")]
    pub no_group_headers: bool,

    /// Continue on migration warnings instead of aborting.
    #[arg(long = "ignore-warnings")]
    pub ignore_warnings: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BackupFormatArg {
    /// JSON settings document.
    Json,
    /// Vendor console commands.
    Commands,
    /// Re-encoded wire-format image with fresh checksums.
    Binary,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShowFormatArg {
    Json,
    Commands,
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
