use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "OSPREY bridge CLI - boots the embedded OSPREY protein design engine and exposes its structure and strand constructors.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub launch: LaunchArgs,
}

/// Engine launch parameters shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct LaunchArgs {
    /// Path to a launch configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the embedded runtime heap size, in megabytes.
    #[arg(long, global = true, value_name = "MB")]
    pub heap_size_mb: Option<u64>,

    /// Start the embedded runtime with assertions enabled.
    #[arg(long, global = true)]
    pub enable_assertions: bool,

    /// Append an additional classpath entry (repeatable, order preserved).
    #[arg(long = "classpath", global = true, value_name = "PATH")]
    pub classpath: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the embedded engine and print its version banner.
    Check,
    /// Load a molecular structure file and build a design strand from it.
    Strand(StrandArgs),
}

/// Arguments for the `strand` subcommand.
#[derive(Args, Debug)]
pub struct StrandArgs {
    /// Path to the input molecular structure file (e.g., protein.pdb).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Set a builder option passed through to the engine's strand builder.
    /// Can be used multiple times. Example: -S setErrorOnNonTemplateResidues=false
    #[arg(short = 'S', long = "set", value_name = "NAME=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
