//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Property-check bridge between a checking engine and a test host
#[derive(Parser, Debug)]
#[command(name = "prop-bridge")]
#[command(version)]
#[command(about = "Aggregate and inspect property-check runs")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge worker summary messages as a coordinator and print the totals
    Merge(MergeArgs),

    /// Show the effective checker configuration
    Config(ConfigArgs),

    /// Validate a single runner message
    Decode(DecodeArgs),
}

/// Arguments for merge command
#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Files holding one message per line (stdin when omitted)
    pub files: Vec<PathBuf>,

    /// Output format (summary, table, json); defaults to the configured one
    #[arg(short, long)]
    pub format: Option<String>,

    /// Abort on the first malformed message instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print as JSON instead of YAML
    #[arg(long)]
    pub json: bool,

    /// List the PROP_BRIDGE_* environment variables
    #[arg(long)]
    pub env_help: bool,

    /// Checker arguments, e.g. -- -minSuccessfulTests 50 -verbosity 1
    #[arg(last = true, allow_hyphen_values = true)]
    pub checker_args: Vec<String>,
}

/// Arguments for decode command
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Message line, e.g. d7,5,1,1
    pub line: String,
}
