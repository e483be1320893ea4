use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Color output control
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "snapcheck")]
#[command(author, version, about = "Snapshot regression checks against accepted targets")]
#[command(long_about = "Runs table counts, column projections and log extracts, \
    comparing each result with a previously accepted target.\n\
    A check without a target promotes its result to become the target.\n\n\
    Exit codes:\n  \
    0 - All checks passed, were promoted or skipped\n  \
    1 - At least one check failed\n  \
    2 - Configuration or runtime error")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    /// Path to configuration file (default: search for .snapcheck.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run configured checks
    Run(RunArgs),

    /// Generate a configuration template
    Init(InitArgs),

    /// Promote the latest results of named checks to target
    Accept(AcceptArgs),

    /// List configured checks
    List,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Run only these checks (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long, default_value = ".snapcheck.toml")]
    pub output: PathBuf,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct AcceptArgs {
    /// Checks whose result becomes the new target
    #[arg(required = true, value_name = "NAME")]
    pub names: Vec<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
