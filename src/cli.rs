//! CLI argument parsing module for yarn-comb

use crate::patch::PatchStrategy;
use clap::Parser;
use std::path::PathBuf;

/// Find and merge duplicated packages in a yarn lockfile
#[derive(Parser, Debug, Clone)]
#[command(
    name = "yarn-comb",
    version,
    about = "Find and merge duplicated packages in yarn.lock"
)]
pub struct CliArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Lockfile to analyse, relative to the project directory
    #[arg(long)]
    pub lockfile: Option<PathBuf>,

    // General options
    /// Report only, never modify the lockfile
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - errors only on stderr
    #[arg(short, long)]
    pub quiet: bool,

    // Analysis options
    /// Use the strictness-only pass instead of range intersection
    #[arg(long)]
    pub fallback: bool,

    // Output options
    /// Output the report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    // Autofix options
    /// Apply fixes without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// How lines are deleted from the lockfile
    #[arg(long, value_enum)]
    pub strategy: Option<PatchStrategy>,

    /// Command that regenerates the lockfile (default: yarn install).
    /// Consumes the remaining arguments.
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    pub install_command: Option<Vec<String>>,
}
