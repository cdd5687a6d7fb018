//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `vouch`.
#[derive(Debug, Parser)]
#[command(name = "vouch", version, about = "Verify that built artifacts actually run")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full lifecycle against an artifact and write a report.
    Run(RunArgs),
    /// Check a runtime spec without running anything.
    Validate {
        /// Path to the runtime spec (YAML).
        #[arg(long)]
        spec: PathBuf,
    },
}

/// Arguments for `vouch run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the runtime spec (YAML).
    #[arg(long)]
    pub spec: PathBuf,

    /// Directory holding the artifact; every command runs here.
    #[arg(long)]
    pub output: PathBuf,

    /// Challenge root; golden files resolve against it.
    #[arg(long)]
    pub challenge_dir: PathBuf,

    /// Where to write the JSON report. Relative paths resolve against the
    /// current working directory, not the artifact.
    #[arg(long, default_value = "runtime-results.json")]
    pub report: PathBuf,
}
