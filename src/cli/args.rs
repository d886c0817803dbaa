// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use crate::report::OutputFormat;

/// msglint - Commit message policy checker
///
/// Validates commit messages against conventional commit, JIRA, sign-off,
/// subject, body, signature, spelling and branch policies.
#[derive(Parser, Debug)]
#[command(name = "msglint")]
#[command(author = "Eshan Roy")]
#[command(version)]
#[command(about = "Commit message policy checker", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output format for machine-readable output
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate commit messages
    Check(CheckArgs),

    /// List rules and whether the current configuration enables them
    Rules,

    /// Write an example configuration file
    Init(InitArgs),

    /// Print version information
    Version,
}

/// Arguments for the check command.
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Commit or range to check
    #[arg(default_value = "HEAD")]
    pub target: String,

    /// Check TARGET..HEAD when TARGET is a single revision
    #[arg(long)]
    pub range: bool,

    /// Check a message file (e.g. .git/COMMIT_EDITMSG) instead of commits
    #[arg(short, long, value_name = "PATH", conflicts_with = "range")]
    pub message_file: Option<PathBuf>,

    /// Run only these rules (name or id, repeatable)
    #[arg(short, long, value_name = "RULE")]
    pub enable: Vec<String>,

    /// Skip these rules (name or id, repeatable)
    #[arg(long, value_name = "RULE")]
    pub disable: Vec<String>,

    /// Show every rule result, not only failures
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of worker threads
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,
}

/// Arguments for the init command.
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

impl CheckArgs {
    /// Whether the target names several commits.
    pub fn is_range(&self) -> bool {
        self.range || self.target.contains("..")
    }

    /// Revision range to read.
    pub fn range_spec(&self) -> String {
        if self.target.contains("..") {
            self.target.clone()
        } else {
            format!("{}..HEAD", self.target)
        }
    }
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            target: "HEAD".to_string(),
            range: false,
            message_file: None,
            enable: Vec::new(),
            disable: Vec::new(),
            verbose: false,
            jobs: 1,
        }
    }
}
