//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mailsift - sift job mail into a tabular ledger.
#[derive(Debug, Parser)]
#[command(name = "mailsift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Provision the ledger tabs, mailbox directory, and configuration
    Init,

    /// Execute one bounded ingestion run (cron-friendly)
    Run,

    /// Run repeatedly on an interval until interrupted
    Watch(WatchArgs),

    /// Show ledger counts and pending conversations
    Status,
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Minutes between runs (overrides the configuration)
    #[arg(short, long)]
    pub interval: Option<u64>,
}
