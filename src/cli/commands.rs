use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `cronsync` - provisions and schedules a recurring background agent.
#[derive(Parser, Debug)]
#[command(name = "cronsync")]
#[command(version = "0.1.0")]
#[command(
    about = "Keeps exactly one cron schedule entry alive for a managed agent.",
    long_about = None
)]
pub struct Cli {
    /// Path to the configuration file (default: /etc/cronsync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one convergence pass (locate, bootstrap, service files, schedule)
    Apply {
        /// Compute and print the plan without touching the system
        #[arg(long)]
        dry_run: bool,
    },

    /// Report which backend holds the live entry and when it runs next
    Status,

    /// Retire the schedule entry from both backends
    Remove,
}
