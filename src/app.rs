use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use tracing::info;

use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use crate::locate::locate_agent;
use crate::schedule::{self, CronDStore, CrontabStore, ScheduleStore};
use crate::service;

pub fn dispatch(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Apply { dry_run } => apply(config, *dry_run),
        Commands::Status => status(config),
        Commands::Remove => remove(config),
    }
}

/// One convergence pass: locate the binary (fatal before any mutation),
/// bootstrap directories, install service-control files and stop the running
/// service, then hand the schedule synchronizer the computed plan.
fn apply(config: &Config, dry_run: bool) -> Result<()> {
    let client_bin = locate_agent(&config.agent)?;
    info!(bin = %client_bin.display(), "located agent binary");

    let plan = schedule::plan(config, &client_bin);
    if dry_run {
        println!("Plan (dry run):");
        println!("  Binary : {}", client_bin.display());
        println!("  Backend: {} (retiring {})", plan.active, plan.retired);
        println!("  Entry  : {}", plan.entry.table_line());
        return Ok(());
    }

    bootstrap_directories(config)?;
    service::install(config, &client_bin)?;

    let crontab = CrontabStore::new(config.backends.crontab.clone());
    let cron_d = CronDStore::new(config.backends.cron_d.clone());
    let outcome = schedule::apply(&plan, &crontab, &cron_d)?;

    if outcome.wrote {
        println!("Installed {} entry in the {} backend", plan.entry.name, plan.active);
    } else {
        println!("Already converged ({} backend)", plan.active);
    }
    Ok(())
}

fn status(config: &Config) -> Result<()> {
    let crontab = CrontabStore::new(config.backends.crontab.clone());
    let cron_d = CronDStore::new(config.backends.cron_d.clone());

    let mut found = false;
    for store in [&crontab as &dyn ScheduleStore, &cron_d] {
        let Some(entry) = store.read(schedule::ENTRY_NAME)? else {
            continue;
        };
        found = true;
        println!("Backend: {}", store.kind());
        for line in entry.variable_lines() {
            println!("         {line}");
        }
        println!("Entry  : {}", entry.table_line());
        match schedule::next_occurrence(&entry, Utc::now()) {
            Ok(next) => println!("Next   : {}", next.to_rfc3339()),
            Err(err) => println!("Next   : unknown ({err})"),
        }
    }

    if !found {
        println!("No schedule entry installed in either backend.");
    }
    Ok(())
}

fn remove(config: &Config) -> Result<()> {
    let crontab = CrontabStore::new(config.backends.crontab.clone());
    let cron_d = CronDStore::new(config.backends.cron_d.clone());

    let removed = schedule::remove_everywhere(schedule::ENTRY_NAME, &crontab, &cron_d)?;
    if removed == 0 {
        println!("Nothing to remove.");
    } else {
        println!("Removed {removed} schedule entr{}", if removed == 1 { "y" } else { "ies" });
    }
    Ok(())
}

/// Create the agent's working directories and the log file's parent before
/// anything renders into them.
fn bootstrap_directories(config: &Config) -> Result<()> {
    let mut dirs = config.agent.directories.clone();
    if let Some(parent) = config.schedule.log_file.parent() {
        dirs.push(parent.to_path_buf());
    }
    for dir in dirs {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
}
