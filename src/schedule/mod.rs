mod backend;
mod command;
mod cron_d;
mod crontab;
mod entry;
mod splay;
mod sync;


pub use backend::{BackendKind, ScheduleStore, UpsertOutcome};
pub use command::assemble_command;
pub use cron_d::CronDStore;
pub use crontab::CrontabStore;
pub use entry::CronEntry;
pub use splay::derive_sleep_offset;
pub use sync::{SyncOutcome, SyncPlan, apply, plan, remove_everywhere};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;

/// Name the live entry carries in both backends.
pub const ENTRY_NAME: &str = "chef-client";

/// Account the scheduler runs the entry as.
pub const ENTRY_USER: &str = "root";

/// The entry's next firing time after `from`. Day-of-month and month are
/// wildcards, matching the persisted table line; the seconds field is
/// prepended because the parser wants six fields.
pub fn next_occurrence(entry: &CronEntry, from: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let expression = format!("0 {} {} * * {}", entry.minute, entry.hour, entry.weekday);
    let schedule = Schedule::from_str(&expression)
        .with_context(|| format!("Invalid schedule expression: {expression}"))?;
    schedule
        .after(&from)
        .next()
        .ok_or_else(|| anyhow::anyhow!("No future occurrence for expression: {expression}"))
}
