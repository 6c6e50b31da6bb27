use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::backend::{BackendKind, ScheduleStore, UpsertOutcome};
use super::command::assemble_command;
use super::entry::CronEntry;
use super::splay::derive_sleep_offset;
use super::{ENTRY_NAME, ENTRY_USER};
use crate::config::Config;

/// The desired end state of one convergence pass: the entry to install, the
/// backend that owns it, and the backend that must not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub entry: CronEntry,
    pub active: BackendKind,
    pub retired: BackendKind,
}

/// What a pass changed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// The active backend's entry was created or rewritten.
    pub wrote: bool,
    /// A stale entry was deleted from the retired backend.
    pub removed_stale: bool,
}

/// Compute the pass's end state without touching anything.
pub fn plan(config: &Config, client_bin: &Path) -> SyncPlan {
    let schedule = &config.schedule;
    let sleep_offset = derive_sleep_offset(
        schedule.splay,
        &schedule.effective_identity(),
        schedule.shard_seed,
    );
    let command = assemble_command(
        sleep_offset,
        schedule.env_vars.as_deref(),
        schedule.process_priority,
        &client_bin.display().to_string(),
        &schedule.daemon_options,
        schedule.append_log,
        &schedule.log_file,
    );

    let entry = CronEntry {
        name: ENTRY_NAME.into(),
        minute: schedule.minute.clone(),
        hour: schedule.hour.clone(),
        weekday: schedule.weekday.clone(),
        path: schedule.path.clone(),
        mailto: schedule.mailto.clone(),
        user: ENTRY_USER.into(),
        command,
    };

    let (active, retired) = if schedule.use_cron_d {
        (BackendKind::CronD, BackendKind::Crontab)
    } else {
        (BackendKind::Crontab, BackendKind::CronD)
    };

    SyncPlan {
        entry,
        active,
        retired,
    }
}

/// Apply a plan: retire the unused backend's entry, then upsert the active
/// one. Either store may already be converged; both steps are idempotent, and
/// a write failure aborts the pass for the caller to surface.
pub fn apply(
    plan: &SyncPlan,
    crontab: &dyn ScheduleStore,
    cron_d: &dyn ScheduleStore,
) -> Result<SyncOutcome> {
    let (active, retired) = match plan.active {
        BackendKind::Crontab => (crontab, cron_d),
        BackendKind::CronD => (cron_d, crontab),
    };
    debug_assert_eq!(active.kind(), plan.active);
    debug_assert_eq!(retired.kind(), plan.retired);

    let removed_stale = retired.remove(&plan.entry.name)?;
    if removed_stale {
        info!(backend = %retired.kind(), entry = %plan.entry.name, "removed stale entry");
    }

    let outcome = active.upsert(&plan.entry)?;
    if outcome == UpsertOutcome::Written {
        info!(backend = %active.kind(), entry = %plan.entry.name, "wrote schedule entry");
    }

    Ok(SyncOutcome {
        wrote: outcome == UpsertOutcome::Written,
        removed_stale,
    })
}

/// Retire the named entry from every backend. Returns how many entries
/// actually existed.
pub fn remove_everywhere(
    name: &str,
    crontab: &dyn ScheduleStore,
    cron_d: &dyn ScheduleStore,
) -> Result<usize> {
    let mut removed = 0;
    for store in [crontab, cron_d] {
        if store.remove(name)? {
            info!(backend = %store.kind(), entry = name, "removed entry");
            removed += 1;
        }
    }
    Ok(removed)
}
