use anyhow::Result;
use strum::Display;

use super::entry::CronEntry;

/// The two places a live entry can reside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BackendKind {
    /// Marker-delimited block in the shared system table.
    Crontab,
    /// One self-describing file per entry in a drop-in directory.
    CronD,
}

/// What an upsert actually did, so repeated runs are observable no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Unchanged,
    Written,
}

/// A schedule backend: read current state, write the desired state, retire an
/// entry. Implementations compare before writing so converged state is never
/// rewritten, and `remove` of an absent entry is a successful no-op.
pub trait ScheduleStore {
    fn kind(&self) -> BackendKind;

    /// The entry with this name, if the backend currently holds one.
    fn read(&self, name: &str) -> Result<Option<CronEntry>>;

    /// Write the entry, replacing any previous version under the same name.
    fn upsert(&self, entry: &CronEntry) -> Result<UpsertOutcome>;

    /// Delete the named entry. Returns whether anything existed to delete.
    fn remove(&self, name: &str) -> Result<bool>;
}
