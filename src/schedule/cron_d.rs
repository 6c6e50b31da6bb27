use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::backend::{BackendKind, ScheduleStore, UpsertOutcome};
use super::entry::CronEntry;

const GENERATED_HEADER: &str = "# Generated by cronsync. Local changes will be overwritten.";

/// Drop-in backend: one self-describing file per entry, named after the
/// entry, inside the schedule directory.
pub struct CronDStore {
    dir: PathBuf,
}

impl CronDStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn entry_file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn render(entry: &CronEntry) -> String {
        let mut content = String::new();
        content.push_str(GENERATED_HEADER);
        content.push('\n');
        for line in entry.variable_lines() {
            content.push_str(&line);
            content.push('\n');
        }
        content.push_str(&entry.table_line());
        content.push('\n');
        content
    }
}

impl ScheduleStore for CronDStore {
    fn kind(&self) -> BackendKind {
        BackendKind::CronD
    }

    fn read(&self, name: &str) -> Result<Option<CronEntry>> {
        let file = self.entry_file(name);
        let content = match fs::read_to_string(&file) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", file.display()));
            }
        };

        let mut path = None;
        let mut mailto = None;
        let mut entry = None;
        for line in content.lines() {
            if line.starts_with('#') {
                continue;
            }
            if let Some(value) = line.strip_prefix("PATH=") {
                path = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("MAILTO=") {
                mailto = Some(value.to_string());
            } else if entry.is_none() {
                entry = CronEntry::from_table_line(name, line);
            }
        }

        Ok(entry.map(|entry| CronEntry {
            path,
            mailto,
            ..entry
        }))
    }

    fn upsert(&self, entry: &CronEntry) -> Result<UpsertOutcome> {
        let file = self.entry_file(&entry.name);
        let desired = Self::render(entry);

        if let Ok(current) = fs::read_to_string(&file) {
            if current == desired {
                return Ok(UpsertOutcome::Unchanged);
            }
        }

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        fs::write(&file, desired)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        Ok(UpsertOutcome::Written)
    }

    fn remove(&self, name: &str) -> Result<bool> {
        let file = self.entry_file(name);
        match fs::remove_file(&file) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove {}", file.display()))
            }
        }
    }
}
