use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::backend::{BackendKind, ScheduleStore, UpsertOutcome};
use super::entry::CronEntry;

/// Plain-table backend: the entry lives as a marker-delimited block inside one
/// shared crontab file. Unrelated lines in the file are preserved
/// byte-for-byte across upserts and removes.
pub struct CrontabStore {
    file: PathBuf,
}

impl CrontabStore {
    pub fn new(file: PathBuf) -> Self {
        Self { file }
    }

    fn begin_marker(name: &str) -> String {
        format!("# cronsync: {name} (begin)")
    }

    fn end_marker(name: &str) -> String {
        format!("# cronsync: {name} (end)")
    }

    fn render_block(entry: &CronEntry) -> String {
        let mut block = String::new();
        block.push_str(&Self::begin_marker(&entry.name));
        block.push('\n');
        for line in entry.variable_lines() {
            block.push_str(&line);
            block.push('\n');
        }
        block.push_str(&entry.table_line());
        block.push('\n');
        block.push_str(&Self::end_marker(&entry.name));
        block.push('\n');
        block
    }

    /// The file content with the named block removed, or `None` when no block
    /// is present.
    fn strip_block(content: &str, name: &str) -> Option<String> {
        let begin = Self::begin_marker(name);
        let end = Self::end_marker(name);

        let mut stripped = String::with_capacity(content.len());
        let mut inside = false;
        let mut found = false;
        for line in content.lines() {
            if !inside && line == begin {
                inside = true;
                found = true;
                continue;
            }
            if inside {
                if line == end {
                    inside = false;
                }
                continue;
            }
            stripped.push_str(line);
            stripped.push('\n');
        }

        found.then_some(stripped)
    }

    /// The lines between the named block's markers, when present.
    fn block_lines<'a>(content: &'a str, name: &str) -> Option<Vec<&'a str>> {
        let begin = Self::begin_marker(name);
        let end = Self::end_marker(name);

        let mut inside = false;
        let mut lines = Vec::new();
        for line in content.lines() {
            if !inside && line == begin {
                inside = true;
                continue;
            }
            if inside {
                if line == end {
                    return Some(lines);
                }
                lines.push(line);
            }
        }
        None
    }

    fn read_file(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.file) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", self.file.display()))
            }
        }
    }

    fn write_file(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.file, content)
            .with_context(|| format!("Failed to write {}", self.file.display()))
    }
}

impl ScheduleStore for CrontabStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Crontab
    }

    fn read(&self, name: &str) -> Result<Option<CronEntry>> {
        let Some(content) = self.read_file()? else {
            return Ok(None);
        };
        let Some(lines) = Self::block_lines(&content, name) else {
            return Ok(None);
        };

        let mut path = None;
        let mut mailto = None;
        let mut entry = None;
        for line in lines {
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
        let current = self.read_file()?.unwrap_or_default();
        let mut base = Self::strip_block(&current, &entry.name).unwrap_or_else(|| current.clone());
        if !base.is_empty() && !base.ends_with('\n') {
            base.push('\n');
        }

        let desired = format!("{base}{}", Self::render_block(entry));
        if desired == current {
            return Ok(UpsertOutcome::Unchanged);
        }
        self.write_file(&desired)?;
        Ok(UpsertOutcome::Written)
    }

    fn remove(&self, name: &str) -> Result<bool> {
        let Some(current) = self.read_file()? else {
            return Ok(false);
        };
        let Some(stripped) = Self::strip_block(&current, name) else {
            return Ok(false);
        };
        self.write_file(&stripped)?;
        Ok(true)
    }
}
