/// One schedule entry as persisted by either backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronEntry {
    pub name: String,
    pub minute: String,
    pub hour: String,
    pub weekday: String,
    pub path: Option<String>,
    pub mailto: Option<String>,
    pub user: String,
    pub command: String,
}

impl CronEntry {
    /// Scheduler variable lines (`PATH=`, `MAILTO=`), in the order the table
    /// expects them, for the fields that are set.
    pub fn variable_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(path) = &self.path {
            lines.push(format!("PATH={path}"));
        }
        if let Some(mailto) = &self.mailto {
            lines.push(format!("MAILTO={mailto}"));
        }
        lines
    }

    /// The six-field system-table line: time fields, user column, command.
    /// Day-of-month and month are always wildcards.
    pub fn table_line(&self) -> String {
        format!(
            "{} {} * * {} {} {}",
            self.minute, self.hour, self.weekday, self.user, self.command
        )
    }

    /// Parse a line produced by [`CronEntry::table_line`]. Fields are
    /// single-space separated because this crate wrote them.
    pub(super) fn from_table_line(name: &str, line: &str) -> Option<Self> {
        let mut fields = line.trim().splitn(7, ' ');
        let minute = fields.next()?.to_string();
        let hour = fields.next()?.to_string();
        let _day_of_month = fields.next()?;
        let _month = fields.next()?;
        let weekday = fields.next()?.to_string();
        let user = fields.next()?.to_string();
        let command = fields.next()?.to_string();
        if command.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            minute,
            hour,
            weekday,
            path: None,
            mailto: None,
            user,
            command,
        })
    }
}
