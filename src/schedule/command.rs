use std::fmt::Write as _;
use std::path::Path;

/// Assemble the shell command line the scheduler executes.
///
/// Segments are concatenated in fixed order and only when present: the sleep
/// prefix, the environment prefix, the nice wrapper, then the agent invocation
/// with its output redirect. Nothing is shell-escaped — callers supply
/// already-safe tokens, and the exact byte layout (including the missing
/// separator between the last option token and the redirect operator) is
/// pinned by tests for compatibility with entries already deployed.
pub fn assemble_command(
    sleep_offset: Option<u64>,
    env_vars: Option<&str>,
    process_priority: Option<i32>,
    client_bin: &str,
    daemon_options: &[String],
    append_log: bool,
    log_file: &Path,
) -> String {
    let mut cmd = String::new();
    if let Some(offset) = sleep_offset {
        let _ = write!(cmd, "sleep {offset}; ");
    }
    if let Some(env) = env_vars.filter(|vars| !vars.is_empty()) {
        let _ = write!(cmd, "{env} ");
    }
    if let Some(priority) = process_priority {
        let _ = write!(cmd, "nice -n {priority} ");
    }
    let redirect = if append_log { ">>" } else { ">" };
    let _ = write!(
        cmd,
        "{client_bin} {options}{redirect} {log} 2>&1",
        options = daemon_options.join(" "),
        log = log_file.display()
    );
    cmd
}
