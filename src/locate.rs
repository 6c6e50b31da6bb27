use std::path::{Path, PathBuf};

use crate::config::AgentConfig;
use crate::error::LocateError;

/// Install locations probed after `PATH`, in order.
const WELL_KNOWN_DIRS: [&str; 4] = [
    "/usr/bin",
    "/usr/local/bin",
    "/opt/chef/bin",
    "/opt/chef/embedded/bin",
];

/// Resolve the absolute path of the agent binary.
///
/// Probes in order: the explicit `agent.bin` override (which must exist when
/// set — a dangling override is an operator mistake, not a reason to fall
/// through), a `PATH` lookup, then the well-known install directories. Not
/// found anywhere is fatal: the caller aborts before any scheduling mutation.
pub fn locate_agent(agent: &AgentConfig) -> Result<PathBuf, LocateError> {
    if let Some(bin) = &agent.bin {
        let path = Path::new(bin);
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(LocateError::MissingOverride { path: bin.clone() });
    }

    if let Ok(found) = which::which(&agent.name) {
        return Ok(found);
    }

    for dir in WELL_KNOWN_DIRS {
        let candidate = Path::new(dir).join(&agent.name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(LocateError::NotFound {
        name: agent.name.clone(),
        searched: WELL_KNOWN_DIRS.len(),
    })
}
