use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `cronsync`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Binary lookup ───────────────────────────────────────────────────
    #[error("locate: {0}")]
    Locate(#[from] LocateError),

    // ── Schedule backends ───────────────────────────────────────────────
    #[error("schedule: {0}")]
    Schedule(#[from] ScheduleError),

    // ── Service control ─────────────────────────────────────────────────
    #[error("service: {0}")]
    Service(#[from] ServiceError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Binary lookup errors ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("agent binary '{name}' not found on PATH or in {searched} well-known locations")]
    NotFound { name: String, searched: usize },

    #[error("configured agent binary {path} does not exist")]
    MissingOverride { path: String },
}

// ─── Schedule backend errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid schedule field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("backend {backend} write failed: {message}")]
    Write { backend: String, message: String },
}

// ─── Service control errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("template render failed: {0}")]
    Render(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = SyncError::Config(ConfigError::Validation("bad minute".into()));
        assert!(err.to_string().contains("validation failed"));
        assert!(err.to_string().contains("bad minute"));
    }

    #[test]
    fn locate_not_found_names_the_binary() {
        let err = SyncError::Locate(LocateError::NotFound {
            name: "chef-client".into(),
            searched: 4,
        });
        assert!(err.to_string().contains("chef-client"));
    }

    #[test]
    fn schedule_invalid_field_displays_field_name() {
        let err = SyncError::Schedule(ScheduleError::InvalidField {
            field: "minute".into(),
            message: "unparseable".into(),
        });
        assert!(err.to_string().contains("minute"));
        assert!(err.to_string().contains("unparseable"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let sync_err: SyncError = anyhow_err.into();
        assert!(sync_err.to_string().contains("something went wrong"));
    }
}
