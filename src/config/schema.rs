use crate::error::{ConfigError, ScheduleError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/cronsync/config.toml";

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path this config was loaded from - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub backends: BackendsConfig,
}

// ── Agent ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Explicit path to the agent binary; skips lookup when set
    #[serde(default)]
    pub bin: Option<String>,

    /// Binary name used for PATH lookup and service control
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Directories created before any other provisioning step
    #[serde(default = "default_directories")]
    pub directories: Vec<PathBuf>,
}

fn default_agent_name() -> String {
    "chef-client".into()
}

fn default_directories() -> Vec<PathBuf> {
    [
        "/etc/chef",
        "/var/log/chef",
        "/var/run/chef",
        "/var/cache/chef",
        "/var/lib/chef",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            bin: None,
            name: default_agent_name(),
            directories: default_directories(),
        }
    }
}

// ── Schedule ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_minute")]
    pub minute: String,

    #[serde(default = "default_wildcard")]
    pub hour: String,

    #[serde(default = "default_wildcard")]
    pub weekday: String,

    /// PATH value written into the entry for the scheduler to use at
    /// invocation time
    #[serde(default)]
    pub path: Option<String>,

    /// Address the scheduler mails invocation output to
    #[serde(default)]
    pub mailto: Option<String>,

    /// true → the drop-in directory owns the live entry
    #[serde(default)]
    pub use_cron_d: bool,

    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// true → append redirect (`>>`), false → overwrite (`>`)
    #[serde(default)]
    pub append_log: bool,

    /// Extra tokens passed to the agent, in order. Not shell-escaped.
    #[serde(default)]
    pub daemon_options: Vec<String>,

    /// Upper bound in seconds for the derived startup delay; 0 disables it
    #[serde(default = "default_splay")]
    pub splay: u64,

    /// Overrides the identity-derived seed
    #[serde(default)]
    pub shard_seed: Option<u64>,

    /// Pre-formatted environment prefix, e.g. `"HTTPS_PROXY=http://proxy:3128"`
    #[serde(default)]
    pub env_vars: Option<String>,

    /// nice level for the agent process
    #[serde(default)]
    pub process_priority: Option<i32>,

    /// Stable node identity; host name when unset
    #[serde(default)]
    pub identity: Option<String>,
}

fn default_minute() -> String {
    "0,30".into()
}

fn default_wildcard() -> String {
    "*".into()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("/dev/null")
}

fn default_splay() -> u64 {
    300
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            minute: default_minute(),
            hour: default_wildcard(),
            weekday: default_wildcard(),
            path: None,
            mailto: None,
            use_cron_d: false,
            log_file: default_log_file(),
            append_log: false,
            daemon_options: Vec::new(),
            splay: default_splay(),
            shard_seed: None,
            env_vars: None,
            process_priority: None,
            identity: None,
        }
    }
}

impl ScheduleConfig {
    /// The configured identity, or the host name when none is set.
    pub fn effective_identity(&self) -> String {
        self.identity.clone().unwrap_or_else(|| {
            hostname::get().map_or_else(|_| "localhost".into(), |h| h.to_string_lossy().into_owned())
        })
    }

    /// Each schedule-table field paired with an expression that parses it in
    /// isolation (seconds prepended, the other fields wildcarded).
    fn field_checks(&self) -> [(&'static str, String); 3] {
        [
            ("minute", format!("0 {} * * * *", self.minute)),
            ("hour", format!("0 * {} * * *", self.hour)),
            ("weekday", format!("0 * * * * {}", self.weekday)),
        ]
    }

    fn validate(&self) -> Result<()> {
        for (field, expression) in self.field_checks() {
            cron::Schedule::from_str(&expression).map_err(|err| ScheduleError::InvalidField {
                field: field.into(),
                message: err.to_string(),
            })?;
        }

        if !self.log_file.is_absolute() {
            anyhow::bail!(ConfigError::Validation(format!(
                "schedule.log_file must be an absolute path, got {}",
                self.log_file.display()
            )));
        }

        Ok(())
    }
}

// ── Backends ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    /// Shared system table file, managed as a marker-delimited block
    #[serde(default = "default_crontab")]
    pub crontab: PathBuf,

    /// Directory holding one file per drop-in entry
    #[serde(default = "default_cron_d")]
    pub cron_d: PathBuf,
}

fn default_crontab() -> PathBuf {
    PathBuf::from("/etc/crontab")
}

fn default_cron_d() -> PathBuf {
    PathBuf::from("/etc/cron.d")
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            crontab: default_crontab(),
            cron_d: default_cron_d(),
        }
    }
}

// ── Config impl ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            agent: AgentConfig::default(),
            schedule: ScheduleConfig::default(),
            backends: BackendsConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate the configuration.
    ///
    /// A missing default-location file yields the built-in defaults; a
    /// missing explicitly requested file is an operator mistake and fails.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), Path::to_path_buf);

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .map_err(ConfigError::Io)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            toml::from_str::<Self>(&contents)
                .map_err(|err| ConfigError::Load(err.to_string()))
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else if path.is_some() {
            anyhow::bail!(ConfigError::Load(format!(
                "{} does not exist",
                config_path.display()
            )));
        } else {
            Self::default()
        };

        config.config_path = config_path;
        config.expand_paths();
        config.validate()?;
        Ok(config)
    }

    fn expand_paths(&mut self) {
        if let Some(bin) = &self.agent.bin {
            self.agent.bin = Some(shellexpand::tilde(bin).into_owned());
        }
        self.schedule.log_file = expand_path(&self.schedule.log_file);
        self.backends.crontab = expand_path(&self.backends.crontab);
        self.backends.cron_d = expand_path(&self.backends.cron_d);
        for dir in &mut self.agent.directories {
            *dir = expand_path(dir);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.agent.name.trim().is_empty() {
            anyhow::bail!(ConfigError::Validation("agent.name must not be empty".into()));
        }
        self.schedule.validate()
    }
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
