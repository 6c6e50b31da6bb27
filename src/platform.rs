use std::fs;
use strum::Display;

const OS_RELEASE: &str = "/etc/os-release";

/// Normalized platform families the service-control installer knows how to
/// provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PlatformFamily {
    Amazon,
    Debian,
    Rhel,
    Fedora,
    Suse,
}

impl PlatformFamily {
    /// Detect the running host's family from `/etc/os-release`.
    pub fn detect() -> Option<Self> {
        let content = fs::read_to_string(OS_RELEASE).ok()?;
        Self::from_os_release(&content)
    }

    /// Parse an os-release body: `ID` decides, `ID_LIKE` breaks the tie for
    /// derivatives (e.g. `ID=rocky` with `ID_LIKE="rhel centos fedora"`).
    pub fn from_os_release(content: &str) -> Option<Self> {
        let field = |key: &str| {
            content.lines().find_map(|line| {
                line.strip_prefix(key)
                    .and_then(|rest| rest.strip_prefix('='))
                    .map(|value| value.trim().trim_matches('"').to_ascii_lowercase())
            })
        };

        if let Some(family) = field("ID").as_deref().and_then(Self::from_id) {
            return Some(family);
        }
        field("ID_LIKE")?
            .split_whitespace()
            .find_map(Self::from_id)
    }

    fn from_id(id: &str) -> Option<Self> {
        match id {
            "amzn" | "amazon" => Some(Self::Amazon),
            "debian" | "ubuntu" => Some(Self::Debian),
            "rhel" | "centos" | "rocky" | "almalinux" => Some(Self::Rhel),
            "fedora" => Some(Self::Fedora),
            "suse" | "sles" | "sled" | "opensuse" | "opensuse-leap" => Some(Self::Suse),
            _ => None,
        }
    }

    /// The template-flavor directory and the environment-file directory for
    /// this family: `(dist_dir, conf_dir)`.
    pub fn dirs(self) -> (&'static str, &'static str) {
        match self {
            Self::Amazon | Self::Rhel | Self::Fedora => ("redhat", "sysconfig"),
            Self::Debian => ("debian", "default"),
            Self::Suse => ("suse", "sysconfig"),
        }
    }
}
